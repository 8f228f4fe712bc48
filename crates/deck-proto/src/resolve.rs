//! Effective-config resolution.
//!
//! Precedence per plain field: store value → legacy prop → global default.
//! Tri-state fields: an explicit `Override::Set` always wins; `Inherit`
//! defers to the global default, falling back to the legacy prop and then
//! the built-in default when the global is missing.  Results are recomputed
//! on every read and never cached.

use serde::Deserialize;

use crate::channel::{
    display_title, ChannelConfig, ChannelMedia, ChannelType, HoverSound, KenBurnsMode, Override,
};

/// App-wide defaults.  `None` is a resolution gap, not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalChannelDefaults {
    pub animated_on_hover: Option<bool>,
    pub ken_burns_enabled: Option<bool>,
    pub ken_burns_mode: Option<KenBurnsMode>,
    pub hover_sound: Option<HoverSound>,
    pub as_admin: Option<bool>,
}

/// Per-channel props from the pre-store configuration format.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LegacyChannelProps {
    #[serde(rename = "type")]
    pub kind: Option<ChannelType>,
    pub path: Option<String>,
    pub media: Option<ChannelMedia>,
    pub icon: Option<String>,
    pub hover_sound: Option<HoverSound>,
    pub as_admin: Option<bool>,
    pub animated_on_hover: Option<bool>,
    pub ken_burns_enabled: Option<bool>,
    pub ken_burns_mode: Option<KenBurnsMode>,
}

impl LegacyChannelProps {
    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }
}

/// Fully-resolved channel configuration used for rendering and launching.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveChannelConfig {
    pub id: String,
    pub kind: Option<ChannelType>,
    pub path: Option<String>,
    pub media: Option<ChannelMedia>,
    pub icon: Option<String>,
    pub hover_sound: Option<HoverSound>,
    pub as_admin: bool,
    pub animated_on_hover: bool,
    pub ken_burns_enabled: bool,
    pub ken_burns_mode: KenBurnsMode,
}

impl EffectiveChannelConfig {
    pub fn launch_path(&self) -> Option<&str> {
        self.path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.launch_path().is_none()
    }

    pub fn title(&self) -> Option<String> {
        display_title(self.media.as_ref(), self.launch_path())
    }
}

fn plain<T: Clone>(stored: Option<&T>, legacy: Option<&T>, global: Option<&T>) -> Option<T> {
    stored.or(legacy).or(global).cloned()
}

fn tri_state<T: Copy>(stored: Override<T>, legacy: Option<T>, global: Option<T>, builtin: T) -> T {
    match stored {
        Override::Set(v) => v,
        Override::Inherit => global.or(legacy).unwrap_or(builtin),
    }
}

/// Resolve a channel.  `stored` is `None` when the slot has no store entry.
pub fn resolve(
    id: &str,
    stored: Option<&ChannelConfig>,
    legacy: Option<&LegacyChannelProps>,
    globals: &GlobalChannelDefaults,
) -> EffectiveChannelConfig {
    let empty_legacy = LegacyChannelProps::default();
    let legacy = legacy.unwrap_or(&empty_legacy);
    let inherit = |f: fn(&ChannelConfig) -> Override<bool>| stored.map(f).unwrap_or_default();

    EffectiveChannelConfig {
        id: id.to_string(),
        kind: plain(stored.and_then(|c| c.kind.as_ref()), legacy.kind.as_ref(), None),
        path: plain(
            stored.and_then(|c| c.path.as_ref()),
            legacy.path.as_ref(),
            None,
        ),
        media: plain(
            stored.and_then(|c| c.media.as_ref()),
            legacy.media.as_ref(),
            None,
        ),
        icon: plain(
            stored.and_then(|c| c.icon.as_ref()),
            legacy.icon.as_ref(),
            None,
        ),
        hover_sound: plain(
            stored.and_then(|c| c.hover_sound.as_ref()),
            legacy.hover_sound.as_ref(),
            globals.hover_sound.as_ref(),
        ),
        as_admin: plain(
            stored.and_then(|c| c.as_admin.as_ref()),
            legacy.as_admin.as_ref(),
            globals.as_admin.as_ref(),
        )
        .unwrap_or(false),
        animated_on_hover: tri_state(
            inherit(|c| c.animated_on_hover),
            legacy.animated_on_hover,
            globals.animated_on_hover,
            false,
        ),
        ken_burns_enabled: tri_state(
            inherit(|c| c.ken_burns_enabled),
            legacy.ken_burns_enabled,
            globals.ken_burns_enabled,
            false,
        ),
        ken_burns_mode: tri_state(
            stored.map(|c| c.ken_burns_mode).unwrap_or_default(),
            legacy.ken_burns_mode,
            globals.ken_burns_mode,
            KenBurnsMode::Hover,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::MediaItem;

    fn stored(f: impl FnOnce(&mut ChannelConfig)) -> ChannelConfig {
        let mut cfg = ChannelConfig::empty("channel-0");
        f(&mut cfg);
        cfg
    }

    #[test]
    fn test_explicit_false_beats_legacy_and_global() {
        let cfg = stored(|c| c.animated_on_hover = Override::Set(false));
        let legacy = LegacyChannelProps {
            animated_on_hover: Some(true),
            ..Default::default()
        };
        let globals = GlobalChannelDefaults {
            animated_on_hover: Some(true),
            ..Default::default()
        };
        let eff = resolve("channel-0", Some(&cfg), Some(&legacy), &globals);
        assert!(!eff.animated_on_hover);
    }

    #[test]
    fn test_inherit_takes_global() {
        let cfg = stored(|_| {});
        let globals = GlobalChannelDefaults {
            animated_on_hover: Some(true),
            ..Default::default()
        };
        let eff = resolve("channel-0", Some(&cfg), None, &globals);
        assert!(eff.animated_on_hover);
    }

    #[test]
    fn test_inherit_falls_back_to_legacy_then_builtin() {
        let legacy = LegacyChannelProps {
            ken_burns_enabled: Some(true),
            ..Default::default()
        };
        let eff = resolve(
            "channel-0",
            None,
            Some(&legacy),
            &GlobalChannelDefaults::default(),
        );
        assert!(eff.ken_burns_enabled);
        assert!(!eff.animated_on_hover);
        assert_eq!(eff.ken_burns_mode, KenBurnsMode::Hover);
    }

    #[test]
    fn test_global_shadows_legacy_for_inherited_tri_state() {
        let legacy = LegacyChannelProps {
            ken_burns_mode: Some(KenBurnsMode::Autoplay),
            ..Default::default()
        };
        let globals = GlobalChannelDefaults {
            ken_burns_mode: Some(KenBurnsMode::Hover),
            ..Default::default()
        };
        let eff = resolve("channel-0", None, Some(&legacy), &globals);
        assert_eq!(eff.ken_burns_mode, KenBurnsMode::Hover);
    }

    #[test]
    fn test_plain_fields_prefer_store_then_legacy() {
        let cfg = stored(|c| c.path = Some("C:\\new.exe".into()));
        let legacy = LegacyChannelProps {
            path: Some("C:\\old.exe".into()),
            icon: Some("old.png".into()),
            kind: Some(ChannelType::Exe),
            ..Default::default()
        };
        let eff = resolve(
            "channel-0",
            Some(&cfg),
            Some(&legacy),
            &GlobalChannelDefaults::default(),
        );
        assert_eq!(eff.path.as_deref(), Some("C:\\new.exe"));
        assert_eq!(eff.icon.as_deref(), Some("old.png"));
        assert_eq!(eff.kind, Some(ChannelType::Exe));
    }

    #[test]
    fn test_hover_sound_falls_through_to_global() {
        let sound = HoverSound {
            url: "file:///hover.wav".into(),
            name: "hover".into(),
            volume: 0.4,
        };
        let globals = GlobalChannelDefaults {
            hover_sound: Some(sound.clone()),
            ..Default::default()
        };
        let eff = resolve("channel-3", None, None, &globals);
        assert_eq!(eff.hover_sound, Some(sound));
        assert_eq!(eff.id, "channel-3");
        assert!(eff.is_empty());
    }

    #[test]
    fn test_as_admin_unset_in_store_defers_to_legacy() {
        let legacy = LegacyChannelProps {
            as_admin: Some(true),
            ..Default::default()
        };
        let globals = GlobalChannelDefaults::default();
        assert!(resolve("channel-0", None, Some(&legacy), &globals).as_admin);

        // An entry that only carries media must not drop the elevation.
        let cfg = stored(|c| c.media = Some(MediaItem::from_location("/art/a.png").into()));
        assert!(resolve("channel-0", Some(&cfg), Some(&legacy), &globals).as_admin);

        let cfg = stored(|c| c.as_admin = Some(false));
        assert!(!resolve("channel-0", Some(&cfg), Some(&legacy), &globals).as_admin);
    }
}
