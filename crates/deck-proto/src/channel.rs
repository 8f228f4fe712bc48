//! Channel data model: one `ChannelConfig` per grid slot.
//!
//! Slots are addressed by a stable string id (`channel-N`, N = grid index).
//! A slot always exists implicitly; only its content changes.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Persisted and in-memory map of slot id → config.
pub type ChannelMap = BTreeMap<String, ChannelConfig>;

const ID_PREFIX: &str = "channel-";

/// Slot id for a grid index.
pub fn channel_id(index: usize) -> String {
    format!("{}{}", ID_PREFIX, index)
}

/// Grid index encoded in a slot id, if it is a `channel-N` id.
pub fn channel_index(id: &str) -> Option<usize> {
    id.strip_prefix(ID_PREFIX)?.parse().ok()
}

// ── Launch type ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    Exe,
    Url,
    Steam,
    Epic,
    #[serde(rename = "microsoftstore")]
    MicrosoftStore,
}

impl ChannelType {
    pub const ALL: [ChannelType; 5] = [
        ChannelType::Exe,
        ChannelType::Url,
        ChannelType::Steam,
        ChannelType::Epic,
        ChannelType::MicrosoftStore,
    ];

    /// Wire name, as written to `channels.json`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exe => "exe",
            Self::Url => "url",
            Self::Steam => "steam",
            Self::Epic => "epic",
            Self::MicrosoftStore => "microsoftstore",
        }
    }

    /// Human label for the editor's type selector.
    pub fn label(self) -> &'static str {
        match self {
            Self::Exe => "Application (.exe)",
            Self::Url => "Website (URL)",
            Self::Steam => "Steam game",
            Self::Epic => "Epic Games",
            Self::MicrosoftStore => "Microsoft Store app",
        }
    }

    /// Short badge shown on a tile.
    pub fn badge(self) -> &'static str {
        match self {
            Self::Exe => "EXE",
            Self::Url => "WEB",
            Self::Steam => "STEAM",
            Self::Epic => "EPIC",
            Self::MicrosoftStore => "STORE",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Exe => Self::Url,
            Self::Url => Self::Steam,
            Self::Steam => Self::Epic,
            Self::Epic => Self::MicrosoftStore,
            Self::MicrosoftStore => Self::Exe,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Exe => Self::MicrosoftStore,
            Self::Url => Self::Exe,
            Self::Steam => Self::Url,
            Self::Epic => Self::Steam,
            Self::MicrosoftStore => Self::Epic,
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Media / sound ─────────────────────────────────────────────────────────────

/// Visual tile content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMedia {
    pub url: String,
    /// MIME type (`image/png`, `video/mp4`, …).
    #[serde(rename = "type", default)]
    pub mime: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_builtin: bool,
}

impl ChannelMedia {
    pub fn is_video(&self) -> bool {
        self.mime.starts_with("video/")
    }
}

/// Item handed back by the media library when the user picks something.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaItem {
    pub url: String,
    pub mime: String,
    pub name: String,
    pub is_builtin: bool,
}

impl MediaItem {
    /// Build an item from a bare path or URL typed by the user.
    /// The MIME type is guessed from the extension.
    pub fn from_location(location: &str) -> Self {
        let location = location.trim();
        let name = location
            .rsplit(['/', '\\'])
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(location)
            .to_string();
        Self {
            url: location.to_string(),
            mime: guess_mime(location).to_string(),
            name,
            is_builtin: false,
        }
    }
}

impl From<MediaItem> for ChannelMedia {
    fn from(item: MediaItem) -> Self {
        Self {
            url: item.url,
            mime: item.mime,
            name: item.name,
            is_builtin: item.is_builtin,
        }
    }
}

fn guess_mime(location: &str) -> &'static str {
    let ext = location
        .rsplit('.')
        .next()
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
}

/// Per-channel override of the global hover sound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverSound {
    pub url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_hover_volume")]
    pub volume: f32,
}

fn default_hover_volume() -> f32 {
    0.5
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KenBurnsMode {
    Hover,
    Autoplay,
}

impl KenBurnsMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hover => "hover",
            Self::Autoplay => "autoplay",
        }
    }
}

// ── Override<T> ───────────────────────────────────────────────────────────────

/// Keyword written for `Override::Inherit`.
pub const INHERIT_KEYWORD: &str = "global";

/// Tri-state per-channel override: either an explicit value or "use the
/// global default".
///
/// On disk `Inherit` is the string `"global"`; a missing key or `null` also
/// reads back as `Inherit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Override<T> {
    Inherit,
    Set(T),
}

impl<T> Override<T> {
    pub fn is_inherit(&self) -> bool {
        matches!(self, Self::Inherit)
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            Self::Inherit => None,
            Self::Set(v) => Some(v),
        }
    }
}

impl<T: Copy> Override<T> {
    /// Explicit value, else `fallback`.
    pub fn or(self, fallback: T) -> T {
        match self {
            Self::Inherit => fallback,
            Self::Set(v) => v,
        }
    }
}

impl<T> Default for Override<T> {
    fn default() -> Self {
        Self::Inherit
    }
}

impl<T> From<Option<T>> for Override<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Set(v),
            None => Self::Inherit,
        }
    }
}

impl Override<bool> {
    /// Editor cycle: global → on → off → global.
    pub fn cycle(self) -> Self {
        match self {
            Self::Inherit => Self::Set(true),
            Self::Set(true) => Self::Set(false),
            Self::Set(false) => Self::Inherit,
        }
    }
}

impl Override<KenBurnsMode> {
    /// Editor cycle: global → hover → autoplay → global.
    pub fn cycle(self) -> Self {
        match self {
            Self::Inherit => Self::Set(KenBurnsMode::Hover),
            Self::Set(KenBurnsMode::Hover) => Self::Set(KenBurnsMode::Autoplay),
            Self::Set(KenBurnsMode::Autoplay) => Self::Inherit,
        }
    }
}

impl<T: Serialize> Serialize for Override<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Inherit => serializer.serialize_str(INHERIT_KEYWORD),
            Self::Set(v) => v.serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Override<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Value first so string-valued T (KenBurnsMode) is not taken as a keyword.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw<T> {
            Value(T),
            Keyword(String),
        }

        match Option::<Raw<T>>::deserialize(deserializer)? {
            None => Ok(Self::Inherit),
            Some(Raw::Value(v)) => Ok(Self::Set(v)),
            Some(Raw::Keyword(k)) if k == INHERIT_KEYWORD => Ok(Self::Inherit),
            Some(Raw::Keyword(k)) => Err(serde::de::Error::invalid_value(
                serde::de::Unexpected::Str(&k),
                &"a value or \"global\"",
            )),
        }
    }
}

// ── ChannelConfig ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Filled from the map key when missing.
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: Option<ChannelType>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub media: Option<ChannelMedia>,
    #[serde(default)]
    pub icon: Option<String>,
    /// Elevated launch; only meaningful for `ChannelType::Exe`.  Unset
    /// defers to the legacy prop and then the global default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_admin: Option<bool>,
    #[serde(default)]
    pub hover_sound: Option<HoverSound>,
    #[serde(default)]
    pub animated_on_hover: Override<bool>,
    #[serde(default)]
    pub ken_burns_enabled: Override<bool>,
    #[serde(default)]
    pub ken_burns_mode: Override<KenBurnsMode>,
}

impl ChannelConfig {
    /// Canonical empty config for a slot.
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: None,
            path: None,
            media: None,
            icon: None,
            as_admin: None,
            hover_sound: None,
            animated_on_hover: Override::Inherit,
            ken_burns_enabled: Override::Inherit,
            ken_burns_mode: Override::Inherit,
        }
    }

    /// Non-blank launch target, if any.
    pub fn launch_path(&self) -> Option<&str> {
        self.path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// A channel without a launch target is empty, even with media.
    pub fn is_empty(&self) -> bool {
        self.launch_path().is_none()
    }

    /// Has either a launch target or media.
    pub fn is_configured(&self) -> bool {
        !self.is_empty() || self.media.is_some()
    }

    /// Short display title: media name, else the path's last segment.
    pub fn title(&self) -> Option<String> {
        display_title(self.media.as_ref(), self.launch_path())
    }
}

pub(crate) fn display_title(media: Option<&ChannelMedia>, path: Option<&str>) -> Option<String> {
    if let Some(media) = media {
        if !media.name.is_empty() {
            return Some(media.name.clone());
        }
    }
    let path = path?;
    let head = path.split_whitespace().next().unwrap_or(path);
    let tail = head
        .trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(head);
    Some(tail.to_string())
}

// ── ChannelPatch ──────────────────────────────────────────────────────────────

/// Partial update merged into a `ChannelConfig`.
///
/// The outer `Option` means "present in the patch"; the inner value is what
/// gets written (which for nullable fields may itself be `None`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelPatch {
    pub kind: Option<Option<ChannelType>>,
    pub path: Option<Option<String>>,
    pub media: Option<Option<ChannelMedia>>,
    pub icon: Option<Option<String>>,
    pub as_admin: Option<Option<bool>>,
    pub hover_sound: Option<Option<HoverSound>>,
    pub animated_on_hover: Option<Override<bool>>,
    pub ken_burns_enabled: Option<Override<bool>>,
    pub ken_burns_mode: Option<Override<KenBurnsMode>>,
}

impl ChannelPatch {
    /// The patch `clear` applies: every launch-target field nulled.
    pub fn cleared() -> Self {
        Self {
            kind: Some(None),
            path: Some(None),
            media: Some(None),
            icon: Some(None),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: Option<ChannelType>) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_path(mut self, path: Option<impl Into<String>>) -> Self {
        self.path = Some(path.map(Into::into));
        self
    }

    pub fn with_media(mut self, media: Option<ChannelMedia>) -> Self {
        self.media = Some(media);
        self
    }

    pub fn with_icon(mut self, icon: Option<impl Into<String>>) -> Self {
        self.icon = Some(icon.map(Into::into));
        self
    }

    pub fn with_as_admin(mut self, as_admin: Option<bool>) -> Self {
        self.as_admin = Some(as_admin);
        self
    }

    pub fn with_hover_sound(mut self, sound: Option<HoverSound>) -> Self {
        self.hover_sound = Some(sound);
        self
    }

    pub fn with_animated_on_hover(mut self, value: Override<bool>) -> Self {
        self.animated_on_hover = Some(value);
        self
    }

    pub fn with_ken_burns_enabled(mut self, value: Override<bool>) -> Self {
        self.ken_burns_enabled = Some(value);
        self
    }

    pub fn with_ken_burns_mode(mut self, value: Override<KenBurnsMode>) -> Self {
        self.ken_burns_mode = Some(value);
        self
    }

    /// Shallow merge: only fields present in the patch are written.
    pub fn apply_to(self, config: &mut ChannelConfig) {
        if let Some(v) = self.kind {
            config.kind = v;
        }
        if let Some(v) = self.path {
            config.path = v;
        }
        if let Some(v) = self.media {
            config.media = v;
        }
        if let Some(v) = self.icon {
            config.icon = v;
        }
        if let Some(v) = self.as_admin {
            config.as_admin = v;
        }
        if let Some(v) = self.hover_sound {
            config.hover_sound = v;
        }
        if let Some(v) = self.animated_on_hover {
            config.animated_on_hover = v;
        }
        if let Some(v) = self.ken_burns_enabled {
            config.ken_burns_enabled = v;
        }
        if let Some(v) = self.ken_burns_mode {
            config.ken_burns_mode = v;
        }
    }
}

// ── ChannelDraft ──────────────────────────────────────────────────────────────

/// Working copy edited by the channel editor.  May hold an invalid path; it
/// is only validated when saved.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelDraft {
    pub kind: ChannelType,
    pub path: String,
    pub media: Option<ChannelMedia>,
    pub icon: Option<String>,
    /// `None` until the user toggles it.
    pub as_admin: Option<bool>,
    pub hover_sound: Option<HoverSound>,
    pub animated_on_hover: Override<bool>,
    pub ken_burns_enabled: Override<bool>,
    pub ken_burns_mode: Override<KenBurnsMode>,
}

impl ChannelDraft {
    /// Seed a draft from the stored config; unconfigured slots start as `Exe`.
    pub fn from_config(config: Option<&ChannelConfig>) -> Self {
        match config {
            Some(c) => Self {
                kind: c.kind.unwrap_or(ChannelType::Exe),
                path: c.path.clone().unwrap_or_default(),
                media: c.media.clone(),
                icon: c.icon.clone(),
                as_admin: c.as_admin,
                hover_sound: c.hover_sound.clone(),
                animated_on_hover: c.animated_on_hover,
                ken_burns_enabled: c.ken_burns_enabled,
                ken_burns_mode: c.ken_burns_mode,
            },
            None => Self {
                kind: ChannelType::Exe,
                path: String::new(),
                media: None,
                icon: None,
                as_admin: None,
                hover_sound: None,
                animated_on_hover: Override::Inherit,
                ken_burns_enabled: Override::Inherit,
                ken_burns_mode: Override::Inherit,
            },
        }
    }

    /// Something worth saving: a path or media.
    pub fn has_content(&self) -> bool {
        !self.path.trim().is_empty() || self.media.is_some()
    }

    /// Full patch carrying every draft field.  The path is trimmed; blank
    /// becomes null.  `as_admin` is only written for exe channels.
    pub fn into_patch(self) -> ChannelPatch {
        let path = self.path.trim().to_string();
        let path = if path.is_empty() { None } else { Some(path) };
        let as_admin = self.as_admin.filter(|_| self.kind == ChannelType::Exe);
        ChannelPatch::default()
            .with_kind(Some(self.kind))
            .with_path(path)
            .with_media(self.media)
            .with_icon(self.icon)
            .with_as_admin(as_admin)
            .with_hover_sound(self.hover_sound)
            .with_animated_on_hover(self.animated_on_hover)
            .with_ken_burns_enabled(self.ken_burns_enabled)
            .with_ken_burns_mode(self.ken_burns_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_id_roundtrip() {
        assert_eq!(channel_id(7), "channel-7");
        assert_eq!(channel_index("channel-7"), Some(7));
        assert_eq!(channel_index("channel-x"), None);
        assert_eq!(channel_index("slot-3"), None);
    }

    #[test]
    fn test_media_only_channel_is_empty() {
        let mut cfg = ChannelConfig::empty("channel-0");
        cfg.media = Some(ChannelMedia {
            url: "file:///tile.png".into(),
            mime: "image/png".into(),
            name: "tile".into(),
            is_builtin: false,
        });
        assert!(cfg.is_empty());
        assert!(cfg.is_configured());

        cfg.path = Some("   ".into());
        assert!(cfg.is_empty(), "blank path is not a launch target");
    }

    #[test]
    fn test_override_json_forms() {
        let cfg: ChannelConfig = serde_json::from_str(
            r#"{"id":"channel-1","animated_on_hover":"global","ken_burns_enabled":false,"ken_burns_mode":"autoplay"}"#,
        )
        .unwrap();
        assert_eq!(cfg.animated_on_hover, Override::Inherit);
        assert_eq!(cfg.ken_burns_enabled, Override::Set(false));
        assert_eq!(cfg.ken_burns_mode, Override::Set(KenBurnsMode::Autoplay));

        let cfg: ChannelConfig =
            serde_json::from_str(r#"{"id":"channel-1","animated_on_hover":null}"#).unwrap();
        assert_eq!(cfg.animated_on_hover, Override::Inherit);
        assert_eq!(cfg.ken_burns_mode, Override::Inherit);

        let bad = serde_json::from_str::<ChannelConfig>(
            r#"{"id":"channel-1","animated_on_hover":"sometimes"}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_override_serializes_inherit_as_global() {
        let json = serde_json::to_value(ChannelConfig::empty("channel-2")).unwrap();
        assert_eq!(json["animated_on_hover"], "global");
        assert_eq!(json["type"], serde_json::Value::Null);
        assert!(json.get("as_admin").is_none());
    }

    #[test]
    fn test_untouched_admin_stays_unset() {
        let mut cfg = ChannelConfig::empty("channel-6");
        let mut draft = ChannelDraft::from_config(None);
        draft.path = "C:\\a.exe".into();
        draft.into_patch().apply_to(&mut cfg);
        assert_eq!(cfg.as_admin, None);

        let mut draft = ChannelDraft::from_config(Some(&cfg));
        draft.as_admin = Some(false);
        draft.into_patch().apply_to(&mut cfg);
        assert_eq!(cfg.as_admin, Some(false));
    }

    #[test]
    fn test_channel_type_wire_names() {
        let t: ChannelType = serde_json::from_str("\"microsoftstore\"").unwrap();
        assert_eq!(t, ChannelType::MicrosoftStore);
        assert_eq!(serde_json::to_string(&ChannelType::Steam).unwrap(), "\"steam\"");
    }

    #[test]
    fn test_patch_leaves_absent_fields() {
        let mut cfg = ChannelConfig::empty("channel-3");
        cfg.icon = Some("icon.png".into());
        ChannelPatch::default()
            .with_path(Some("C:\\a.exe"))
            .apply_to(&mut cfg);
        assert_eq!(cfg.icon.as_deref(), Some("icon.png"));
        assert_eq!(cfg.path.as_deref(), Some("C:\\a.exe"));
    }

    #[test]
    fn test_draft_patch_trims_and_drops_admin_for_urls() {
        let mut draft = ChannelDraft::from_config(None);
        draft.kind = ChannelType::Url;
        draft.path = "  https://example.com  ".into();
        draft.as_admin = Some(true);
        let mut cfg = ChannelConfig::empty("channel-4");
        cfg.as_admin = Some(true);
        draft.into_patch().apply_to(&mut cfg);
        assert_eq!(cfg.path.as_deref(), Some("https://example.com"));
        assert_eq!(cfg.as_admin, None);
        assert_eq!(cfg.kind, Some(ChannelType::Url));
    }

    #[test]
    fn test_title_prefers_media_name() {
        let mut cfg = ChannelConfig::empty("channel-5");
        cfg.path = Some("C:\\Games\\Doom\\doom.exe -nosound".into());
        assert_eq!(cfg.title().as_deref(), Some("doom.exe"));
        cfg.media = Some(MediaItem::from_location("/art/doom.png").into());
        assert_eq!(cfg.title().as_deref(), Some("doom.png"));
    }

    #[test]
    fn test_override_cycles() {
        assert_eq!(Override::<bool>::Inherit.cycle(), Override::Set(true));
        assert_eq!(Override::Set(false).cycle(), Override::<bool>::Inherit);
        assert_eq!(
            Override::<KenBurnsMode>::Inherit.cycle(),
            Override::Set(KenBurnsMode::Hover)
        );
    }
}
