//! In-memory channel map.  No I/O; the `Deck` persists after each edit.

use serde::{Deserialize, Serialize};

use crate::channel::{channel_id, channel_index, ChannelConfig, ChannelMap, ChannelPatch};
use crate::navigation::GridGeometry;

/// A named full-grid layout.  An empty `channels` map means the preset
/// carries no channel data; applying it restores the user's own channels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelPreset {
    pub name: String,
    #[serde(default)]
    pub channels: ChannelMap,
}

/// One grid slot as seen by the renderer.
#[derive(Debug, Clone, Copy)]
pub struct SlotView<'a> {
    pub index: usize,
    pub config: Option<&'a ChannelConfig>,
    pub is_empty: bool,
}

impl SlotView<'_> {
    pub fn id(&self) -> String {
        channel_id(self.index)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChannelStore {
    channels: ChannelMap,
    /// The user's own channels, taken when the first preset is applied.
    user_backup: Option<ChannelMap>,
    preset_active: bool,
}

impl ChannelStore {
    pub fn new(channels: ChannelMap) -> Self {
        Self {
            channels,
            user_backup: None,
            preset_active: false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&ChannelConfig> {
        self.channels.get(id)
    }

    /// Merge `patch` into the slot's config, creating it if absent.
    pub fn update(&mut self, id: &str, patch: ChannelPatch) {
        let config = self
            .channels
            .entry(id.to_string())
            .or_insert_with(|| ChannelConfig::empty(id));
        patch.apply_to(config);
        tracing::debug!("channel {} updated", id);
    }

    /// Reset the launch-target fields.  Behaviour overrides are kept.
    pub fn clear(&mut self, id: &str) {
        self.update(id, ChannelPatch::cleared());
    }

    pub fn is_empty(&self, id: &str) -> bool {
        self.channels.get(id).map_or(true, ChannelConfig::is_empty)
    }

    /// Ids with a path or media, in map order.
    pub fn configured_ids(&self) -> Vec<&str> {
        self.channels
            .iter()
            .filter(|(_, c)| c.is_configured())
            .map(|(id, _)| id.as_str())
            .collect()
    }

    pub fn configured_count(&self) -> usize {
        self.channels.values().filter(|c| c.is_configured()).count()
    }

    /// Largest `N` among configured `channel-N` slots.
    pub fn highest_configured_index(&self) -> Option<usize> {
        self.channels
            .iter()
            .filter(|(_, c)| c.is_configured())
            .filter_map(|(id, _)| channel_index(id))
            .max()
    }

    /// Slots shown on `page` of a grid holding `total_channels` slots.
    pub fn channels_for_page(
        &self,
        page: usize,
        geometry: GridGeometry,
        total_channels: usize,
    ) -> Vec<SlotView<'_>> {
        let per_page = geometry.channels_per_page();
        let start = page.saturating_mul(per_page).min(total_channels);
        let end = (start + per_page).min(total_channels);
        (start..end)
            .map(|index| {
                let config = self.channels.get(&channel_id(index));
                SlotView {
                    index,
                    config,
                    is_empty: config.map_or(true, ChannelConfig::is_empty),
                }
            })
            .collect()
    }

    pub fn snapshot(&self) -> &ChannelMap {
        &self.channels
    }

    pub fn replace_all(&mut self, channels: ChannelMap) {
        self.channels = channels;
    }

    /// Apply a preset.  The first time, the current map is kept as the user
    /// backup.  A preset without channels restores the backup instead.
    pub fn apply_preset(&mut self, preset: &ChannelPreset) {
        if preset.channels.is_empty() {
            tracing::debug!("preset {:?} has no channel data", preset.name);
            self.restore_user_channels();
            return;
        }
        if self.user_backup.is_none() {
            self.user_backup = Some(self.channels.clone());
        }
        self.channels = preset.channels.clone();
        self.preset_active = true;
    }

    /// Returns `false` when there is nothing to restore.
    pub fn restore_user_channels(&mut self) -> bool {
        match &self.user_backup {
            Some(backup) => {
                self.channels = backup.clone();
                self.preset_active = false;
                true
            }
            None => false,
        }
    }

    pub fn has_user_backup(&self) -> bool {
        self.user_backup.is_some()
    }

    /// A preset's channels are showing instead of the user's own.
    pub fn preset_active(&self) -> bool {
        self.preset_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{ChannelMedia, ChannelType, Override};

    fn media() -> ChannelMedia {
        ChannelMedia {
            url: "file:///tile.png".into(),
            mime: "image/png".into(),
            name: "tile".into(),
            is_builtin: false,
        }
    }

    fn configured(path: &str) -> ChannelPatch {
        ChannelPatch::default()
            .with_kind(Some(ChannelType::Exe))
            .with_path(Some(path))
    }

    #[test]
    fn test_unknown_slot_is_empty() {
        let store = ChannelStore::default();
        assert!(store.get("channel-5").is_none());
        assert!(store.is_empty("channel-5"));
    }

    #[test]
    fn test_update_is_partial_merge() {
        let mut store = ChannelStore::default();
        store.update("channel-0", ChannelPatch::default().with_path(Some("a")));
        store.update("channel-0", ChannelPatch::default().with_media(Some(media())));
        let cfg = store.get("channel-0").unwrap();
        assert_eq!(cfg.path.as_deref(), Some("a"));
        assert_eq!(cfg.media, Some(media()));
    }

    #[test]
    fn test_null_path_keeps_media_but_clear_drops_it() {
        let mut store = ChannelStore::default();
        store.update(
            "channel-1",
            configured("C:\\a.exe")
                .with_media(Some(media()))
                .with_icon(Some("i.png")),
        );
        store.update("channel-1", ChannelPatch::default().with_path(None::<String>));
        assert!(store.is_empty("channel-1"));
        assert!(store.get("channel-1").unwrap().media.is_some());

        store.clear("channel-1");
        let cfg = store.get("channel-1").unwrap();
        assert!(cfg.media.is_none());
        assert!(cfg.icon.is_none());
        assert!(cfg.kind.is_none());
    }

    #[test]
    fn test_clear_always_empties() {
        let mut store = ChannelStore::default();
        store.update(
            "channel-2",
            configured("C:\\a.exe").with_animated_on_hover(Override::Set(true)),
        );
        store.clear("channel-2");
        assert!(store.is_empty("channel-2"));
        // Overrides are not launch-target fields.
        assert_eq!(
            store.get("channel-2").unwrap().animated_on_hover,
            Override::Set(true)
        );

        store.clear("channel-9");
        assert!(store.is_empty("channel-9"));
    }

    #[test]
    fn test_configured_counts_and_highest_index() {
        let mut store = ChannelStore::default();
        assert_eq!(store.highest_configured_index(), None);
        store.update("channel-3", configured("C:\\a.exe"));
        store.update("channel-11", ChannelPatch::default().with_media(Some(media())));
        store.update("channel-20", ChannelPatch::default().with_icon(Some("x.png")));
        store.update("custom", configured("C:\\b.exe"));
        assert_eq!(store.configured_count(), 3);
        assert_eq!(store.highest_configured_index(), Some(11));
        assert!(store.configured_ids().contains(&"custom"));
    }

    #[test]
    fn test_channels_for_page() {
        let mut store = ChannelStore::default();
        store.update("channel-13", configured("C:\\a.exe"));
        let geometry = GridGeometry::new(4, 3);
        let page = store.channels_for_page(1, geometry, 30);
        assert_eq!(page.len(), 12);
        assert_eq!(page[0].index, 12);
        assert_eq!(page[1].id(), "channel-13");
        assert!(!page[1].is_empty);
        assert!(page[0].is_empty);

        assert_eq!(store.channels_for_page(2, geometry, 30).len(), 6);
        assert!(store.channels_for_page(9, geometry, 30).is_empty());
    }

    #[test]
    fn test_preset_backup_and_restore() {
        let mut store = ChannelStore::default();
        store.update("channel-0", configured("C:\\mine.exe"));
        assert!(!store.has_user_backup());

        let mut channels = ChannelMap::new();
        let mut cfg = ChannelConfig::empty("channel-4");
        cfg.path = Some("https://example.com".into());
        cfg.kind = Some(ChannelType::Url);
        channels.insert("channel-4".into(), cfg);
        let preset = ChannelPreset {
            name: "web".into(),
            channels,
        };

        store.apply_preset(&preset);
        assert!(store.has_user_backup());
        assert!(store.preset_active());
        assert!(store.is_empty("channel-0"));
        assert!(!store.is_empty("channel-4"));

        // Second preset must not overwrite the original backup.
        store.apply_preset(&preset);
        assert!(store.restore_user_channels());
        assert!(!store.preset_active());
        assert!(store.has_user_backup());
        assert!(!store.is_empty("channel-0"));
        assert!(store.is_empty("channel-4"));
    }

    #[test]
    fn test_empty_preset_restores_backup() {
        let mut store = ChannelStore::default();
        assert!(!store.restore_user_channels());
        store.apply_preset(&ChannelPreset::default());
        assert!(!store.has_user_backup());
    }
}
