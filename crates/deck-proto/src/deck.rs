//! Application-state root for the channel grid.
//!
//! `Deck` owns the store, navigation, defaults and the persistence
//! collaborator.  Every mutation goes through a method here and is written
//! back as a full map; a failed write is reported but the in-memory edit is
//! kept.

use std::collections::HashMap;

use crate::channel::{ChannelConfig, ChannelDraft, ChannelPatch, MediaItem};
use crate::config::Config;
use crate::error::DeckError;
use crate::launch::{LaunchError, LaunchRequest, LaunchRoute};
use crate::navigation::{GridGeometry, NavigationController};
use crate::repository::ChannelRepository;
use crate::resolve::{resolve, EffectiveChannelConfig, GlobalChannelDefaults, LegacyChannelProps};
use crate::store::{ChannelPreset, ChannelStore, SlotView};
use crate::validate::{validate, Validation};

pub struct Deck {
    store: ChannelStore,
    navigation: NavigationController,
    globals: GlobalChannelDefaults,
    legacy: HashMap<String, LegacyChannelProps>,
    repository: Box<dyn ChannelRepository>,
    presets: Vec<ChannelPreset>,
    immersive_pip: bool,
}

impl Deck {
    pub fn load(
        config: &Config,
        repository: Box<dyn ChannelRepository>,
        legacy: HashMap<String, LegacyChannelProps>,
    ) -> anyhow::Result<Self> {
        let channels = repository.get()?;
        tracing::info!(
            "loaded {} stored channels, {} legacy entries",
            channels.len(),
            legacy.len()
        );
        let navigation = NavigationController::new(
            config.grid.total_channels,
            config.grid.geometry(),
            config.navigation.mode,
            config.navigation.chrome,
        );
        Ok(Self {
            store: ChannelStore::new(channels),
            navigation,
            globals: config.channels.global_defaults(),
            legacy,
            repository,
            presets: Vec::new(),
            immersive_pip: config.general.immersive_pip,
        })
    }

    pub fn with_presets(mut self, presets: Vec<ChannelPreset>) -> Self {
        self.presets = presets;
        self
    }

    // ── Reads ────────────────────────────────────────────────────────────────

    pub fn store(&self) -> &ChannelStore {
        &self.store
    }

    pub fn navigation(&self) -> &NavigationController {
        &self.navigation
    }

    pub fn navigation_mut(&mut self) -> &mut NavigationController {
        &mut self.navigation
    }

    pub fn globals(&self) -> &GlobalChannelDefaults {
        &self.globals
    }

    pub fn presets(&self) -> &[ChannelPreset] {
        &self.presets
    }

    pub fn immersive_pip(&self) -> bool {
        self.immersive_pip
    }

    pub fn set_immersive_pip(&mut self, enabled: bool) {
        self.immersive_pip = enabled;
    }

    pub fn set_geometry(&mut self, total_channels: usize, geometry: GridGeometry) {
        self.navigation.set_geometry(total_channels, geometry);
    }

    pub fn channel(&self, id: &str) -> Option<&ChannelConfig> {
        self.store.get(id)
    }

    /// Empty after resolution, so channels only known through legacy props
    /// still count as configured.
    pub fn is_empty(&self, id: &str) -> bool {
        self.effective(id).is_empty()
    }

    /// Legacy props describe the user's own grid, so they sit out while a
    /// preset is active.
    pub fn effective(&self, id: &str) -> EffectiveChannelConfig {
        let legacy = if self.store.preset_active() {
            None
        } else {
            self.legacy.get(id)
        };
        resolve(id, self.store.get(id), legacy, &self.globals)
    }

    /// Slots of the current page, emptiness judged after resolution.
    pub fn page_slots(&self) -> Vec<SlotView<'_>> {
        let mut slots = self.store.channels_for_page(
            self.navigation.current_page(),
            self.navigation.geometry(),
            self.navigation.total_channels(),
        );
        for slot in &mut slots {
            slot.is_empty = self.is_empty(&slot.id());
        }
        slots
    }

    /// Editor seed for a slot, including legacy values not yet in the store.
    pub fn draft_for(&self, id: &str) -> ChannelDraft {
        if let Some(stored) = self.store.get(id) {
            return ChannelDraft::from_config(Some(stored));
        }
        let eff = self.effective(id);
        let mut draft = ChannelDraft::from_config(None);
        if let Some(kind) = eff.kind {
            draft.kind = kind;
        }
        draft.path = eff.path.unwrap_or_default();
        draft.media = eff.media;
        draft.icon = eff.icon;
        draft
    }

    pub fn launch_route(&self, id: &str) -> Result<LaunchRoute, LaunchError> {
        let request = LaunchRequest::from_effective(&self.effective(id))?;
        Ok(LaunchRoute::for_request(request, self.immersive_pip))
    }

    // ── Mutations ────────────────────────────────────────────────────────────

    /// Validate the draft path and, if it passes, merge and persist.
    pub fn save_channel(&mut self, id: &str, draft: ChannelDraft) -> Result<(), DeckError> {
        if let Validation::Invalid { reason } = validate(draft.kind, &draft.path) {
            tracing::debug!("save of {} blocked: {}", id, reason);
            return Err(DeckError::InvalidPath {
                id: id.to_string(),
                reason,
            });
        }
        tracing::info!("saving channel {} ({})", id, draft.kind);
        self.store.update(id, draft.into_patch());
        self.persist()
    }

    pub fn update_channel(&mut self, id: &str, patch: ChannelPatch) -> Result<(), DeckError> {
        self.store.update(id, patch);
        self.persist()
    }

    /// Clear the slot.  Legacy props for it are dropped too so the slot
    /// really reads as empty afterwards.
    pub fn clear_channel(&mut self, id: &str) -> Result<(), DeckError> {
        tracing::info!("clearing channel {}", id);
        self.store.clear(id);
        self.legacy.remove(id);
        self.persist()
    }

    /// Media-library selection callback.
    pub fn select_media(&mut self, id: &str, item: MediaItem) -> Result<(), DeckError> {
        tracing::debug!("media {:?} selected for {}", item.name, id);
        self.update_channel(id, ChannelPatch::default().with_media(Some(item.into())))
    }

    pub fn apply_preset(&mut self, preset: &ChannelPreset) -> Result<(), DeckError> {
        tracing::info!(
            "applying preset {:?} ({} channels)",
            preset.name,
            preset.channels.len()
        );
        self.store.apply_preset(preset);
        self.persist()
    }

    /// Apply the `index`-th loaded preset.  Out of range is a no-op.
    pub fn apply_preset_at(&mut self, index: usize) -> Result<Option<String>, DeckError> {
        let Some(preset) = self.presets.get(index).cloned() else {
            return Ok(None);
        };
        self.apply_preset(&preset)?;
        Ok(Some(preset.name))
    }

    /// Returns `Ok(false)` when there was no backup to restore.
    pub fn restore_user_channels(&mut self) -> Result<bool, DeckError> {
        if !self.store.restore_user_channels() {
            return Ok(false);
        }
        tracing::info!("restored user channels");
        self.persist()?;
        Ok(true)
    }

    fn persist(&self) -> Result<(), DeckError> {
        self.repository.set(self.store.snapshot()).map_err(|e| {
            tracing::error!("failed to persist channels: {:#}", e);
            DeckError::Persist(e)
        })
    }
}
