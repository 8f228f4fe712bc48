//! Channel persistence plus the read-only legacy and preset files.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;

use crate::channel::{ChannelMap, ChannelMedia, ChannelType};
use crate::resolve::LegacyChannelProps;
use crate::store::ChannelPreset;

/// Full-map load/replace of the persisted channels.
pub trait ChannelRepository: Send {
    fn get(&self) -> anyhow::Result<ChannelMap>;
    fn set(&self, channels: &ChannelMap) -> anyhow::Result<()>;
}

// ── JSON file ─────────────────────────────────────────────────────────────────

/// Pretty-printed JSON map at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonChannelFile {
    path: PathBuf,
}

impl JsonChannelFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChannelRepository for JsonChannelFile {
    /// A missing file is an empty grid.
    fn get(&self) -> anyhow::Result<ChannelMap> {
        if !self.path.exists() {
            return Ok(ChannelMap::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(ChannelMap::new());
        }
        let mut channels: ChannelMap = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        // The map key is authoritative for the slot id.
        for (id, config) in channels.iter_mut() {
            if config.id != *id {
                config.id = id.clone();
            }
        }
        Ok(channels)
    }

    fn set(&self, channels: &ChannelMap) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(channels)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("writing {}", self.path.display()))?;
        tracing::debug!("saved {} channels to {}", channels.len(), self.path.display());
        Ok(())
    }
}

// ── In-memory ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemoryRepository {
    channels: Mutex<ChannelMap>,
    fail_writes: bool,
}

impl MemoryRepository {
    pub fn new(channels: ChannelMap) -> Self {
        Self {
            channels: Mutex::new(channels),
            fail_writes: false,
        }
    }

    /// A repository whose `set` always errors.
    pub fn failing() -> Self {
        Self {
            channels: Mutex::default(),
            fail_writes: true,
        }
    }
}

impl ChannelRepository for MemoryRepository {
    fn get(&self) -> anyhow::Result<ChannelMap> {
        let channels = self
            .channels
            .lock()
            .map_err(|_| anyhow::anyhow!("channel map lock poisoned"))?;
        Ok(channels.clone())
    }

    fn set(&self, channels: &ChannelMap) -> anyhow::Result<()> {
        if self.fail_writes {
            anyhow::bail!("repository is read-only");
        }
        let mut stored = self
            .channels
            .lock()
            .map_err(|_| anyhow::anyhow!("channel map lock poisoned"))?;
        *stored = channels.clone();
        Ok(())
    }
}

// ── Legacy props ──────────────────────────────────────────────────────────────

/// Matches the pre-store TOML layout.  Kept separate from
/// `LegacyChannelProps` so either can change without the other.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct LegacyFile {
    media_map: BTreeMap<String, ChannelMedia>,
    app_path_map: BTreeMap<String, String>,
    channel_props: BTreeMap<String, LegacyChannelProps>,
}

pub fn load_legacy_props(path: &Path) -> anyhow::Result<HashMap<String, LegacyChannelProps>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    parse_legacy_props(&content)
}

pub fn parse_legacy_props(content: &str) -> anyhow::Result<HashMap<String, LegacyChannelProps>> {
    let file: LegacyFile = toml::from_str(content)?;
    let mut props: HashMap<String, LegacyChannelProps> = file.channel_props.into_iter().collect();

    for (id, media) in file.media_map {
        let entry = props.entry(id).or_default();
        if entry.media.is_none() {
            entry.media = Some(media);
        }
    }
    for (id, path) in file.app_path_map {
        let entry = props.entry(id).or_default();
        if entry.path.is_none() {
            entry.path = Some(path);
        }
    }
    // Old files never stored a type; infer it from the path.
    for entry in props.values_mut() {
        if entry.kind.is_none() {
            entry.kind = entry.path.as_deref().map(infer_legacy_type);
        }
    }
    props.retain(|_, p| !p.is_blank());
    Ok(props)
}

fn infer_legacy_type(path: &str) -> ChannelType {
    let path = path.trim();
    if path.starts_with("steam://") {
        ChannelType::Steam
    } else if path.starts_with("com.epicgames.launcher://") {
        ChannelType::Epic
    } else if path.to_ascii_lowercase().contains(".exe") || path.starts_with("\\\\") {
        ChannelType::Exe
    } else {
        ChannelType::Url
    }
}

// ── Presets ───────────────────────────────────────────────────────────────────

/// Every `*.json` preset in `dir`, sorted by file name.  Unreadable files are
/// skipped with a warning.
pub fn load_presets(dir: &Path) -> Vec<ChannelPreset> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    files
        .into_iter()
        .filter_map(|path| match read_preset(&path) {
            Ok(preset) => Some(preset),
            Err(e) => {
                tracing::warn!("skipping preset {}: {:#}", path.display(), e);
                None
            }
        })
        .collect()
}

fn read_preset(path: &Path) -> anyhow::Result<ChannelPreset> {
    let content = std::fs::read_to_string(path)?;
    let mut preset: ChannelPreset = serde_json::from_str(&content)?;
    if preset.name.is_empty() {
        preset.name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    for (id, config) in preset.channels.iter_mut() {
        config.id = id.clone();
    }
    Ok(preset)
}
