use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::channel::{HoverSound, KenBurnsMode};
use super::navigation::{GridGeometry, NavigationMode, TransitionTiming};
use super::platform;
use super::resolve::GlobalChannelDefaults;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub channels: ChannelsConfig,
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_columns")]
    pub columns: usize,
    #[serde(default = "default_rows")]
    pub rows: usize,
    #[serde(default = "default_total_channels")]
    pub total_channels: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    #[serde(default = "default_nav_mode")]
    pub mode: NavigationMode,
    /// Page chrome style; also picks the transition length.
    #[serde(default = "default_chrome")]
    pub chrome: TransitionTiming,
}

/// Global channel defaults plus the ambient grid behaviours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelsConfig {
    #[serde(default)]
    pub animated_on_hover: bool,
    #[serde(default)]
    pub ken_burns_enabled: bool,
    #[serde(default = "default_ken_burns_mode")]
    pub ken_burns_mode: KenBurnsMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover_sound: Option<HoverSound>,
    /// Played when a channel is launched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_sound: Option<String>,
    #[serde(default)]
    pub idle_animation_enabled: bool,
    #[serde(default = "default_idle_interval")]
    pub idle_animation_interval_secs: u64,
    /// Seconds without input before the grid dims; 0 disables.
    #[serde(default = "default_auto_fade")]
    pub auto_fade_timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Open URL channels in the picture-in-picture window instead of the
    /// system browser.
    #[serde(default)]
    pub immersive_pip: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Persisted channel map.  Defaults to `<data_dir>/channels.json`.
    #[serde(default = "default_channels_file")]
    pub channels_file: PathBuf,
    /// Optional pre-store per-channel props.
    /// Defaults to `<config_dir>/legacy_channels.toml`.
    #[serde(default = "default_legacy_file")]
    pub legacy_file: PathBuf,
    /// Directory of `*.json` channel presets.
    #[serde(default = "default_presets_dir")]
    pub presets_dir: PathBuf,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            rows: default_rows(),
            total_channels: default_total_channels(),
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            mode: default_nav_mode(),
            chrome: default_chrome(),
        }
    }
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            animated_on_hover: false,
            ken_burns_enabled: false,
            ken_burns_mode: default_ken_burns_mode(),
            hover_sound: None,
            click_sound: None,
            idle_animation_enabled: false,
            idle_animation_interval_secs: default_idle_interval(),
            auto_fade_timeout_secs: default_auto_fade(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            channels_file: default_channels_file(),
            legacy_file: default_legacy_file(),
            presets_dir: default_presets_dir(),
        }
    }
}

fn default_columns() -> usize {
    4
}

fn default_rows() -> usize {
    3
}

fn default_total_channels() -> usize {
    36
}

fn default_nav_mode() -> NavigationMode {
    NavigationMode::Wii
}

fn default_chrome() -> TransitionTiming {
    TransitionTiming::Wii
}

fn default_ken_burns_mode() -> KenBurnsMode {
    KenBurnsMode::Hover
}

fn default_idle_interval() -> u64 {
    8
}

fn default_auto_fade() -> u64 {
    5
}

fn default_channels_file() -> PathBuf {
    platform::data_dir().join("channels.json")
}

fn default_legacy_file() -> PathBuf {
    platform::config_dir().join("legacy_channels.toml")
}

fn default_presets_dir() -> PathBuf {
    platform::config_dir().join("presets")
}

impl GridConfig {
    /// Zero dimensions are bumped to 1 so the page maths stays defined.
    pub fn geometry(&self) -> GridGeometry {
        GridGeometry::new(self.columns, self.rows)
    }
}

impl ChannelsConfig {
    pub fn global_defaults(&self) -> GlobalChannelDefaults {
        GlobalChannelDefaults {
            animated_on_hover: Some(self.animated_on_hover),
            ken_burns_enabled: Some(self.ken_burns_enabled),
            ken_burns_mode: Some(self.ken_burns_mode),
            hover_sound: self.hover_sound.clone(),
            as_admin: None,
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            navigation: NavigationConfig::default(),
            channels: ChannelsConfig::default(),
            general: GeneralConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.grid.columns, 4);
        assert_eq!(config.grid.rows, 3);
        assert_eq!(config.grid.total_channels, 36);
        assert_eq!(config.navigation.mode, NavigationMode::Wii);
        assert_eq!(config.channels.auto_fade_timeout_secs, 5);
        assert!(!config.general.immersive_pip);
        assert!(config.paths.channels_file.ends_with("channels.json"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [grid]
            columns = 5

            [navigation]
            mode = "simple"
            chrome = "dots"

            [channels]
            ken_burns_mode = "autoplay"
            "#,
        )
        .unwrap();
        assert_eq!(config.grid.columns, 5);
        assert_eq!(config.grid.rows, 3);
        assert_eq!(config.navigation.mode, NavigationMode::Simple);
        assert_eq!(config.navigation.chrome, TransitionTiming::Dots);
        assert_eq!(config.channels.ken_burns_mode, KenBurnsMode::Autoplay);
        assert_eq!(config.channels.idle_animation_interval_secs, 8);
    }

    #[test]
    fn test_default_config_roundtrips_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.grid.total_channels, 36);
        assert!(back.channels.hover_sound.is_none());
    }

    #[test]
    fn test_global_defaults_from_channels_section() {
        let mut channels = ChannelsConfig::default();
        channels.animated_on_hover = true;
        let globals = channels.global_defaults();
        assert_eq!(globals.animated_on_hover, Some(true));
        assert_eq!(globals.ken_burns_mode, Some(KenBurnsMode::Hover));
        assert!(globals.as_admin.is_none());
    }
}
