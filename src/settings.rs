use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE_NAME: &str = "floorsight_settings.json";

fn default_panel_activities() -> Vec<String> {
    vec![
        "Handle up".to_string(),
        "Handle center".to_string(),
        "Handle down".to_string(),
    ]
}

fn default_playback_speed() -> f32 {
    60.0
}

/// Persisted application settings. Every field is defaulted so older files
/// keep loading after new fields appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Heatmap labels show instance counts instead of durations.
    #[serde(default)]
    pub show_instances: bool,
    /// Aggregate member regions under their combination names.
    #[serde(default)]
    pub use_combined_regions: bool,
    /// Activity shown per heatmap panel.
    #[serde(default = "default_panel_activities")]
    pub panel_activities: Vec<String>,
    /// Timeline playback multiplier over wall time.
    #[serde(default = "default_playback_speed")]
    pub playback_speed: f32,
    #[serde(default)]
    pub last_dataset_path: Option<String>,
    #[serde(default)]
    pub last_floor_plan_path: Option<String>,
    #[serde(default)]
    pub last_layout_image_path: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            show_instances: false,
            use_combined_regions: false,
            panel_activities: default_panel_activities(),
            playback_speed: default_playback_speed(),
            last_dataset_path: None,
            last_floor_plan_path: None,
            last_layout_image_path: None,
        }
    }
}

pub fn resolve_settings_path() -> Result<PathBuf> {
    let config_dir = dirs_next::config_dir().context("locate user config directory")?;
    Ok(config_dir.join("floorsight").join(SETTINGS_FILE_NAME))
}

impl AppSettings {
    pub fn load(path: &Path) -> Result<AppSettings> {
        if !path.exists() {
            return Ok(AppSettings::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read settings file {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(AppSettings::default());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("deserialize settings file {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create settings folder {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("serialize settings")?;
        std::fs::write(path, json)
            .with_context(|| format!("write settings file {}", path.display()))
    }
}
