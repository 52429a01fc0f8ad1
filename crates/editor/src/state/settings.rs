//! Editor settings

use serde::{Deserialize, Serialize};
use shared::Color;

use super::history::{RedoPolicy, DEFAULT_MAX_ENTRIES};

/// Canvas surface created at init
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasSettings {
    /// Canvas width in canvas units
    pub width: f64,
    /// Canvas height in canvas units
    pub height: f64,
    /// Initial background color
    pub background: Color,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 600.0,
            background: Color::WHITE,
        }
    }
}

/// Undo/redo settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySettings {
    /// Maximum number of undo entries kept
    pub max_entries: usize,
    /// Redo stack handling on new edits
    #[serde(default)]
    pub redo_policy: RedoPolicy,
    /// Load persisted stacks when the editor initializes
    pub restore_on_init: bool,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            redo_policy: RedoPolicy::Discard,
            restore_on_init: true,
        }
    }
}

/// Image placement settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSettings {
    /// Space kept free around a placed image
    pub margin: f64,
    /// Request images with CORS so exports stay untainted
    pub cross_origin: bool,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            margin: 100.0,
            cross_origin: true,
        }
    }
}

/// Where the CLI keeps persisted history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory override; platform data dir when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

/// Raster export settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportSettings {
    /// TrueType/OpenType file used for text glyphs; block glyphs when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_path: Option<String>,
}

/// All editor settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditorSettings {
    #[serde(default)]
    pub canvas: CanvasSettings,
    #[serde(default)]
    pub history: HistorySettings,
    #[serde(default)]
    pub images: ImageSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub export: ExportSettings,
}

impl EditorSettings {
    /// Parse settings JSON, falling back to defaults for missing sections
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from file, or return default if not found
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        if let Some(dirs) = directories::ProjectDirs::from("com", "canvas", "canvas-editor") {
            let config_path = dirs.config_dir().join("settings.json");
            if let Ok(json) = std::fs::read_to_string(&config_path) {
                match Self::from_json(&json) {
                    Ok(settings) => return settings,
                    Err(e) => tracing::warn!(
                        "Ignoring invalid settings at {}: {e}",
                        config_path.display()
                    ),
                }
            }
        }
        Self::default()
    }

    /// Save settings to the platform config dir, returning the file written
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> std::io::Result<std::path::PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "canvas", "canvas-editor").ok_or_else(
            || std::io::Error::new(std::io::ErrorKind::NotFound, "no home directory"),
        )?;
        let config_dir = dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;
        let config_path = config_dir.join("settings.json");
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, json)?;
        Ok(config_path)
    }
}
