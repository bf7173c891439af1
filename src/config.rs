//! Configuration persistence
//!
//! Stores user preferences in `~/.config/gridedit/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::DEFAULT_DOUBLE_CLICK_MS;

/// Configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridEditConfig {
    /// Window in milliseconds within which a second click starts editing
    #[serde(default = "default_double_click_ms")]
    pub double_click_ms: u64,

    /// Max length applied to cells whose data source reports none
    #[serde(default)]
    pub default_max_length: Option<usize>,

    /// Character used when a masked value is shown as text
    #[serde(default = "default_mask_char")]
    pub mask_char: char,
}

fn default_double_click_ms() -> u64 {
    DEFAULT_DOUBLE_CLICK_MS
}

fn default_mask_char() -> char {
    '*'
}

impl Default for GridEditConfig {
    fn default() -> Self {
        Self {
            double_click_ms: default_double_click_ms(),
            default_max_length: None,
            mask_char: default_mask_char(),
        }
    }
}

impl GridEditConfig {
    /// Load config from the default location, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific file, falling back to defaults on any error
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<Self>(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config.sanitized()
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to a specific file
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// A zero window would make double clicks impossible
    fn sanitized(mut self) -> Self {
        if self.double_click_ms == 0 {
            tracing::warn!(
                "double_click_ms must be positive, using {}",
                DEFAULT_DOUBLE_CLICK_MS
            );
            self.double_click_ms = DEFAULT_DOUBLE_CLICK_MS;
        }
        self
    }
}
