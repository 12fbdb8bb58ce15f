//! Configuration file support for sketchpad.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/sketchpad/config.toml`. Settings cover where the canvas is
//! persisted, where downloads go, extra palette colors, and keybindings.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod keybindings;
pub mod types;

pub use enums::ColorSpec;
pub use keybindings::{Action, KeyBinding, KeybindingsConfig};
pub use types::{ExportConfig, PerformanceConfig, StorageConfig, UiConfig};

use crate::draw::Color;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [storage]
/// key = "canvasDoc"
///
/// [export]
/// directory = "~/Pictures/sketches"
///
/// [ui]
/// palette = ["#20b2aa", [128, 0, 128]]
/// confirm_save = true
///
/// [keybindings]
/// save = ["Ctrl+S"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Persisted canvas location
    #[serde(default)]
    pub storage: StorageConfig,

    /// Download location and file name
    #[serde(default)]
    pub export: ExportConfig,

    /// UI display preferences
    #[serde(default)]
    pub ui: UiConfig,

    /// Performance tuning options
    #[serde(default)]
    pub performance: PerformanceConfig,

    /// Keyboard shortcuts per action
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped or replaced with their defaults and a warning is logged.
    ///
    /// Validated fields:
    /// - `storage.key`: must not be empty
    /// - `export.filename`: must be a bare, non-empty file name
    /// - `ui.palette`: unknown color names are dropped
    /// - `buffer_count`: 2 - 4
    pub fn validate_and_clamp(&mut self) {
        if self.storage.key.trim().is_empty() {
            warn!("Empty storage key, falling back to '{}'", types::default_storage_key());
            self.storage.key = types::default_storage_key();
        }

        let filename = self.export.filename.trim();
        if filename.is_empty() || filename.contains(['/', '\\']) || filename == ".." {
            warn!(
                "Invalid export filename '{}', falling back to '{}'",
                self.export.filename,
                types::default_export_filename()
            );
            self.export.filename = types::default_export_filename();
        }

        self.ui.palette.retain(|spec| {
            let known = spec.to_color().is_some();
            if !known {
                warn!("Unknown palette color {:?}, ignoring", spec);
            }
            known
        });

        // Buffer count: 2 - 4
        if !(2..=4).contains(&self.performance.buffer_count) {
            warn!(
                "Invalid buffer_count {}, clamping to 2-4 range",
                self.performance.buffer_count
            );
            self.performance.buffer_count = self.performance.buffer_count.clamp(2, 4);
        }
    }

    /// Extra palette colors after validation.
    pub fn extra_palette(&self) -> Vec<Color> {
        self.ui.palette.iter().filter_map(ColorSpec::to_color).collect()
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/sketchpad/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("sketchpad");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default path, or returns defaults if not found.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Loads configuration from `config_path`, or returns defaults if it does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or contains invalid TOML.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Creates a default configuration file with documentation comments.
    ///
    /// # Errors
    /// Returns an error if a config file already exists at the target path
    /// or the file cannot be written.
    pub fn create_default_file() -> Result<PathBuf> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        fs::write(&config_path, Self::example_toml())
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Created default config at {}", config_path.display());
        Ok(config_path)
    }

    /// The documented example configuration shipped with the crate.
    pub fn example_toml() -> &'static str {
        include_str!("../../config.example.toml")
    }

    /// JSON schema of the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::load_from(&temp.path().join("config.toml")).unwrap();
        assert_eq!(config.storage.key, "canvasDoc");
        assert_eq!(config.export.filename, "canvas_img.png");
        assert!(config.ui.confirm_save);
        assert_eq!(config.performance.buffer_count, 3);
    }

    #[test]
    fn example_config_parses_cleanly() {
        let config: Config = toml::from_str(Config::example_toml()).unwrap();
        assert_eq!(config.storage.key, "canvasDoc");
        config.keybindings.build_action_map().unwrap();
    }

    #[test]
    fn invalid_values_are_clamped_on_load() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r##"
[storage]
key = "  "

[export]
filename = "../escape.png"

[ui]
palette = ["teal-ish", "#123456", [1, 2, 3]]

[performance]
buffer_count = 9
"##,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.storage.key, "canvasDoc");
        assert_eq!(config.export.filename, "canvas_img.png");
        assert_eq!(config.ui.palette.len(), 2);
        assert_eq!(config.extra_palette()[0].to_hex(), "#123456");
        assert_eq!(config.performance.buffer_count, 4);
    }

    #[test]
    fn bad_toml_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[storage\nkey = 1").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn directories_expand_tilde() {
        let config: Config = toml::from_str(
            r#"
[storage]
directory = "/tmp/sketch-store"

[export]
directory = "~/sketches"
"#,
        )
        .unwrap();
        assert_eq!(
            config.storage.resolved_directory(),
            Some(PathBuf::from("/tmp/sketch-store"))
        );
        let download = config.export.download_config();
        assert!(!download.directory.to_string_lossy().starts_with('~'));
        assert!(download.directory.ends_with("sketches"));
    }

    #[test]
    fn schema_names_every_section() {
        let schema = serde_json::to_string(&Config::json_schema()).unwrap();
        for section in ["storage", "export", "ui", "performance", "keybindings"] {
            assert!(schema.contains(section), "schema missing {section}");
        }
    }
}
