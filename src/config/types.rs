//! Configuration type definitions.

use super::enums::ColorSpec;
use crate::export::{DEFAULT_DOWNLOAD_NAME, DownloadConfig, default_download_dir, expand_tilde};
use crate::storage::{DEFAULT_SNAPSHOT_KEY, FileStore};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the saved canvas is persisted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StorageConfig {
    /// Directory holding `local_storage.json`. Defaults to `~/.local/share/sketchpad`.
    /// A leading `~/` is expanded to the home directory
    #[serde(default)]
    pub directory: Option<String>,

    /// Key the canvas is stored under
    #[serde(default = "default_storage_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            directory: None,
            key: default_storage_key(),
        }
    }
}

impl StorageConfig {
    /// Resolved storage directory, or `None` if no data directory can be found.
    pub fn resolved_directory(&self) -> Option<PathBuf> {
        match &self.directory {
            Some(dir) => Some(expand_tilde(dir)),
            None => FileStore::default_dir(),
        }
    }
}

/// Download settings for the Save action.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExportConfig {
    /// Download directory. Defaults to the XDG downloads directory
    #[serde(default)]
    pub directory: Option<String>,

    /// File name of the download; existing files are never overwritten,
    /// a ` (N)` suffix is added instead
    #[serde(default = "default_export_filename")]
    pub filename: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: None,
            filename: default_export_filename(),
        }
    }
}

impl ExportConfig {
    pub fn download_config(&self) -> DownloadConfig {
        DownloadConfig {
            directory: self
                .directory
                .as_deref()
                .map(expand_tilde)
                .unwrap_or_else(default_download_dir),
            filename: self.filename.clone(),
        }
    }
}

/// UI preferences.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UiConfig {
    /// Extra swatches shown after the built-in palette
    #[serde(default)]
    pub palette: Vec<ColorSpec>,

    /// Ask for confirmation before downloading on Save
    #[serde(default = "default_confirm_save")]
    pub confirm_save: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            palette: Vec::new(),
            confirm_save: default_confirm_save(),
        }
    }
}

/// Performance tuning options.
///
/// These settings control rendering performance and smoothness. Most users
/// won't need to change these from their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PerformanceConfig {
    /// Number of shm buffers in the pool (valid range: 2 - 4)
    /// - 2 = double buffering (lower memory)
    /// - 3 = triple buffering (recommended)
    /// - 4 = quad buffering (highest memory)
    #[serde(default = "default_buffer_count")]
    pub buffer_count: u32,

    /// Throttle redraws to compositor frame callbacks
    /// Set to false for lower latency at the cost of extra repaints
    #[serde(default = "default_enable_vsync")]
    pub enable_vsync: bool,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            buffer_count: default_buffer_count(),
            enable_vsync: default_enable_vsync(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

pub(super) fn default_storage_key() -> String {
    DEFAULT_SNAPSHOT_KEY.to_string()
}

pub(super) fn default_export_filename() -> String {
    DEFAULT_DOWNLOAD_NAME.to_string()
}

fn default_confirm_save() -> bool {
    true
}

fn default_buffer_count() -> u32 {
    3
}

fn default_enable_vsync() -> bool {
    true
}
