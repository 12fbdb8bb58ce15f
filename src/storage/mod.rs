//! Persistence of the saved canvas.
//!
//! The canvas is kept under a single key as a PNG data URL. Stores implement
//! [`KeyValueStore`]; the application uses [`FileStore`] on disk and tests or
//! `--ephemeral` sessions use [`MemoryStore`].

pub mod data_url;
mod file;

pub use file::{FileStore, STORE_FILE_NAME};

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::SystemTime;
use thiserror::Error;

/// Key the canvas snapshot is stored under unless configured otherwise.
pub const DEFAULT_SNAPSHOT_KEY: &str = "canvasDoc";

/// Errors raised by the storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage file {path} is not a JSON object of strings: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialise storage: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("stored value is not a PNG data URL")]
    NotPngDataUrl,

    #[error("invalid base64 in stored value: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// String key-value persistence, shaped like a browser's local storage.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes `value`, replacing whatever was stored under `key`.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes `key`, returning whether it was present.
    fn remove_item(&mut self, key: &str) -> Result<bool, StorageError>;
}

/// Store that lives only as long as the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<bool, StorageError> {
        Ok(self.items.remove(key).is_some())
    }
}

/// Persists `png` under `key`, overwriting any earlier save.
pub fn store_snapshot(
    store: &mut dyn KeyValueStore,
    key: &str,
    png: &[u8],
) -> Result<(), StorageError> {
    store.set_item(key, &data_url::encode_png(png))
}

/// Reads the PNG stored under `key`, or `None` if nothing was saved.
pub fn load_snapshot(store: &dyn KeyValueStore, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
    store
        .get_item(key)?
        .map(|url| data_url::decode_png(&url))
        .transpose()
}

/// Summary of the on-disk store for CLI reporting.
#[derive(Debug, Clone)]
pub struct SnapshotInspection {
    pub store_path: PathBuf,
    pub key: String,
    pub exists: bool,
    pub size_bytes: Option<u64>,
    pub modified: Option<SystemTime>,
    pub value_bytes: Option<usize>,
    pub png_bytes: Option<usize>,
    pub dimensions: Option<(u32, u32)>,
}

/// Inspect the store file and the snapshot kept under `key`.
pub fn inspect_snapshot(store: &FileStore, key: &str) -> Result<SnapshotInspection> {
    let store_path = store.path();
    let metadata = std::fs::metadata(&store_path).ok();

    let value = if metadata.is_some() {
        store
            .get_item(key)
            .with_context(|| format!("failed to read {}", store_path.display()))?
    } else {
        None
    };

    let png = value
        .as_deref()
        .map(data_url::decode_png)
        .transpose()
        .with_context(|| format!("value under '{key}' is not a readable PNG"))?;

    Ok(SnapshotInspection {
        exists: metadata.is_some(),
        size_bytes: metadata.as_ref().map(|m| m.len()),
        modified: store.modified(),
        value_bytes: value.as_ref().map(String::len),
        png_bytes: png.as_ref().map(Vec::len),
        dimensions: png.as_deref().and_then(png_dimensions),
        store_path,
        key: key.to_string(),
    })
}

/// Remove the snapshot under `key`, returning whether one was present.
pub fn clear_snapshot(store: &mut FileStore, key: &str) -> Result<bool> {
    store
        .remove_item(key)
        .with_context(|| format!("failed to update {}", store.path().display()))
}

/// Reads width and height from the IHDR chunk.
fn png_dimensions(png: &[u8]) -> Option<(u32, u32)> {
    if png.get(12..16)? != b"IHDR" {
        return None;
    }
    let width = u32::from_be_bytes(png.get(16..20)?.try_into().ok()?);
    let height = u32::from_be_bytes(png.get(20..24)?.try_into().ok()?);
    Some((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{Surface, color::BLUE};

    fn sample_png() -> Vec<u8> {
        let surface = Surface::with_size(30, 12).unwrap();
        surface.fill(BLUE).unwrap();
        surface.encode_png().unwrap()
    }

    #[test]
    fn memory_store_behaves_like_local_storage() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_item("k").unwrap(), None);
        store.set_item("k", "a").unwrap();
        store.set_item("k", "b").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("b"));
        assert!(store.remove_item("k").unwrap());
        assert!(!store.remove_item("k").unwrap());
    }

    #[test]
    fn snapshot_is_stored_as_data_url() {
        let mut store = MemoryStore::new();
        let png = sample_png();
        store_snapshot(&mut store, DEFAULT_SNAPSHOT_KEY, &png).unwrap();

        let raw = store.get_item(DEFAULT_SNAPSHOT_KEY).unwrap().unwrap();
        assert!(raw.starts_with("data:image/png;base64,"));
        assert_eq!(
            load_snapshot(&store, DEFAULT_SNAPSHOT_KEY).unwrap(),
            Some(png)
        );
    }

    #[test]
    fn missing_snapshot_loads_as_none() {
        let store = MemoryStore::new();
        assert_eq!(load_snapshot(&store, DEFAULT_SNAPSHOT_KEY).unwrap(), None);
    }

    #[test]
    fn inspect_reports_dimensions_of_saved_png() {
        let temp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(temp.path());

        let empty = inspect_snapshot(&store, DEFAULT_SNAPSHOT_KEY).unwrap();
        assert!(!empty.exists);
        assert!(empty.dimensions.is_none());
        assert!(empty.modified.is_none());

        store_snapshot(&mut store, DEFAULT_SNAPSHOT_KEY, &sample_png()).unwrap();
        let info = inspect_snapshot(&store, DEFAULT_SNAPSHOT_KEY).unwrap();
        assert!(info.exists);
        assert_eq!(info.modified, store.modified());
        assert!(info.modified.is_some());
        assert_eq!(info.dimensions, Some((30, 12)));
        assert!(info.value_bytes.unwrap() > info.png_bytes.unwrap());
    }

    #[test]
    fn clear_removes_only_the_snapshot_key() {
        let temp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(temp.path());
        store_snapshot(&mut store, DEFAULT_SNAPSHOT_KEY, &sample_png()).unwrap();
        store.set_item("unrelated", "x").unwrap();

        assert!(clear_snapshot(&mut store, DEFAULT_SNAPSHOT_KEY).unwrap());
        assert!(!clear_snapshot(&mut store, DEFAULT_SNAPSHOT_KEY).unwrap());
        assert_eq!(store.get_item("unrelated").unwrap().as_deref(), Some("x"));
    }
}
