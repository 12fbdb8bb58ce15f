use super::{KeyValueStore, StorageError};
use fs2::FileExt;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// File name of the JSON document holding every key.
pub const STORE_FILE_NAME: &str = "local_storage.json";

/// Durable key-value store kept as one JSON object on disk.
///
/// Readers take a shared lock and writers an exclusive lock on a sibling
/// `.lock` file; writes land in a temporary file that is renamed over the
/// store so a crash never leaves a half-written document behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default location under the user's data directory.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|root| root.join("sketchpad"))
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(STORE_FILE_NAME)
    }

    fn lock_path(&self) -> PathBuf {
        self.dir.join(format!("{STORE_FILE_NAME}.lock"))
    }

    /// Last modification time of the store document, if it exists.
    pub fn modified(&self) -> Option<SystemTime> {
        fs::metadata(self.path()).and_then(|m| m.modified()).ok()
    }

    fn io_error(path: &Path, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn with_lock<T>(
        &self,
        exclusive: bool,
        body: impl FnOnce() -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let lock_path = self.lock_path();
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|err| Self::io_error(&lock_path, err))?;

        let locked = if exclusive {
            FileExt::lock_exclusive(&lock_file)
        } else {
            FileExt::lock_shared(&lock_file)
        };
        locked.map_err(|err| Self::io_error(&lock_path, err))?;

        let result = body();

        FileExt::unlock(&lock_file).unwrap_or_else(|err| {
            warn!(
                "failed to unlock storage file {}: {}",
                lock_path.display(),
                err
            )
        });

        result
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let path = self.path();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("No storage file at {}, treating as empty", path.display());
                return Ok(BTreeMap::new());
            }
            Err(err) => return Err(Self::io_error(&path, err)),
        };

        serde_json::from_slice(&bytes).map_err(|source| StorageError::Corrupt { path, source })
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let path = self.path();
        let payload = serde_json::to_vec_pretty(map).map_err(StorageError::Serialize)?;

        let tmp_path = temp_path(&path);
        {
            let mut tmp_file = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&tmp_path)
                .map_err(|err| Self::io_error(&tmp_path, err))?;
            tmp_file
                .write_all(&payload)
                .and_then(|_| tmp_file.sync_all())
                .map_err(|err| Self::io_error(&tmp_path, err))?;
        }

        fs::rename(&tmp_path, &path).map_err(|err| {
            fs::remove_file(&tmp_path).ok();
            Self::io_error(&path, err)
        })?;

        debug!("Wrote storage file {} ({} bytes)", path.display(), payload.len());
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        if !self.dir.exists() {
            return Ok(None);
        }
        self.with_lock(false, || Ok(self.read_map()?.remove(key)))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|err| Self::io_error(&self.dir, err))?;
        self.with_lock(true, || {
            let mut map = self.read_map()?;
            map.insert(key.to_string(), value.to_string());
            self.write_map(&map)
        })?;
        info!(
            "Stored '{}' in {} ({} bytes)",
            key,
            self.path().display(),
            value.len()
        );
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<bool, StorageError> {
        if !self.dir.exists() {
            return Ok(false);
        }
        self.with_lock(true, || {
            let mut map = self.read_map()?;
            if map.remove(key).is_none() {
                return Ok(false);
            }
            self.write_map(&map)?;
            Ok(true)
        })
    }
}

fn temp_path(target: &Path) -> PathBuf {
    let mut candidate = target.with_extension("json.tmp");
    let mut counter = 0u32;
    while candidate.exists() {
        counter += 1;
        candidate = target.with_extension(format!("json.tmp{counter}"));
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_reads_as_empty() {
        let temp = tempfile::tempdir().unwrap();
        let store = FileStore::new(temp.path().join("nowhere"));
        assert_eq!(store.get_item("canvasDoc").unwrap(), None);
        assert!(!temp.path().join("nowhere").exists());
        assert!(store.modified().is_none());
    }

    #[test]
    fn values_survive_a_new_instance() {
        let temp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(temp.path());
        store.set_item("canvasDoc", "first").unwrap();
        store.set_item("canvasDoc", "second").unwrap();
        store.set_item("other", "kept").unwrap();

        let reopened = FileStore::new(temp.path());
        assert_eq!(reopened.get_item("canvasDoc").unwrap().as_deref(), Some("second"));
        assert_eq!(reopened.get_item("other").unwrap().as_deref(), Some("kept"));
        assert!(reopened.modified().is_some());
    }

    #[test]
    fn remove_reports_whether_key_existed() {
        let temp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(temp.path());
        store.set_item("canvasDoc", "value").unwrap();
        assert!(store.remove_item("canvasDoc").unwrap());
        assert!(!store.remove_item("canvasDoc").unwrap());
        assert_eq!(store.get_item("canvasDoc").unwrap(), None);
    }

    #[test]
    fn corrupt_document_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join(STORE_FILE_NAME), "[1, 2, 3]").unwrap();
        let store = FileStore::new(temp.path());
        assert!(matches!(
            store.get_item("canvasDoc"),
            Err(StorageError::Corrupt { .. })
        ));
    }

    #[test]
    fn no_temporary_files_are_left_behind() {
        let temp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(temp.path());
        store.set_item("canvasDoc", "value").unwrap();

        let leftovers: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
