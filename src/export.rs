//! Writing saved canvases to the downloads directory.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name the canvas is downloaded under.
pub const DEFAULT_DOWNLOAD_NAME: &str = "canvas_img.png";

/// Highest `name (N).ext` suffix tried before giving up.
const MAX_DEDUP_SUFFIX: u32 = 9999;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write download: {0}")]
    Io(#[from] std::io::Error),

    #[error("no free file name for {0} in the download directory")]
    NoFreeName(String),
}

/// Where downloads go and what they are called.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    pub directory: PathBuf,
    pub filename: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            directory: default_download_dir(),
            filename: DEFAULT_DOWNLOAD_NAME.to_string(),
        }
    }
}

/// The user's download directory, falling back to home and then the cwd.
pub fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

/// Candidate path for the `attempt`-th collision: `name (N).ext`.
fn numbered_name(filename: &str, attempt: u32) -> String {
    if attempt == 0 {
        return filename.to_string();
    }
    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());
    match path.extension() {
        Some(ext) => format!("{} ({}).{}", stem, attempt, ext.to_string_lossy()),
        None => format!("{} ({})", stem, attempt),
    }
}

/// Save `png` as a download, never overwriting an existing file.
///
/// Collisions are resolved the way browsers do it: `canvas_img.png`, then
/// `canvas_img (1).png`, `canvas_img (2).png` and so on.
pub fn save_download(png: &[u8], config: &DownloadConfig) -> Result<PathBuf, ExportError> {
    if !config.directory.exists() {
        log::info!("Creating download directory: {}", config.directory.display());
        fs::create_dir_all(&config.directory)?;
    }

    for attempt in 0..=MAX_DEDUP_SUFFIX {
        let path = config.directory.join(numbered_name(&config.filename, attempt));
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err.into()),
        };

        log::info!("Downloading canvas to {} ({} bytes)", path.display(), png.len());
        discard_on_error(&path, || {
            file.write_all(png)?;
            file.sync_all()?;

            #[cfg(unix)]
            {
                use std::fs::Permissions;
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&path, Permissions::from_mode(0o600))?;
            }
            Ok(())
        })?;

        return Ok(path);
    }

    Err(ExportError::NoFreeName(config.filename.clone()))
}

/// Runs `write` for the file just created at `path` and deletes it on failure.
///
/// A truncated download would otherwise keep its name taken for later saves.
fn discard_on_error(
    path: &Path,
    write: impl FnOnce() -> std::io::Result<()>,
) -> Result<(), ExportError> {
    let Err(err) = write() else {
        return Ok(());
    };
    if let Err(remove_err) = fs::remove_file(path) {
        log::warn!(
            "Failed to remove partial download {}: {}",
            path.display(),
            remove_err
        );
    }
    Err(err.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &Path) -> DownloadConfig {
        DownloadConfig {
            directory: dir.to_path_buf(),
            filename: DEFAULT_DOWNLOAD_NAME.to_string(),
        }
    }

    #[test]
    fn first_download_uses_plain_name() {
        let temp = tempfile::tempdir().unwrap();
        let path = save_download(b"png", &config_in(temp.path())).unwrap();
        assert_eq!(path, temp.path().join("canvas_img.png"));
        assert_eq!(fs::read(&path).unwrap(), b"png");
    }

    #[test]
    fn repeated_downloads_are_numbered() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_in(temp.path());
        save_download(b"one", &config).unwrap();
        let second = save_download(b"two", &config).unwrap();
        let third = save_download(b"three", &config).unwrap();

        assert_eq!(second.file_name().unwrap(), "canvas_img (1).png");
        assert_eq!(third.file_name().unwrap(), "canvas_img (2).png");
        assert_eq!(fs::read(temp.path().join("canvas_img.png")).unwrap(), b"one");
    }

    #[test]
    fn creates_missing_directory() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("a/b");
        let path = save_download(b"x", &config_in(&nested)).unwrap();
        assert!(path.starts_with(&nested));
    }

    #[cfg(unix)]
    #[test]
    fn download_is_private_to_user() {
        use std::os::unix::fs::PermissionsExt;
        let temp = tempfile::tempdir().unwrap();
        let path = save_download(b"x", &config_in(temp.path())).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn failed_write_frees_the_name() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(DEFAULT_DOWNLOAD_NAME);
        fs::write(&path, b"trunc").unwrap();

        let err = discard_on_error(&path, || Err(std::io::Error::other("disk full")));
        assert!(matches!(err, Err(ExportError::Io(_))));
        assert!(!path.exists());

        // The next save gets the plain name back instead of "(1)".
        let saved = save_download(b"png", &config_in(temp.path())).unwrap();
        assert_eq!(saved, path);
    }

    #[test]
    fn successful_write_keeps_the_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(DEFAULT_DOWNLOAD_NAME);
        fs::write(&path, b"png").unwrap();
        discard_on_error(&path, || Ok(())).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"png");
    }

    #[test]
    fn numbered_name_without_extension() {
        assert_eq!(numbered_name("canvas", 3), "canvas (3)");
        assert_eq!(numbered_name("canvas_img.png", 0), "canvas_img.png");
    }

    #[test]
    fn expand_tilde_leaves_absolute_paths() {
        assert_eq!(expand_tilde("/tmp/x"), PathBuf::from("/tmp/x"));
        assert!(!expand_tilde("~/Downloads").to_string_lossy().starts_with('~'));
    }
}
