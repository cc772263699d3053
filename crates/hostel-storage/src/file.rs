//! File-backed [`SessionStore`].

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{SESSION_KEY, SessionStore, StorageError, validate_key};

/// Directory name under the platform data directory.
const APP_DIR: &str = "hostel-portal";

/// Stores the record as `<dir>/<key>.json`.
///
/// Writes go to `<key>.json.tmp` first and are then renamed over the real
/// file, so a crash mid-write leaves either the old record or the new one,
/// never half of each.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    tmp_path: PathBuf,
}

impl FileStore {
    /// Creates a store for `key` inside `dir`. The directory is created on
    /// first write, not here.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidKey`] if `key` isn't a plain file name.
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Result<Self, StorageError> {
        validate_key(key)?;
        let dir = dir.as_ref();
        Ok(Self {
            path: dir.join(format!("{key}.json")),
            tmp_path: dir.join(format!("{key}.json.tmp")),
        })
    }

    /// Creates a store for [`SESSION_KEY`] under the platform data directory
    /// (e.g. `~/.local/share/hostel-portal/` on Linux).
    ///
    /// # Errors
    /// Returns [`StorageError::Unavailable`] if the platform has no data
    /// directory (no home directory set).
    pub fn open_default() -> Result<Self, StorageError> {
        Self::new(Self::default_dir()?, SESSION_KEY)
    }

    /// The platform data directory for the portal.
    pub fn default_dir() -> Result<PathBuf, StorageError> {
        dirs::data_local_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| {
                StorageError::Unavailable(
                    "no local data directory on this platform".into(),
                )
            })
    }

    /// The file the record lives in.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(path: &Path, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl SessionStore for FileStore {
    async fn read(&self) -> Result<Option<Vec<u8>>, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(&self.path, e)),
        }
    }

    async fn write(&self, data: &[u8]) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| Self::io_error(dir, e))?;
        }

        tokio::fs::write(&self.tmp_path, data)
            .await
            .map_err(|e| Self::io_error(&self.tmp_path, e))?;
        tokio::fs::rename(&self.tmp_path, &self.path)
            .await
            .map_err(|e| Self::io_error(&self.path, e))?;

        tracing::debug!(path = %self.path.display(), bytes = data.len(), "record written");
        Ok(())
    }

    async fn delete(&self) -> Result<(), StorageError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "record deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(&self.path, e)),
        }
    }
}
