use std::path::PathBuf;

/// Errors that can occur in the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The underlying medium failed (permissions, full disk, ...).
    #[error("storage I/O failed at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The storage key can't be used as a file name.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// No storage location is available on this platform, or the store
    /// was switched off.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
