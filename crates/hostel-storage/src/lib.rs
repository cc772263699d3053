//! Storage abstraction for the persisted session record.
//!
//! Provides the [`SessionStore`] trait: read, write, and delete ONE opaque
//! blob under a fixed key. The session layer encodes the record; this crate
//! never looks inside the bytes.
//!
//! # Feature Flags
//!
//! - `fs` (default) — [`FileStore`], a file under the platform data
//!   directory, written with `tokio::fs`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "fs")]
mod file;
mod memory;

pub use error::StorageError;
#[cfg(feature = "fs")]
pub use file::FileStore;
pub use memory::MemoryStore;

use std::future::Future;

/// Storage key of the session record.
pub const SESSION_KEY: &str = "hostel.session";

/// Durable storage for a single serialized record.
///
/// # Trait bounds
///
/// - `Send + Sync` → the store is shared by every clone of the session
///   repository, across Tokio tasks.
/// - `'static` → it lives as long as the process.
///
/// The methods return `impl Future + Send` (instead of plain `async fn`)
/// so callers can move login/logout futures into `tokio::spawn`.
/// Implementations may still write them as `async fn`.
pub trait SessionStore: Send + Sync + 'static {
    /// Reads the stored bytes.
    ///
    /// Returns `Ok(None)` when nothing has been written (or it was deleted).
    fn read(
        &self,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, StorageError>> + Send;

    /// Replaces the stored bytes. After `Ok(())`, a [`read`](Self::read)
    /// returns exactly `data`, including after a process restart.
    fn write(
        &self,
        data: &[u8],
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Removes the stored bytes. Deleting when nothing is stored succeeds.
    fn delete(&self) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Checks that a storage key is usable as a file name on every platform.
#[cfg_attr(not(feature = "fs"), allow(dead_code))]
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
