//! In-process [`SessionStore`] for tests and throwaway runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::sync::Mutex;

use crate::{SessionStore, StorageError};

/// Keeps the record in memory. Clones share the same slot, so a test can
/// hand one clone to a repository and inspect the other.
///
/// The store can be switched to a failing mode with
/// [`set_failing`](Self::set_failing) to exercise storage-error paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    slot: Mutex<Option<Vec<u8>>>,
    writes: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `data`, as if a previous process
    /// had written it.
    pub fn with_data(data: impl Into<Vec<u8>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                slot: Mutex::new(Some(data.into())),
                ..Inner::default()
            }),
        }
    }

    /// Makes every subsequent operation fail with
    /// [`StorageError::Unavailable`] (or succeed again with `false`).
    pub fn set_failing(&self, failing: bool) {
        self.inner.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.inner.failing.load(Ordering::SeqCst) {
            Err(StorageError::Unavailable("memory store is failing".into()))
        } else {
            Ok(())
        }
    }
}

impl SessionStore for MemoryStore {
    async fn read(&self) -> Result<Option<Vec<u8>>, StorageError> {
        self.check()?;
        Ok(self.inner.slot.lock().await.clone())
    }

    async fn write(&self, data: &[u8]) -> Result<(), StorageError> {
        self.check()?;
        *self.inner.slot.lock().await = Some(data.to_vec());
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self) -> Result<(), StorageError> {
        self.check()?;
        *self.inner.slot.lock().await = None;
        Ok(())
    }
}
