//! The announcement board: a local, ordered mirror of the server's list.

use std::cmp::Ordering as CmpOrdering;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use hostel_protocol::{Announcement, AnnouncementDraft, AnnouncementId};
use tokio::sync::watch;

use crate::{AnnouncementApi, AnnouncementError};

/// What announcement screens render, published on every change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardSnapshot {
    /// Newest `start_date` first; ties broken by id.
    pub announcements: Vec<Announcement>,

    /// `true` while any board call is waiting on the server.
    pub loading: bool,

    /// Message of the most recent failed call. Cleared when a new call
    /// starts.
    pub error: Option<String>,
}

/// Holds the announcement list and keeps it in step with the server.
///
/// Every call follows the same pattern:
///
/// ```text
/// loading=true, error=None ──→ server call ──→ Ok:  update list by id
///                                          └─→ Err: error=Some(message)
///                          loading=false (both paths)
/// ```
///
/// Cloning is cheap and clones share the same list.
pub struct AnnouncementBoard<A> {
    inner: Arc<Inner<A>>,
}

impl<A> Clone for AnnouncementBoard<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<A> {
    api: A,
    state: watch::Sender<BoardSnapshot>,
    in_flight: AtomicUsize,
}

impl<A: AnnouncementApi> AnnouncementBoard<A> {
    /// Creates an empty board. Call [`refresh`](Self::refresh) to load it.
    pub fn new(api: A) -> Self {
        let (state, _) = watch::channel(BoardSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                api,
                state,
                in_flight: AtomicUsize::new(0),
            }),
        }
    }

    /// The API the board talks to.
    pub fn api(&self) -> &A {
        &self.inner.api
    }

    /// A copy of the current list.
    pub fn announcements(&self) -> Vec<Announcement> {
        self.inner.state.borrow().announcements.clone()
    }

    /// Announcements switched on whose window contains `now`.
    pub fn active_at(&self, now: DateTime<Utc>) -> Vec<Announcement> {
        self.inner
            .state
            .borrow()
            .announcements
            .iter()
            .filter(|a| a.is_live_at(now))
            .cloned()
            .collect()
    }

    /// Returns `true` while a call is waiting on the server.
    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    /// The last error message, if the most recent call failed.
    pub fn error(&self) -> Option<String> {
        self.inner.state.borrow().error.clone()
    }

    /// Subscribes to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<BoardSnapshot> {
        self.inner.state.subscribe()
    }

    /// Replaces the local list with the server's.
    pub async fn refresh(&self) -> Result<Vec<Announcement>, AnnouncementError> {
        let mut fetched = self.track("list", self.inner.api.list()).await?;
        fetched.sort_by(newest_first);
        self.inner.state.send_modify(|snapshot| {
            snapshot.announcements = fetched.clone();
        });
        tracing::debug!(count = fetched.len(), "announcements refreshed");
        Ok(fetched)
    }

    /// Creates an announcement and adds it to the list.
    pub async fn create(
        &self,
        draft: &AnnouncementDraft,
    ) -> Result<Announcement, AnnouncementError> {
        self.check_draft(draft)?;
        let created = self.track("create", self.inner.api.create(draft)).await?;
        self.upsert(created.clone());
        tracing::info!(id = %created.id, "announcement created");
        Ok(created)
    }

    /// Updates an announcement and replaces it in the list.
    pub async fn update(
        &self,
        id: &AnnouncementId,
        draft: &AnnouncementDraft,
    ) -> Result<Announcement, AnnouncementError> {
        self.check_draft(draft)?;
        let result = self.track("update", self.inner.api.update(id, draft)).await;
        match result {
            Ok(updated) => {
                self.upsert(updated.clone());
                tracing::info!(%id, "announcement updated");
                Ok(updated)
            }
            Err(e) => {
                self.forget_if_gone(id, &e);
                Err(e)
            }
        }
    }

    /// Deletes an announcement and removes it from the list.
    pub async fn delete(&self, id: &AnnouncementId) -> Result<(), AnnouncementError> {
        let result = self.track("delete", self.inner.api.delete(id)).await;
        match result {
            Ok(()) => {
                self.remove(id);
                tracing::info!(%id, "announcement deleted");
                Ok(())
            }
            Err(e) => {
                self.forget_if_gone(id, &e);
                Err(e)
            }
        }
    }

    // =====================================================================
    // Internals
    // =====================================================================

    /// Runs one server call with the loading/error bookkeeping around it.
    async fn track<T>(
        &self,
        action: &'static str,
        call: impl Future<Output = Result<T, AnnouncementError>>,
    ) -> Result<T, AnnouncementError> {
        let in_flight = &self.inner.in_flight;
        self.inner.state.send_modify(|snapshot| {
            in_flight.fetch_add(1, Ordering::SeqCst);
            snapshot.loading = true;
            snapshot.error = None;
        });

        let result = call.await;

        self.inner.state.send_modify(|snapshot| {
            let remaining = in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
            snapshot.loading = remaining > 0;
            if let Err(e) = &result {
                snapshot.error = Some(e.to_string());
            }
        });
        if let Err(e) = &result {
            tracing::warn!(action, error = %e, "announcement call failed");
        }
        result
    }

    fn check_draft(&self, draft: &AnnouncementDraft) -> Result<(), AnnouncementError> {
        match draft.problem() {
            None => Ok(()),
            Some(problem) => {
                let error = AnnouncementError::Validation(problem.to_string());
                self.inner.state.send_modify(|snapshot| {
                    snapshot.error = Some(error.to_string());
                });
                Err(error)
            }
        }
    }

    fn upsert(&self, announcement: Announcement) {
        self.inner.state.send_modify(|snapshot| {
            let list = &mut snapshot.announcements;
            match list.iter_mut().find(|a| a.id == announcement.id) {
                Some(existing) => *existing = announcement,
                None => list.push(announcement),
            }
            list.sort_by(newest_first);
        });
    }

    fn remove(&self, id: &AnnouncementId) {
        self.inner.state.send_if_modified(|snapshot| {
            let before = snapshot.announcements.len();
            snapshot.announcements.retain(|a| &a.id != id);
            snapshot.announcements.len() != before
        });
    }

    /// The server no longer has `id`; drop the stale local copy too.
    fn forget_if_gone(&self, id: &AnnouncementId, error: &AnnouncementError) {
        if matches!(error, AnnouncementError::NotFound(_)) {
            self.remove(id);
        }
    }
}

fn newest_first(a: &Announcement, b: &Announcement) -> CmpOrdering {
    b.start_date
        .cmp(&a.start_date)
        .then_with(|| a.id.cmp(&b.id))
}
