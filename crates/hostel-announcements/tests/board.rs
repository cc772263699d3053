//! Integration tests for the announcement board against an in-memory API.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use chrono::{DateTime, TimeZone, Utc};
use hostel_announcements::{AnnouncementApi, AnnouncementBoard, AnnouncementError};
use hostel_protocol::{Announcement, AnnouncementDraft, AnnouncementId};
use tokio::sync::{Mutex, Notify};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Server stand-in: a list behind a mutex, plus switches for failures.
#[derive(Default)]
struct FakeApi {
    rows: Mutex<Vec<Announcement>>,
    next_id: AtomicUsize,
    calls: AtomicUsize,
    failing: AtomicBool,
    gate: Option<Arc<Notify>>,
}

impl FakeApi {
    fn with_rows(rows: Vec<Announcement>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    async fn before_call(&self) -> Result<(), AnnouncementError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(AnnouncementError::Network("connection refused".into()));
        }
        Ok(())
    }
}

impl AnnouncementApi for FakeApi {
    async fn list(&self) -> Result<Vec<Announcement>, AnnouncementError> {
        self.before_call().await?;
        Ok(self.rows.lock().await.clone())
    }

    async fn create(&self, draft: &AnnouncementDraft) -> Result<Announcement, AnnouncementError> {
        self.before_call().await?;
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = from_draft(AnnouncementId(format!("new-{n}")), draft);
        self.rows.lock().await.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: &AnnouncementId,
        draft: &AnnouncementDraft,
    ) -> Result<Announcement, AnnouncementError> {
        self.before_call().await?;
        let mut rows = self.rows.lock().await;
        let row = rows
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| AnnouncementError::NotFound(id.clone()))?;
        *row = from_draft(id.clone(), draft);
        Ok(row.clone())
    }

    async fn delete(&self, id: &AnnouncementId) -> Result<(), AnnouncementError> {
        self.before_call().await?;
        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|a| &a.id != id);
        if rows.len() == before {
            return Err(AnnouncementError::NotFound(id.clone()));
        }
        Ok(())
    }
}

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, d, 9, 0, 0).unwrap()
}

fn from_draft(id: AnnouncementId, draft: &AnnouncementDraft) -> Announcement {
    Announcement {
        id,
        message: draft.message.clone(),
        details: draft.details.clone(),
        start_date: draft.start_date,
        end_date: draft.end_date,
        is_active: draft.is_active,
        created_by: Some("warden".into()),
        created_at: None,
    }
}

fn row(id: &str, start: u32, end: u32, active: bool) -> Announcement {
    Announcement {
        id: id.into(),
        message: format!("notice {id}"),
        details: None,
        start_date: day(start),
        end_date: day(end),
        is_active: active,
        created_by: None,
        created_at: None,
    }
}

fn draft(message: &str, start: u32, end: u32) -> AnnouncementDraft {
    AnnouncementDraft {
        message: message.into(),
        details: None,
        start_date: day(start),
        end_date: day(end),
        is_active: true,
    }
}

fn ids(list: &[Announcement]) -> Vec<String> {
    list.iter().map(|a| a.id.0.clone()).collect()
}

// ---------------------------------------------------------------------------
// Refresh and ordering
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_refresh_orders_newest_start_first_then_id() {
    let board = AnnouncementBoard::new(FakeApi::with_rows(vec![
        row("b", 5, 9, true),
        row("c", 7, 9, true),
        row("a", 5, 9, true),
    ]));

    let list = board.refresh().await.unwrap();

    assert_eq!(ids(&list), ["c", "a", "b"]);
    assert_eq!(ids(&board.announcements()), ["c", "a", "b"]);
    assert!(!board.is_loading());
    assert_eq!(board.error(), None);
}

#[tokio::test]
async fn test_active_at_filters_inactive_and_out_of_window() {
    let board = AnnouncementBoard::new(FakeApi::with_rows(vec![
        row("live", 1, 20, true),
        row("off", 1, 20, false),
        row("expired", 1, 3, true),
        row("future", 15, 20, true),
    ]));
    board.refresh().await.unwrap();

    assert_eq!(ids(&board.active_at(day(10))), ["live"]);
}

#[tokio::test]
async fn test_refresh_failure_keeps_list_and_sets_error() {
    let board = AnnouncementBoard::new(FakeApi::with_rows(vec![row("a", 1, 2, true)]));
    board.refresh().await.unwrap();

    board.api().failing.store(true, Ordering::SeqCst);
    let err = board.refresh().await.unwrap_err();

    assert!(matches!(err, AnnouncementError::Network(_)));
    assert_eq!(ids(&board.announcements()), ["a"]);
    assert!(board.error().unwrap().contains("connection refused"));
    assert!(!board.is_loading());
}

#[tokio::test]
async fn test_next_call_clears_previous_error() {
    let board = AnnouncementBoard::new(FakeApi::default());
    board.api().failing.store(true, Ordering::SeqCst);
    let _ = board.refresh().await;
    assert!(board.error().is_some());

    board.api().failing.store(false, Ordering::SeqCst);
    board.refresh().await.unwrap();

    assert_eq!(board.error(), None);
}

// ---------------------------------------------------------------------------
// Create / update / delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_create_adds_announcement_in_order() {
    let board = AnnouncementBoard::new(FakeApi::with_rows(vec![row("old", 1, 2, true)]));
    board.refresh().await.unwrap();

    let created = board.create(&draft("Mess timings changed", 4, 6)).await.unwrap();

    assert_eq!(created.id, AnnouncementId("new-0".into()));
    assert_eq!(ids(&board.announcements()), ["new-0", "old"]);
}

#[tokio::test]
async fn test_create_blank_message_rejected_without_server_call() {
    let board = AnnouncementBoard::new(FakeApi::default());

    let err = board.create(&draft("   ", 1, 2)).await.unwrap_err();

    assert!(matches!(err, AnnouncementError::Validation(_)));
    assert_eq!(board.api().calls.load(Ordering::SeqCst), 0);
    assert!(board.error().is_some());
}

#[tokio::test]
async fn test_update_replaces_by_id_and_reorders() {
    let board = AnnouncementBoard::new(FakeApi::with_rows(vec![
        row("a", 3, 9, true),
        row("b", 2, 9, true),
    ]));
    board.refresh().await.unwrap();

    let updated = board
        .update(&"b".into(), &draft("Lift maintenance", 5, 9))
        .await
        .unwrap();

    assert_eq!(updated.message, "Lift maintenance");
    let list = board.announcements();
    assert_eq!(ids(&list), ["b", "a"]);
    assert_eq!(list[0].message, "Lift maintenance");
}

#[tokio::test]
async fn test_update_inverted_window_rejected() {
    let board = AnnouncementBoard::new(FakeApi::with_rows(vec![row("a", 3, 9, true)]));
    board.refresh().await.unwrap();

    let err = board
        .update(&"a".into(), &draft("Fire drill", 9, 3))
        .await
        .unwrap_err();

    assert!(matches!(err, AnnouncementError::Validation(_)));
    assert_eq!(board.announcements()[0].message, "notice a");
}

#[tokio::test]
async fn test_delete_removes_locally() {
    let board = AnnouncementBoard::new(FakeApi::with_rows(vec![
        row("a", 3, 9, true),
        row("b", 2, 9, true),
    ]));
    board.refresh().await.unwrap();

    board.delete(&"a".into()).await.unwrap();

    assert_eq!(ids(&board.announcements()), ["b"]);
}

#[tokio::test]
async fn test_delete_missing_on_server_drops_stale_copy() {
    let board = AnnouncementBoard::new(FakeApi::with_rows(vec![row("a", 3, 9, true)]));
    board.refresh().await.unwrap();
    board.api().rows.lock().await.clear();

    let err = board.delete(&"a".into()).await.unwrap_err();

    assert_eq!(err, AnnouncementError::NotFound("a".into()));
    assert!(board.announcements().is_empty());
}

// ---------------------------------------------------------------------------
// Loading flag
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_loading_flag_set_while_call_pending() {
    let gate = Arc::new(Notify::new());
    let api = FakeApi {
        gate: Some(Arc::clone(&gate)),
        ..FakeApi::default()
    };
    let board = AnnouncementBoard::new(api);
    let mut updates = board.subscribe();

    let pending = tokio::spawn({
        let board = board.clone();
        async move { board.refresh().await }
    });

    updates.wait_for(|s| s.loading).await.unwrap();
    assert!(board.is_loading());

    gate.notify_one();
    pending.await.unwrap().unwrap();

    assert!(!board.is_loading());
}
