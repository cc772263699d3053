use std::future::Future;

use hostel_protocol::{Announcement, AnnouncementDraft, AnnouncementId};

use crate::AnnouncementError;

/// Server calls behind the announcement board.
///
/// Maps to `GET/POST/PUT/DELETE {base}/announcements[/{id}]` in the HTTP
/// implementation.
pub trait AnnouncementApi: Send + Sync + 'static {
    /// Fetches every announcement.
    fn list(
        &self,
    ) -> impl Future<Output = Result<Vec<Announcement>, AnnouncementError>> + Send;

    /// Creates an announcement and returns it with its server-assigned id.
    fn create(
        &self,
        draft: &AnnouncementDraft,
    ) -> impl Future<Output = Result<Announcement, AnnouncementError>> + Send;

    /// Replaces the editable fields of announcement `id`.
    fn update(
        &self,
        id: &AnnouncementId,
        draft: &AnnouncementDraft,
    ) -> impl Future<Output = Result<Announcement, AnnouncementError>> + Send;

    /// Deletes announcement `id`.
    fn delete(
        &self,
        id: &AnnouncementId,
    ) -> impl Future<Output = Result<(), AnnouncementError>> + Send;
}
