//! Unified error type for the hostel portal.

use hostel_announcements::AnnouncementError;
use hostel_client::ClientError;
use hostel_protocol::ProtocolError;
use hostel_session::SessionError;
use hostel_storage::StorageError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `hostel` facade you deal with this single error type
/// instead of importing errors from each sub-crate. The `#[from]` attribute
/// on each variant generates the `From` impls, so `?` converts sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum HostelError {
    /// Encoding, decoding, or an invalid record.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The session store couldn't be opened or used.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Login or logout failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// An announcement call failed.
    #[error(transparent)]
    Announcement(#[from] AnnouncementError),

    /// The HTTP client couldn't be configured.
    #[error(transparent)]
    Client(#[from] ClientError),
}
