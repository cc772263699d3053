//! Error types for the announcement board.

use hostel_protocol::AnnouncementId;

/// Errors that can occur during announcement operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnnouncementError {
    /// The server couldn't be reached or sent a body we can't parse.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("server rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The announcement doesn't exist (anymore) on the server.
    #[error("announcement {0} not found")]
    NotFound(AnnouncementId),

    /// The draft was rejected before any request was sent.
    #[error("invalid announcement: {0}")]
    Validation(String),
}
