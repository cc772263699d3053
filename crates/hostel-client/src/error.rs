//! Error types for building the HTTP client.
//!
//! Request-time failures are not here: a failed staff login is a
//! [`SessionError`](hostel_session::SessionError) and a failed board call an
//! [`AnnouncementError`](hostel_announcements::AnnouncementError), so the
//! layers above see the error type of the operation they called.

/// Errors that can occur while configuring the client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The underlying reqwest client couldn't be built (TLS backend, etc.).
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),

    /// The base URL isn't an absolute `http(s)://` URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// An environment variable holds a value we can't use.
    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },
}
