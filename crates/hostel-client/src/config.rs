//! Configuration for the HTTP client.

use std::time::Duration;

/// Settings for [`HttpClient`](crate::HttpClient).
///
/// Same shape as the other config types in the workspace: a plain struct
/// with a [`Default`] that works out of the box.
///
/// ```rust
/// use std::time::Duration;
/// use hostel_client::ClientConfig;
///
/// let config = ClientConfig {
///     request_timeout: Duration::from_secs(5),
/// };
/// assert_ne!(config, ClientConfig::default());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Upper bound for a whole request, connect through body.
    /// Defaults to 15 seconds.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(15),
        }
    }
}
