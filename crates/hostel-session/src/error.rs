//! Error types for the session layer.

use hostel_protocol::{ProtocolError, Role};
use hostel_storage::StorageError;

/// Errors that can occur while logging in or out.
///
/// Rehydration never produces one of these: unreadable storage is recovered
/// to a logged-out session inside the repository.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The server rejected the staff credentials. Carries the server's
    /// message, or a generic fallback when it sent none.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The staff-login request never got a usable answer: the server was
    /// unreachable, timed out, or replied with a body we can't parse.
    #[error("network error: {0}")]
    Network(String),

    /// Persisting or deleting the record failed. A login that can't be
    /// persisted is reported as failed even if the server accepted it.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The record couldn't be encoded, or the server's answer produced a
    /// record that breaks the record invariants.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The login request was rejected before any flow ran (missing
    /// credentials, wrong flow for the role).
    #[error("invalid login request: {0}")]
    Validation(String),

    /// A login called later than this one committed first; this result
    /// was discarded without touching storage.
    #[error("login superseded by a later login")]
    Superseded,
}

impl SessionError {
    /// A message suitable for the login screen of a user signing in as
    /// `role`.
    pub fn user_message(&self, role: &Role) -> String {
        match self {
            Self::Authentication(message) => message.clone(),
            Self::Validation(message) => message.clone(),
            Self::Network(_) if role.is_staff() => {
                "Could not reach the hostel server to verify your staff \
                 credentials. Check your connection and try again."
                    .to_string()
            }
            Self::Network(_) => {
                "Could not reach the hostel server. Check your connection \
                 and try again."
                    .to_string()
            }
            Self::Storage(_) => {
                "Your session could not be saved on this device. Free some \
                 space and try again."
                    .to_string()
            }
            Self::Protocol(_) => {
                "The hostel server sent an unexpected response. Please try \
                 again later."
                    .to_string()
            }
            Self::Superseded => {
                "Another sign-in finished first.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_authentication_is_server_message() {
        let err = SessionError::Authentication("Invalid credentials".into());
        assert_eq!(err.user_message(&Role::Admin), "Invalid credentials");
    }

    #[test]
    fn test_user_message_network_mentions_staff_for_staff_roles() {
        let err = SessionError::Network("connection refused".into());
        assert!(err.user_message(&Role::Admin).contains("staff"));
        assert!(!err.user_message(&Role::Student).contains("staff"));
    }

    #[test]
    fn test_user_message_superseded_makes_no_claim_about_session() {
        let message = SessionError::Superseded.user_message(&Role::Student);
        assert_eq!(message, "Another sign-in finished first.");
    }

    #[test]
    fn test_from_storage_error() {
        let err: SessionError =
            StorageError::Unavailable("disk gone".into()).into();
        assert!(matches!(err, SessionError::Storage(_)));
        assert!(err.to_string().contains("disk gone"));
    }
}
