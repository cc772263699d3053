//! Authentication hook for verifying staff credentials.
//!
//! The session layer doesn't talk HTTP itself. It defines the
//! [`Authenticator`] trait: one async method that takes staff credentials
//! and returns the server's answer or an error. The HTTP client crate
//! implements it against `POST {base}/auth/staff-login`; tests implement it
//! with a scripted fake.
//!
//! # Why a trait?
//!
//! - The real portal verifies credentials over the network.
//! - A demo or offline build has no server at all ([`OfflineAuthenticator`]).
//! - Tests need to control timing and failures precisely.
//!
//! All without changing the repository.

use std::future::Future;

use hostel_protocol::StaffLoginResponse;
use secrecy::SecretString;

use crate::SessionError;

/// A staff id and password, as typed on the login screen.
///
/// The password is a [`SecretString`]: its `Debug` output is redacted, so a
/// stray `tracing::debug!(?credentials)` can't leak it. Call
/// [`ExposeSecret::expose_secret`](secrecy::ExposeSecret::expose_secret)
/// only where the plain text is actually needed (building the request body).
#[derive(Debug)]
pub struct StaffCredentials {
    pub staff_id: String,
    pub password: SecretString,
}

/// Verifies staff credentials and returns the server's identity + token.
///
/// # Trait bounds
///
/// - `Send + Sync` → the authenticator is shared by every clone of the
///   repository and may be called from any Tokio worker thread.
/// - `'static` → it lives as long as the repository.
///
/// # Example
///
/// ```rust
/// use hostel_protocol::{StaffLoginResponse, StaffUser};
/// use hostel_session::{Authenticator, SessionError, StaffCredentials};
///
/// /// Accepts one hard-coded staff id. Only for local development!
/// struct DevAuthenticator;
///
/// impl Authenticator for DevAuthenticator {
///     async fn verify_staff(
///         &self,
///         credentials: &StaffCredentials,
///     ) -> Result<StaffLoginResponse, SessionError> {
///         if credentials.staff_id != "dev-warden" {
///             return Err(SessionError::Authentication("Invalid credentials".into()));
///         }
///         Ok(StaffLoginResponse {
///             token: "dev-token".into(),
///             user: StaffUser {
///                 role: "admin".into(),
///                 sub_role: Some("rector".into()),
///                 name: "Dev Warden".into(),
///             },
///         })
///     }
/// }
/// ```
pub trait Authenticator: Send + Sync + 'static {
    /// Checks `credentials` with the authority.
    ///
    /// # Returns
    /// - `Ok(StaffLoginResponse)` — accepted; carries the token and user
    /// - `Err(SessionError::Authentication)` — rejected by the server
    /// - `Err(SessionError::Network)` — no usable answer
    fn verify_staff(
        &self,
        credentials: &StaffCredentials,
    ) -> impl Future<Output = Result<StaffLoginResponse, SessionError>> + Send;
}

/// An [`Authenticator`] for builds without a server: every staff login
/// fails with [`SessionError::Network`]. Local (role-only) logins still work.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineAuthenticator;

impl Authenticator for OfflineAuthenticator {
    async fn verify_staff(
        &self,
        credentials: &StaffCredentials,
    ) -> Result<StaffLoginResponse, SessionError> {
        tracing::debug!(
            staff_id = %credentials.staff_id,
            "staff login attempted without a server"
        );
        Err(SessionError::Network(
            "no hostel server is configured".into(),
        ))
    }
}
