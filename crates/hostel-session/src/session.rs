//! Session configuration and the snapshot published to subscribers.

use hostel_protocol::SessionRecord;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for login behavior.
///
/// `#[derive(Clone)]` because the portal builder keeps a copy while the
/// repository owns another.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Whether a staff role may log in WITHOUT credentials, getting a
    /// locally synthesized session with the placeholder token.
    ///
    /// Default: `false`. Such a session claims a privileged role that no
    /// server ever verified; only switch this on for UI testing against a
    /// mock backend. Every such login is logged at `warn`.
    pub allow_mock_staff: bool,
}

// ---------------------------------------------------------------------------
// SessionSnapshot
// ---------------------------------------------------------------------------

/// Everything a screen needs to render auth-dependent UI, published on
/// every change.
///
/// ```text
///   rehydrating=true, session=None          (process start)
///            │ rehydrate()
///            ▼
///   rehydrating=false, session=Some(record) ──login()/logout()──┐
///            ▲                                                  │
///            └──────────────────────────────────────────────────┘
/// ```
///
/// `login_loading` flips independently while any login is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// The last-resolved session. `None` until the first commit (normally
    /// the end of rehydration).
    pub session: Option<SessionRecord>,

    /// `true` from construction until the initial storage read completes.
    pub rehydrating: bool,

    /// `true` while at least one login is in flight.
    pub login_loading: bool,
}

impl SessionSnapshot {
    /// The snapshot of a freshly constructed repository.
    pub(crate) fn initial() -> Self {
        Self {
            session: None,
            rehydrating: true,
            login_loading: false,
        }
    }

    /// Returns `true` if a logged-in session is current.
    pub fn is_logged_in(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_logged_in)
    }
}
