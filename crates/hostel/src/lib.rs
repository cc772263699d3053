//! # Hostel
//!
//! Session and announcement core of the campus hostel portal.
//!
//! A [`Portal`] answers "who is using the portal right now?" and keeps the
//! hostel notice board in sync with the server. Screens read the session,
//! subscribe to changes, and call `login` / `logout`; the portal handles
//! storage, rehydration, staff verification over HTTP, and token plumbing.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hostel::prelude::*;
//!
//! # async fn run() -> Result<(), HostelError> {
//! hostel::init_tracing();
//!
//! let portal = Portal::builder().build().await?;
//! if !portal.is_logged_in() {
//!     portal
//!         .login(LoginRequest::staff(Role::Admin, "wrdshwe1051", "hostel@123"))
//!         .await?;
//! }
//! portal.refresh_announcements().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Crates
//!
//! | Crate | Role |
//! |---|---|
//! | `hostel-protocol` | session record, wire bodies, codec |
//! | `hostel-storage` | where the record is persisted |
//! | `hostel-session` | login, logout, rehydration |
//! | `hostel-announcements` | the notice board |
//! | `hostel-client` | base URL and HTTP |

mod error;
mod portal;

pub use error::HostelError;
pub use portal::{Portal, PortalBuilder};

use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Does nothing if a global subscriber is already set, so tests and
/// binaries can both call it.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Everything a screen usually needs, in one import.
pub mod prelude {
    pub use crate::{HostelError, Portal, PortalBuilder, init_tracing};
    pub use hostel_announcements::{AnnouncementBoard, AnnouncementError, BoardSnapshot};
    pub use hostel_client::{
        BaseUrl, ClientConfig, HttpClient, Platform, RuntimeTarget, resolve_base_url,
    };
    pub use hostel_protocol::{
        Announcement, AnnouncementDraft, AnnouncementId, Role, SessionRecord, StudentProfile,
    };
    pub use hostel_session::{LoginRequest, SessionConfig, SessionError, SessionSnapshot};
    pub use hostel_storage::{FileStore, MemoryStore, SessionStore};
}
