//! Session state management for the hostel portal.
//!
//! This crate answers "who is using the portal right now?":
//!
//! 1. **Login** — a caller-chosen [`LoginRequest`]: credentialed staff login
//!    verified by an [`Authenticator`], or a local role-only login.
//! 2. **Persistence** — the resulting record is written through a
//!    [`SessionStore`](hostel_storage::SessionStore) before anyone sees it.
//! 3. **Rehydration** — at start-up the stored record is read back once;
//!    unreadable storage means "logged out", never an error.
//! 4. **Logout** — the stored record is deleted, then the in-memory one.
//!
//! [`SessionRepository`] owns all of it. Screens hold a clone of the
//! repository (or a [`watch`](tokio::sync::watch) receiver from
//! [`SessionRepository::subscribe`]) and react to [`SessionSnapshot`]s.
//!
//! # How it fits in the stack
//!
//! ```text
//! Portal facade / screens (above)  ← read snapshots, call login/logout
//!     ↕
//! Session Layer (this crate)  ← verify → persist → commit
//!     ↕
//! Protocol + Storage (below)  ← record shape, durable bytes
//! ```

#![allow(async_fn_in_trait)]

mod auth;
mod directory;
mod error;
mod repository;
mod request;
mod session;

pub use auth::{Authenticator, OfflineAuthenticator, StaffCredentials};
pub use directory::{DemoStudentDirectory, StudentDirectory};
pub use error::SessionError;
pub use repository::SessionRepository;
pub use request::LoginRequest;
pub use session::{SessionConfig, SessionSnapshot};
