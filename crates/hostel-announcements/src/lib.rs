//! Announcement board state for the hostel portal.
//!
//! The board keeps a local, ordered copy of the announcements and mirrors
//! every change the server accepts:
//!
//! - [`AnnouncementApi`] — the four server calls (list, create, update,
//!   delete); the HTTP client crate implements it.
//! - [`AnnouncementBoard`] — the in-memory list plus a loading flag and the
//!   last error message, published as a [`BoardSnapshot`].
//! - [`AnnouncementError`] — what a board call can fail with.
//!
//! Same failure idiom as the session layer: the server round-trip comes
//! first, the local list only changes on success, and failures come back
//! as a typed error (and as the snapshot's error message for screens).

#![allow(async_fn_in_trait)]

mod api;
mod board;
mod error;

pub use api::AnnouncementApi;
pub use board::{AnnouncementBoard, BoardSnapshot};
pub use error::AnnouncementError;
