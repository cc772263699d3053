//! Data shapes shared by every layer of the hostel portal.
//!
//! This crate defines the "vocabulary" the rest of the workspace speaks:
//!
//! - **Session types** ([`SessionRecord`], [`Role`], [`StudentProfile`]) —
//!   who is logged in, as what, and the read-only profile behind a student.
//! - **Wire bodies** ([`StaffLoginBody`], [`StaffLoginResponse`],
//!   [`ErrorBody`]) — the JSON exchanged with the hostel API.
//! - **Announcements** ([`Announcement`], [`AnnouncementDraft`]) — the
//!   notice-board documents served under `/announcements`.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how records become the
//!   bytes that land in durable storage.
//! - **Errors** ([`ProtocolError`]).
//!
//! # How it fits in the stack
//!
//! ```text
//! Session Layer (above)  ← builds, persists, and commits SessionRecords
//!     ↕
//! Protocol Layer (this crate)  ← record shapes + JSON encoding
//!     ↕
//! Storage Layer (beside)  ← only ever sees opaque bytes
//! ```

mod announcement;
mod codec;
mod error;
mod types;
mod wire;

pub use announcement::{Announcement, AnnouncementDraft, AnnouncementId};
pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    DEMO_STUDENT_ID, MOCK_TOKEN, Role, SessionRecord, StaffRole, StudentProfile,
};
pub use wire::{ErrorBody, StaffLoginBody, StaffLoginResponse, StaffUser};
