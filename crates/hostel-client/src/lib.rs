//! HTTP access to the hostel API.
//!
//! Two pieces:
//!
//! - **Base-URL resolution** ([`resolve_base_url`], [`BaseUrl::from_env`]):
//!   where the API lives depends on where the portal runs (browser, Android
//!   emulator, iOS simulator, phone on the LAN).
//! - **[`HttpClient`]**: a reqwest client that implements the session
//!   layer's [`Authenticator`](hostel_session::Authenticator) and the
//!   board's [`AnnouncementApi`](hostel_announcements::AnnouncementApi).
//!
//! ```text
//! hostel-session ──Authenticator──┐
//!                                 ├──→ HttpClient ──reqwest──→ {base}/...
//! hostel-announcements ──Api──────┘
//! ```

mod base_url;
mod config;
mod error;
mod http;

pub use base_url::{BaseUrl, DEFAULT_API_PORT, Platform, RuntimeTarget, resolve_base_url};
pub use config::ClientConfig;
pub use error::ClientError;
pub use http::HttpClient;
