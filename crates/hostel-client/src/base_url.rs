//! Working out where the hostel API lives.
//!
//! The API always listens on `{host}:{port}/api`; only the host changes with
//! where the portal runs:
//!
//! ```text
//! Web                                   → http://localhost:{port}/api
//! Device, debugger host "192.168.1.20"  → http://192.168.1.20:{port}/api
//! Android emulator, no debugger host    → http://10.0.2.2:{port}/api
//! iOS simulator, no debugger host       → http://localhost:{port}/api
//! ```
//!
//! `10.0.2.2` is the Android emulator's alias for the host machine's
//! loopback interface.

use std::fmt;

use crate::ClientError;

/// Port the hostel API listens on unless told otherwise.
pub const DEFAULT_API_PORT: u16 = 5000;

const ANDROID_HOST_LOOPBACK: &str = "10.0.2.2";

/// Mobile platform of a device build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Android,
    Ios,
}

/// Where the portal is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeTarget {
    /// A browser on the development machine.
    Web,

    /// A phone or emulator.
    Device {
        platform: Platform,
        /// Address of the development server the device was launched from,
        /// e.g. `"192.168.1.20:8081"` or `"exp://192.168.1.20:8081"`.
        debugger_host: Option<String>,
    },
}

impl RuntimeTarget {
    /// Parses `web`, `android` or `ios` (any case).
    pub fn parse(value: &str) -> Option<Self> {
        let platform = match value.trim().to_ascii_lowercase().as_str() {
            "web" => return Some(Self::Web),
            "android" => Platform::Android,
            "ios" => Platform::Ios,
            _ => return None,
        };
        Some(Self::Device {
            platform,
            debugger_host: None,
        })
    }
}

/// Absolute API root, without a trailing slash (`http://localhost:5000/api`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// Wraps an explicit URL. It must start with `http://` or `https://`;
    /// trailing slashes are dropped.
    pub fn new(url: impl Into<String>) -> Result<Self, ClientError> {
        let url = url.into();
        let trimmed = url.trim().trim_end_matches('/');
        let rest = trimmed
            .strip_prefix("http://")
            .or_else(|| trimmed.strip_prefix("https://"));
        match rest {
            Some(rest) if !rest.is_empty() => Ok(Self(trimmed.to_string())),
            _ => Err(ClientError::InvalidBaseUrl(url)),
        }
    }

    /// Builds the base URL from the process environment.
    ///
    /// | Variable | Meaning |
    /// |---|---|
    /// | `HOSTEL_API_BASE_URL` | explicit URL; wins over everything else |
    /// | `HOSTEL_RUNTIME_TARGET` | `web`, `android` or `ios` (default `web`) |
    /// | `HOSTEL_DEBUGGER_HOST` | debugger/tunnel address of a device build |
    /// | `HOSTEL_API_PORT` | API port (default 5000) |
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<Self, ClientError> {
        let var = |name| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = var("HOSTEL_API_BASE_URL") {
            return Self::new(url);
        }

        let mut target = match var("HOSTEL_RUNTIME_TARGET") {
            Some(value) => RuntimeTarget::parse(&value).ok_or(ClientError::InvalidEnv {
                name: "HOSTEL_RUNTIME_TARGET",
                value,
            })?,
            None => RuntimeTarget::Web,
        };
        if let RuntimeTarget::Device { debugger_host, .. } = &mut target {
            *debugger_host = var("HOSTEL_DEBUGGER_HOST");
        }

        let port = match var("HOSTEL_API_PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ClientError::InvalidEnv {
                name: "HOSTEL_API_PORT",
                value,
            })?,
            None => DEFAULT_API_PORT,
        };

        Ok(resolve_base_url(&target, port))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Appends an endpoint path: `join("/auth/staff-login")`.
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Picks the API root for `target`.
pub fn resolve_base_url(target: &RuntimeTarget, port: u16) -> BaseUrl {
    let host = match target {
        RuntimeTarget::Web => "localhost",
        RuntimeTarget::Device {
            platform,
            debugger_host,
        } => match debugger_host.as_deref().and_then(host_of) {
            Some(host) => host,
            None if *platform == Platform::Android => ANDROID_HOST_LOOPBACK,
            None => "localhost",
        },
    };
    BaseUrl(format!("http://{host}:{port}/api"))
}

/// `"exp://192.168.1.20:8081/path"` → `"192.168.1.20"`.
fn host_of(raw: &str) -> Option<&str> {
    let raw = raw.trim();
    let without_scheme = raw.split_once("://").map_or(raw, |(_, rest)| rest);
    let authority = without_scheme.split('/').next().unwrap_or_default();
    if authority.starts_with('[') {
        // IPv6 literal, keep the brackets: "[::1]:8081" → "[::1]"
        return authority
            .find(']')
            .map(|end| &authority[..=end])
            .filter(|host| host.len() > 2);
    }
    let host = authority.split(':').next().unwrap_or_default();
    (!host.is_empty()).then_some(host)
}
