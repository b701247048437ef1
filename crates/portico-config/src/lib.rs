//! portico-config
//!
//! Process-wide settings for the portico auth layer: the two origins the
//! frontend talks to, the deployment-wide cloud flag, the name of the
//! trusted identity header, and the outbound request timeout.
//!
//! Settings are fixed at startup and injected into each component at
//! construction. [`Settings::from_lookup`] exists so tests can supply
//! alternate configurations without touching the process environment.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Origin for links shown to the browser (OAuth redirect targets etc.).
pub const DEFAULT_PUBLIC_ORIGIN: &str = "http://localhost:3000";

/// Origin for server-to-server calls into the backend.
pub const DEFAULT_BACKEND_ORIGIN: &str = "http://127.0.0.1:8080";

/// Header carrying a pre-verified caller email, set by a perimeter proxy.
pub const DEFAULT_IDENTITY_HEADER: &str = "X-Auth-Request-Email";

/// Outbound request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

const PUBLIC_ORIGIN_VAR: &str = "PORTICO_PUBLIC_ORIGIN";
const BACKEND_ORIGIN_VAR: &str = "PORTICO_BACKEND_ORIGIN";
const CLOUD_ENABLED_VAR: &str = "PORTICO_CLOUD_ENABLED";
const IDENTITY_HEADER_VAR: &str = "PORTICO_IDENTITY_HEADER";
const REQUEST_TIMEOUT_VAR: &str = "PORTICO_REQUEST_TIMEOUT_MS";

/// Crate result type.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while reading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable holds a value this crate cannot interpret.
    #[error("invalid value for {var}: {value:?}")]
    Invalid {
        /// The offending variable name.
        var: &'static str,
        /// The raw value as found.
        value: String,
    },
}

/// Immutable configuration consumed by every portico component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Public-facing origin, without a trailing slash.
    pub public_origin: String,

    /// Internal backend origin, without a trailing slash.
    pub backend_origin: String,

    /// Deployment-wide override forcing the hosted variant's auth type.
    pub cloud_enabled: bool,

    /// Name of the trusted identity header, matched case-insensitively
    /// on inbound requests and used verbatim on outbound ones.
    pub identity_header: String,

    /// Timeout applied to every outbound backend call.
    pub request_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            public_origin: DEFAULT_PUBLIC_ORIGIN.to_string(),
            backend_origin: DEFAULT_BACKEND_ORIGIN.to_string(),
            cloud_enabled: false,
            identity_header: DEFAULT_IDENTITY_HEADER.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    ///
    /// Missing variables fall back to the documented defaults; present
    /// but malformed values are an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let public_origin = lookup(PUBLIC_ORIGIN_VAR)
            .map_or_else(|| DEFAULT_PUBLIC_ORIGIN.to_string(), |v| trim_origin(&v));

        let backend_origin = lookup(BACKEND_ORIGIN_VAR)
            .map_or_else(|| DEFAULT_BACKEND_ORIGIN.to_string(), |v| trim_origin(&v));

        let cloud_enabled = match lookup(CLOUD_ENABLED_VAR) {
            Some(raw) => parse_bool(CLOUD_ENABLED_VAR, &raw)?,
            None => false,
        };

        let identity_header = lookup(IDENTITY_HEADER_VAR)
            .map_or_else(|| DEFAULT_IDENTITY_HEADER.to_string(), |v| v.trim().to_string());

        let request_timeout_ms = match lookup(REQUEST_TIMEOUT_VAR) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: REQUEST_TIMEOUT_VAR,
                value: raw,
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_MS,
        };

        Ok(Self {
            public_origin,
            backend_origin,
            cloud_enabled,
            identity_header,
            request_timeout_ms,
        })
    }
}

fn trim_origin(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: raw.to_string(),
        }),
    }
}
