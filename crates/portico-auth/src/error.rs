//! Error types.

use thiserror::Error;

/// Crate result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The backend could not report its auth configuration. Fatal: no
    /// page can render safely without knowing the auth mode.
    #[error("auth configuration unavailable: {0}")]
    Config(String),

    /// The backend could not produce an identity-provider authorization
    /// URL, so the redirect cannot proceed.
    #[error("authorization URL unavailable: {0}")]
    Authorize(String),

    /// A forwarded cookie or identity value is not a legal HTTP header.
    #[error("invalid forwarded header: {0}")]
    Header(String),

    /// An error occurred while performing HTTP requests.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
