//! portico-auth
//!
//! Server-side authentication routing for a web frontend that renders
//! pages in front of a backend API. It focuses on three recurring
//! problems:
//!
//! - **Resolving the active auth scheme** (disabled, basic, header
//!   bypass, Google OAuth, SAML, OIDC, or the hosted "cloud" override)
//!   and deriving the redirect policy pages depend on
//! - **Building backend and identity-provider URLs** against the two
//!   configured origins, with chainable query assembly
//! - **Forwarding caller credentials** (cookies and the trusted identity
//!   header) to the backend on every proxied call, without leaking them
//!   across sessions
//!
//! Everything is request-scoped: each call re-derives truth from the
//! backend, so toggling the auth mode there takes effect without a
//! frontend restart.
//!
//! ## Quick start
//! ```no_run
//! use portico_auth::{Forwarder, RequestContext, resolve_auth_type};
//! use portico_config::Settings;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::from_env()?;
//! let identity_header = settings.identity_header.clone();
//! let forwarder = Forwarder::new(settings)?;
//!
//! let ctx = RequestContext::from_headers(
//!     [("cookie", "session=abc123"), ("x-auth-request-email", "user@example.com")],
//!     &identity_header,
//! );
//!
//! let metadata = resolve_auth_type(&forwarder, &ctx).await?;
//! if metadata.auto_redirect {
//!     // send the visitor straight to the identity provider
//! }
//! # Ok(()) }
//! ```

#![forbid(unsafe_code)]

mod error;
mod forward;
mod redirect;
mod resolve;
mod session;
mod types;
mod urls;

pub use error::{Error, Result};
pub use forward::{ForwardOptions, Forwarder, RequestContext};
pub use redirect::auth_url;
pub use resolve::resolve_auth_type;
pub use session::{current_user, logout};
pub use types::{AuthType, AuthTypeMetadata};
pub use urls::UrlBuilder;
