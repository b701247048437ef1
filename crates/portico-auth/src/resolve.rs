//! Auth scheme resolution against the backend configuration endpoint.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::forward::{ForwardOptions, Forwarder, RequestContext};
use crate::types::{AuthType, AuthTypeMetadata};

const AUTH_TYPE_PATH: &str = "/auth/type";

#[derive(Debug, Deserialize)]
struct AuthTypePayload {
    auth_type: AuthType,
    #[serde(default)]
    requires_verification: bool,
    #[serde(default)]
    anonymous_user_enabled: Option<bool>,
}

/// Resolve the active auth scheme and derive the redirect policy pages
/// consume.
///
/// A backend failure here is fatal: no page can render safely without
/// knowing the auth mode. The result is never cached; every call
/// reflects the backend's live configuration.
pub async fn resolve_auth_type(
    forwarder: &Forwarder,
    ctx: &RequestContext,
) -> Result<AuthTypeMetadata> {
    let response = forwarder
        .forward(AUTH_TYPE_PATH, ctx, ForwardOptions::default())
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Config(format!(
            "backend reported {status} for {AUTH_TYPE_PATH}"
        )));
    }

    let payload: AuthTypePayload = serde_json::from_slice(&response.bytes().await?)?;

    let auth_type = if forwarder.settings().cloud_enabled {
        // Deployment-wide override: the hosted variant runs its own
        // login flow no matter what the backend reports.
        tracing::debug!(
            reported = %payload.auth_type,
            "cloud override active"
        );
        AuthType::Cloud
    } else {
        payload.auth_type
    };

    let metadata = match auth_type {
        AuthType::Oidc | AuthType::Saml => AuthTypeMetadata {
            auth_type,
            auto_redirect: true,
            requires_verification: payload.requires_verification,
            anonymous_user_enabled: payload.anonymous_user_enabled,
        },
        // The identity header is pre-verified upstream, so verification
        // is implicit under bypass.
        AuthType::Bypass => AuthTypeMetadata {
            auth_type,
            auto_redirect: false,
            requires_verification: false,
            anonymous_user_enabled: payload.anonymous_user_enabled,
        },
        AuthType::Disabled | AuthType::Basic | AuthType::GoogleOauth | AuthType::Cloud => {
            AuthTypeMetadata {
                auth_type,
                auto_redirect: false,
                requires_verification: payload.requires_verification,
                anonymous_user_enabled: payload.anonymous_user_enabled,
            }
        }
    };

    Ok(metadata)
}
