//! Session lookup and logout dispatch.

use reqwest::header::HeaderMap;
use reqwest::{Method, Response};
use serde_json::Value;

use crate::error::Result;
use crate::forward::{ForwardOptions, Forwarder, RequestContext};
use crate::types::AuthType;

const ME_PATH: &str = "/me";
const LOGOUT_PATH: &str = "/auth/logout";
const SAML_LOGOUT_PATH: &str = "/auth/saml/logout";

/// Resolve the current authenticated user, or `None` when there is no
/// session.
///
/// An anonymous visitor is an expected outcome, not an error: transport
/// failures, non-2xx statuses, and unparseable bodies all collapse to
/// `None`. The distinct reasons stay visible in the logs. The returned
/// record is opaque; callers only rely on presence.
pub async fn current_user(forwarder: &Forwarder, ctx: &RequestContext) -> Option<Value> {
    let response = match forwarder
        .forward(ME_PATH, ctx, ForwardOptions::default())
        .await
    {
        Ok(response) => response,
        Err(error) => {
            tracing::warn!(%error, "session lookup failed in transport");
            return None;
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::debug!(%status, "session lookup found no user");
        return None;
    }

    match response.json::<Value>().await {
        Ok(user) => Some(user),
        Err(error) => {
            tracing::warn!(%error, "session lookup returned an unparseable user");
            None
        }
    }
}

/// Post a logout to the endpoint matching `auth_type`.
///
/// `headers` are forwarded verbatim and are assumed to already carry the
/// caller's cookies. `Disabled` is a no-op returning `Ok(None)` without
/// any network call. The response comes back untouched; status
/// interpretation is the caller's concern.
pub async fn logout(
    forwarder: &Forwarder,
    auth_type: AuthType,
    headers: HeaderMap,
) -> Result<Option<Response>> {
    let path = match auth_type {
        AuthType::Disabled => return Ok(None),
        AuthType::Saml => SAML_LOGOUT_PATH,
        AuthType::Basic
        | AuthType::Bypass
        | AuthType::GoogleOauth
        | AuthType::Cloud
        | AuthType::Oidc => LOGOUT_PATH,
    };

    let options = ForwardOptions {
        method: Method::POST,
        headers,
        body: None,
    };

    let response = forwarder
        .forward(path, &RequestContext::new(), options)
        .await?;

    Ok(Some(response))
}
