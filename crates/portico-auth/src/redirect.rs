//! Identity-provider authorization URL dispatch.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::forward::{ForwardOptions, Forwarder, RequestContext};
use crate::types::AuthType;
use crate::urls::UrlBuilder;

const OAUTH_AUTHORIZE_PATH: &str = "/auth/oauth/authorize";
const SAML_AUTHORIZE_PATH: &str = "/auth/saml/authorize";
const OIDC_AUTHORIZE_PATH: &str = "/auth/oidc/authorize";

#[derive(Debug, Deserialize)]
struct AuthorizePayload {
    authorization_url: String,
}

/// Produce the identity-provider authorization URL for `auth_type`, or
/// an empty string when no redirect applies.
///
/// OAuth flows (including the hosted cloud variant) forward the caller's
/// cookies so the backend can bind the flow to the existing session.
/// SAML and OIDC authorization requests are stateless, so nothing is
/// forwarded. `next` becomes the post-login destination.
pub async fn auth_url(
    forwarder: &Forwarder,
    ctx: &RequestContext,
    auth_type: AuthType,
    next: Option<&str>,
) -> Result<String> {
    match auth_type {
        AuthType::Disabled | AuthType::Basic | AuthType::Bypass => Ok(String::new()),
        AuthType::GoogleOauth | AuthType::Cloud => {
            fetch_authorization_url(forwarder, ctx, OAUTH_AUTHORIZE_PATH, next).await
        }
        AuthType::Saml => {
            fetch_authorization_url(forwarder, &RequestContext::new(), SAML_AUTHORIZE_PATH, next)
                .await
        }
        AuthType::Oidc => {
            fetch_authorization_url(forwarder, &RequestContext::new(), OIDC_AUTHORIZE_PATH, next)
                .await
        }
    }
}

async fn fetch_authorization_url(
    forwarder: &Forwarder,
    ctx: &RequestContext,
    path: &str,
    next: Option<&str>,
) -> Result<String> {
    let mut target = UrlBuilder::relative(path);
    if let Some(next) = next {
        target = target.add_param("next", next);
    }

    let response = forwarder
        .forward(&target.to_string(), ctx, ForwardOptions::default())
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Authorize(format!(
            "backend reported {status} for {path}"
        )));
    }

    let payload: AuthorizePayload = serde_json::from_slice(&response.bytes().await?)?;
    Ok(payload.authorization_url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use portico_config::Settings;

    fn forwarder_for(backend: &str) -> Forwarder {
        Forwarder::new(Settings {
            backend_origin: backend.to_string(),
            ..Settings::default()
        })
        .unwrap()
    }

    // Port 9 is discard; nothing listens there in tests, so any attempt
    // to call the backend turns into a transport error.
    const UNREACHABLE_BACKEND: &str = "http://127.0.0.1:9";

    #[tokio::test]
    async fn no_redirect_schemes_yield_empty_without_a_backend_call() {
        let forwarder = forwarder_for(UNREACHABLE_BACKEND);
        let ctx = RequestContext::new().with_cookie("sid", "abc");

        for auth_type in [AuthType::Disabled, AuthType::Basic, AuthType::Bypass] {
            let url = auth_url(&forwarder, &ctx, auth_type, Some("/docs"))
                .await
                .unwrap();
            assert_eq!(url, "", "{auth_type} must not redirect");
        }
    }

    #[tokio::test]
    async fn oauth_forwards_cookies_and_next() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/auth/oauth/authorize")
                    .query_param("next", "/docs")
                    .header("cookie", "sid=abc");
                then.status(200).json_body(serde_json::json!({
                    "authorization_url": "https://accounts.example.com/o/authorize?state=xyz",
                }));
            })
            .await;

        let ctx = RequestContext::new().with_cookie("sid", "abc");
        let url = auth_url(
            &forwarder_for(&server.base_url()),
            &ctx,
            AuthType::GoogleOauth,
            Some("/docs"),
        )
        .await
        .unwrap();

        assert_eq!(url, "https://accounts.example.com/o/authorize?state=xyz");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn cloud_uses_the_oauth_endpoint() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/auth/oauth/authorize");
                then.status(200).json_body(
                    serde_json::json!({"authorization_url": "https://login.example.com/start"}),
                );
            })
            .await;

        let url = auth_url(
            &forwarder_for(&server.base_url()),
            &RequestContext::new(),
            AuthType::Cloud,
            None,
        )
        .await
        .unwrap();

        assert_eq!(url, "https://login.example.com/start");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn saml_and_oidc_hit_their_own_endpoints() {
        for (auth_type, path) in [
            (AuthType::Saml, "/auth/saml/authorize"),
            (AuthType::Oidc, "/auth/oidc/authorize"),
        ] {
            let server = MockServer::start_async().await;
            let mock = server
                .mock_async(|when, then| {
                    when.method(GET).path(path).query_param("next", "/chat");
                    then.status(200).json_body(
                        serde_json::json!({"authorization_url": "https://idp.example.com/sso"}),
                    );
                })
                .await;

            // Cookies on the context must not matter for these schemes.
            let ctx = RequestContext::new().with_cookie("sid", "abc");
            let url = auth_url(&forwarder_for(&server.base_url()), &ctx, auth_type, Some("/chat"))
                .await
                .unwrap();

            assert_eq!(url, "https://idp.example.com/sso");
            mock.assert_async().await;
        }
    }

    #[tokio::test]
    async fn backend_failure_is_fatal() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/auth/oidc/authorize");
                then.status(403);
            })
            .await;

        let result = auth_url(
            &forwarder_for(&server.base_url()),
            &RequestContext::new(),
            AuthType::Oidc,
            None,
        )
        .await;

        assert!(matches!(result, Err(Error::Authorize(_))));
    }
}
