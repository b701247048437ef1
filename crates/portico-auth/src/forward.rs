//! Credential-forwarding request dispatch to the backend.

use std::time::Duration;

use portico_config::Settings;
use reqwest::header::{CACHE_CONTROL, COOKIE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Response};

use crate::error::{Error, Result};
use crate::urls::UrlBuilder;

/// Caller credentials snapshotted from one inbound request.
///
/// Cookies keep their inbound order; the identity header value is kept
/// verbatim and never parsed. Scoped to a single request so identity
/// can never leak across sessions.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cookies: Vec<(String, String)>,
    identity: Option<String>,
}

impl RequestContext {
    /// Empty context: no cookies, no identity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot cookies and the identity header from inbound header
    /// pairs.
    ///
    /// `identity_header` is matched case-insensitively. `Cookie` headers
    /// are split on `;` into name/value pairs, order preserved.
    #[must_use]
    pub fn from_headers<'a, I>(headers: I, identity_header: &str) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut cookies = Vec::new();
        let mut identity = None;

        for (name, value) in headers {
            if name.eq_ignore_ascii_case("cookie") {
                for pair in value.split(';') {
                    if let Some((k, v)) = pair.trim().split_once('=') {
                        cookies.push((k.to_string(), v.to_string()));
                    }
                }
            } else if name.eq_ignore_ascii_case(identity_header) {
                identity = Some(value.to_string());
            }
        }

        Self { cookies, identity }
    }

    /// Append one cookie.
    #[must_use]
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }

    /// Set the identity header value.
    #[must_use]
    pub fn with_identity(mut self, email: impl Into<String>) -> Self {
        self.identity = Some(email.into());
        self
    }

    /// The identity header value, if the inbound request carried one.
    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// Cookies serialized as `name=value; name=value` in inbound order,
    /// or `None` when there are no cookies.
    #[must_use]
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// Overrides applied on top of the derived credential headers.
#[derive(Debug, Clone, Default)]
pub struct ForwardOptions {
    /// HTTP method; GET when left at the default.
    pub method: Method,

    /// Headers merged on top of the derived set. Caller values win on
    /// collision.
    pub headers: HeaderMap,

    /// Optional JSON body.
    pub body: Option<serde_json::Value>,
}

/// Sends requests to the internal backend origin with the caller's
/// credentials attached.
///
/// The forwarder never interprets response statuses; non-2xx responses
/// come back as-is and transport failures surface as [`Error::Http`].
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: Client,
    settings: Settings,
}

impl Forwarder {
    /// Build the forwarder's HTTP client with the configured timeout.
    pub fn new(settings: Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(settings.request_timeout_ms))
            .build()?;
        Ok(Self { client, settings })
    }

    /// The settings this forwarder was built with.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Relay `path` (optionally carrying a query string) to the backend
    /// with the caller's cookies and identity header attached.
    ///
    /// Derived headers are `Cookie`, the configured identity header, and
    /// `Cache-Control: no-store`; anything in `options.headers` replaces
    /// them on collision.
    pub async fn forward(
        &self,
        path: &str,
        ctx: &RequestContext,
        options: ForwardOptions,
    ) -> Result<Response> {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));

        if let Some(cookie) = ctx.cookie_header() {
            let value = HeaderValue::from_str(&cookie)
                .map_err(|_| Error::Header(format!("cookie string {cookie:?}")))?;
            headers.insert(COOKIE, value);
        }

        if let Some(identity) = ctx.identity() {
            let name = HeaderName::from_bytes(self.settings.identity_header.as_bytes())
                .map_err(|_| {
                    Error::Header(format!(
                        "identity header name {:?}",
                        self.settings.identity_header
                    ))
                })?;
            let value = HeaderValue::from_str(identity)
                .map_err(|_| Error::Header(format!("identity value {identity:?}")))?;
            headers.insert(name, value);
        }

        for (name, value) in &options.headers {
            headers.insert(name.clone(), value.clone());
        }

        let url = UrlBuilder::backend(&self.settings, path).to_string();
        let mut request = self.client.request(options.method, url).headers(headers);
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        Ok(request.send().await?)
    }
}
