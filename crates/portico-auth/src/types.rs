//! Auth scheme types and the derived redirect policy.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The configured authentication scheme governing how a visitor proves
/// identity. Resolved fresh on every request, never cached across them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    /// No authentication at all.
    Disabled,
    /// Email/password credentials against the backend.
    Basic,
    /// Identity arrives solely via the trusted identity header.
    Bypass,
    /// Google OAuth login.
    GoogleOauth,
    /// Hosted variant's login flow, reusing the OAuth transport.
    Cloud,
    /// SAML identity provider.
    Saml,
    /// OIDC identity provider.
    Oidc,
}

impl AuthType {
    /// Wire form of the scheme name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AuthType::Disabled => "disabled",
            AuthType::Basic => "basic",
            AuthType::Bypass => "bypass",
            AuthType::GoogleOauth => "google_oauth",
            AuthType::Cloud => "cloud",
            AuthType::Saml => "saml",
            AuthType::Oidc => "oidc",
        }
    }

    /// True when no authentication scheme is configured.
    #[must_use]
    pub fn is_disabled(self) -> bool {
        matches!(self, AuthType::Disabled)
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Redirect policy derived from the backend's auth configuration.
///
/// Recomputed on every call so it always reflects the backend's live
/// configuration.
#[derive(Debug, Clone, Serialize)]
pub struct AuthTypeMetadata {
    /// The resolved scheme, after any cloud override.
    pub auth_type: AuthType,

    /// Unauthenticated visitors must be sent straight to the identity
    /// provider rather than shown a login form. True only for SAML and
    /// OIDC.
    pub auto_redirect: bool,

    /// The backend requires email verification before a session counts.
    /// Always false under bypass: the identity header is pre-verified.
    pub requires_verification: bool,

    /// Whether the backend allows anonymous users, when it says.
    pub anonymous_user_enabled: Option<bool>,
}

impl AuthTypeMetadata {
    /// True when authentication is disabled outright.
    #[must_use]
    pub fn auth_disabled(&self) -> bool {
        self.auth_type.is_disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_form_uses_snake_case() {
        let encoded = serde_json::to_string(&AuthType::GoogleOauth).unwrap();
        assert_eq!(encoded, "\"google_oauth\"");

        let decoded: AuthType = serde_json::from_str("\"saml\"").unwrap();
        assert_eq!(decoded, AuthType::Saml);
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        assert!(serde_json::from_str::<AuthType>("\"ldap\"").is_err());
    }

    #[test]
    fn disabled_predicate() {
        let metadata = AuthTypeMetadata {
            auth_type: AuthType::Disabled,
            auto_redirect: false,
            requires_verification: false,
            anonymous_user_enabled: None,
        };
        assert!(metadata.auth_disabled());
        assert!(!AuthType::Basic.is_disabled());
    }
}
