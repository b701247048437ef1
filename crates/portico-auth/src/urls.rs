//! Backend and public URL construction.

use std::fmt;

use portico_config::Settings;
use url::{Position, Url};

/// Base used when the configured origin cannot be parsed. Builders that
/// fall back to it render as path + query only, so it never appears in
/// output.
const PLACEHOLDER_ORIGIN: &str = "http://relative.invalid";

/// Chainable URL assembly against one of the two configured origins.
///
/// [`UrlBuilder::backend`] targets the internal backend origin for
/// server-to-server calls; [`UrlBuilder::public`] targets the
/// public-facing origin for links handed to the browser. Construction
/// never fails: an unparsable base degrades to a relative builder that
/// emits only path and query.
///
/// Query parameters use set semantics. Writing a key twice keeps the
/// last value.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    url: Url,
    relative: bool,
}

impl UrlBuilder {
    /// URL rooted at the internal backend origin.
    #[must_use]
    pub fn backend(settings: &Settings, path: &str) -> Self {
        Self::from_base(&settings.backend_origin, path)
    }

    /// URL rooted at the public origin.
    #[must_use]
    pub fn public(settings: &Settings, path: &str) -> Self {
        Self::from_base(&settings.public_origin, path)
    }

    /// URL with no origin at all; renders as path + query only.
    #[must_use]
    pub fn relative(path: &str) -> Self {
        Self::from_base("", path)
    }

    fn from_base(base: &str, path: &str) -> Self {
        match Url::parse(&join(base, path)) {
            Ok(url) => Self {
                url,
                relative: false,
            },
            Err(_) => {
                let url = Url::parse(&join(PLACEHOLDER_ORIGIN, path))
                    .unwrap_or_else(|_| placeholder_root());
                Self {
                    url,
                    relative: true,
                }
            }
        }
    }

    /// Set one query parameter. The value is stringified, so numbers and
    /// booleans take their canonical text form.
    #[must_use]
    pub fn add_param(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.set_param(key, &value.to_string());
        self
    }

    /// Set several query parameters; later entries win over earlier ones.
    #[must_use]
    pub fn add_params<K, V, I>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: fmt::Display,
    {
        for (key, value) in params {
            self.set_param(key.as_ref(), &value.to_string());
        }
        self
    }

    fn set_param(&mut self, key: &str, value: &str) {
        let kept: Vec<(String, String)> = self
            .url
            .query_pairs()
            .filter(|(existing, _)| existing.as_ref() != key)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        let mut pairs = self.url.query_pairs_mut();
        pairs.clear();
        for (k, v) in &kept {
            pairs.append_pair(k, v);
        }
        pairs.append_pair(key, value);
    }
}

impl fmt::Display for UrlBuilder {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.relative {
            formatter.write_str(&self.url[Position::BeforePath..])
        } else {
            formatter.write_str(self.url.as_str())
        }
    }
}

/// Join origin and path with exactly one slash between them.
fn join(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

fn placeholder_root() -> Url {
    Url::parse(PLACEHOLDER_ORIGIN).expect("placeholder origin is a valid URL")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_emits_no_origin() {
        let rendered = UrlBuilder::relative("/auth/oidc/authorize")
            .add_param("next", "/docs")
            .to_string();
        assert_eq!(rendered, "/auth/oidc/authorize?next=%2Fdocs");
        assert!(!rendered.contains("relative.invalid"));
    }

    #[test]
    fn backend_origin_joins_without_double_slash() {
        let settings = Settings {
            backend_origin: "http://127.0.0.1:8080/".to_string(),
            ..Settings::default()
        };
        assert_eq!(
            UrlBuilder::backend(&settings, "/auth/type").to_string(),
            "http://127.0.0.1:8080/auth/type"
        );
        assert_eq!(
            UrlBuilder::backend(&settings, "auth/type").to_string(),
            "http://127.0.0.1:8080/auth/type"
        );
    }

    #[test]
    fn public_origin_is_used_for_browser_links() {
        let settings = Settings {
            public_origin: "https://app.example.com".to_string(),
            ..Settings::default()
        };
        assert_eq!(
            UrlBuilder::public(&settings, "/auth/oauth/callback").to_string(),
            "https://app.example.com/auth/oauth/callback"
        );
    }

    #[test]
    fn unparsable_origin_degrades_to_relative() {
        let settings = Settings {
            backend_origin: String::new(),
            ..Settings::default()
        };
        let rendered = UrlBuilder::backend(&settings, "/me").to_string();
        assert_eq!(rendered, "/me");
    }

    #[test]
    fn last_write_wins_for_a_key() {
        let rendered = UrlBuilder::relative("/auth/oauth/authorize")
            .add_param("next", "/first")
            .add_param("next", "/second")
            .to_string();
        assert_eq!(rendered, "/auth/oauth/authorize?next=%2Fsecond");
    }

    #[test]
    fn values_take_canonical_text_form() {
        let rendered = UrlBuilder::relative("/search")
            .add_param("limit", 25)
            .add_param("strict", true)
            .to_string();
        assert_eq!(rendered, "/search?limit=25&strict=true");
    }

    #[test]
    fn add_params_applies_in_order() {
        let rendered = UrlBuilder::relative("/auth/oauth/authorize")
            .add_param("next", "/stale")
            .add_params([("next", "/docs"), ("prompt", "consent")])
            .to_string();
        assert_eq!(rendered, "/auth/oauth/authorize?next=%2Fdocs&prompt=consent");
    }
}
