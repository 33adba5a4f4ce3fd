//! URL generation from a configured base.
//!
//! [`UrlConfig`] describes where the application lives: a base URL (either
//! absolute or root-relative), the host and default protocol used to
//! qualify relative bases, and an optional front-script path segment that
//! some deployments route everything through.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;

use crate::routing::Parameters;

// Query component encoding: everything but unreserved characters.
const QUERY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Where generated URLs point.
///
/// # Examples
///
/// ```
/// use courier::url::UrlConfig;
///
/// let config = UrlConfig {
///     base_url: "/app/".to_owned(),
///     host: "localhost".to_owned(),
///     protocol: "http".to_owned(),
///     index_file: None,
/// };
///
/// assert_eq!(config.site("foo/bar", Some("http")), "http://localhost/app/foo/bar");
/// assert_eq!(config.site("foo/bar", None), "/app/foo/bar");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UrlConfig {
    /// Absolute (`https://example.com/app/`) or root-relative (`/app/`)
    /// base every generated URL starts from.
    pub base_url: String,
    /// Host used to qualify a relative base when a protocol is requested.
    pub host: String,
    /// Protocol used by [`absolute`](Self::absolute).
    pub protocol: String,
    /// Optional front-script segment inserted between base and URI.
    pub index_file: Option<String>,
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            base_url: "/".to_owned(),
            host: "localhost".to_owned(),
            protocol: "http".to_owned(),
            index_file: None,
        }
    }
}

impl UrlConfig {
    /// The base URL, qualified with `protocol` when one is requested.
    ///
    /// A relative base is promoted to `{protocol}://{host}{base_url}`; an
    /// absolute base keeps its authority and has only the scheme swapped.
    pub fn base(&self, protocol: Option<&str>) -> String {
        match (self.base_url.split_once("://"), protocol) {
            (Some((_, rest)), Some(proto)) => format!("{proto}://{rest}"),
            (None, Some(proto)) => format!("{proto}://{}{}", self.host, self.base_url),
            (_, None) => self.base_url.clone(),
        }
    }

    /// Joins base, optional index file, and `uri` into one URL.
    pub fn site(&self, uri: &str, protocol: Option<&str>) -> String {
        let base = self.base(protocol);
        let uri = uri.trim_matches('/');

        let mut url = String::with_capacity(base.len() + uri.len() + 16);
        url.push_str(base.trim_end_matches('/'));
        if let Some(index) = &self.index_file {
            url.push('/');
            url.push_str(index.trim_matches('/'));
        }
        url.push('/');
        url.push_str(uri);
        url
    }

    /// [`site`](Self::site) with the configured default protocol.
    pub fn absolute(&self, uri: &str) -> String {
        self.site(uri, Some(&self.protocol))
    }
}

/// Builds a `?`-prefixed, percent-encoded query string.
///
/// Keys are emitted in sorted order so output is deterministic; an empty
/// map yields an empty string.
///
/// # Examples
///
/// ```
/// use courier::routing::Parameters;
/// use courier::url::query;
///
/// let params: Parameters = [("q", "hello world"), ("page", "2")].into_iter().collect();
/// assert_eq!(query(&params), "?page=2&q=hello%20world");
/// assert_eq!(query(&Parameters::new()), "");
/// ```
pub fn query(params: &Parameters) -> String {
    if params.is_empty() {
        return String::new();
    }

    let mut pairs: Vec<(&str, &str)> = params.iter().collect();
    pairs.sort();

    let encoded: Vec<String> = pairs
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, QUERY),
                utf8_percent_encode(value, QUERY)
            )
        })
        .collect();

    format!("?{}", encoded.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> UrlConfig {
        UrlConfig {
            base_url: "/app/".to_owned(),
            host: "localhost".to_owned(),
            protocol: "http".to_owned(),
            index_file: None,
        }
    }

    #[test]
    fn relative_base_stays_relative_without_protocol() {
        assert_eq!(app().base(None), "/app/");
    }

    #[test]
    fn relative_base_is_qualified_by_protocol() {
        assert_eq!(app().base(Some("http")), "http://localhost/app/");
        assert_eq!(app().base(Some("https")), "https://localhost/app/");
    }

    #[test]
    fn absolute_base_swaps_scheme_only() {
        let config = UrlConfig {
            base_url: "http://example.com/app/".to_owned(),
            ..UrlConfig::default()
        };
        assert_eq!(config.base(None), "http://example.com/app/");
        assert_eq!(config.base(Some("https")), "https://example.com/app/");
    }

    #[test]
    fn site_joins_base_and_uri() {
        assert_eq!(
            app().site("foo/bar", Some("http")),
            "http://localhost/app/foo/bar"
        );
        assert_eq!(app().site("/foo/", None), "/app/foo");
    }

    #[test]
    fn site_with_empty_uri_ends_at_the_base() {
        assert_eq!(app().site("", Some("http")), "http://localhost/app/");
    }

    #[test]
    fn index_file_sits_between_base_and_uri() {
        let config = UrlConfig {
            index_file: Some("index".to_owned()),
            ..app()
        };
        assert_eq!(
            config.site("foo/bar", Some("http")),
            "http://localhost/app/index/foo/bar"
        );
    }

    #[test]
    fn absolute_uses_the_configured_protocol() {
        assert_eq!(app().absolute("foo"), "http://localhost/app/foo");
    }

    #[test]
    fn query_is_sorted_and_encoded() {
        let params: Parameters = [("b", "2"), ("a", "one two"), ("c", "a&b")]
            .into_iter()
            .collect();
        assert_eq!(query(&params), "?a=one%20two&b=2&c=a%26b");
    }

    #[test]
    fn empty_query_is_empty() {
        assert_eq!(query(&Parameters::new()), "");
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: UrlConfig = toml::from_str("base_url = \"/app/\"").unwrap();
        assert_eq!(config.base_url, "/app/");
        assert_eq!(config.host, "localhost");
        assert_eq!(config.protocol, "http");
        assert_eq!(config.index_file, None);
    }
}
