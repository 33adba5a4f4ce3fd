//! Application configuration loaded from TOML.
//!
//! One file carries the three configurable surfaces: URL generation
//! (`[url]`), the route table (`[[route]]` entries), and the inflector
//! vocabulary (`[inflector]`). Every section is optional and falls back to
//! its defaults, so an empty file is a valid configuration.
//!
//! ```toml
//! [url]
//! base_url = "/app/"
//! host = "localhost"
//!
//! [[route]]
//! name = "default"
//! pattern = ":controller/:action"
//! defaults = { action = "index" }
//!
//! [inflector]
//! uncountable = ["sheep"]
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::inflector::WordLists;
use crate::routing::{Parameters, Route, Router};
use crate::url::UrlConfig;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// One `[[route]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteConfig {
    pub name: String,
    pub pattern: String,
    #[serde(default)]
    pub defaults: HashMap<String, String>,
}

/// The whole application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub url: UrlConfig,

    #[serde(default, rename = "route")]
    pub routes: Vec<RouteConfig>,

    #[serde(default)]
    pub inflector: WordLists,
}

impl AppConfig {
    /// Reads and parses a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Builds a [`Router`] from the `[[route]]` entries, in file order.
    ///
    /// Controllers are code, not configuration — register them on the
    /// returned router afterwards.
    pub fn router(&self) -> Router {
        let mut router = Router::new();
        for entry in &self.routes {
            let defaults: Parameters = entry.defaults.clone().into();
            router.route(&entry.name, Route::new(&entry.pattern).defaults(defaults));
        }
        router
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [url]
        base_url = "/app/"
        host = "localhost"
        protocol = "http"

        [[route]]
        name = "feed"
        pattern = "feed"
        defaults = { controller = "articles", action = "feed" }

        [[route]]
        name = "default"
        pattern = ":controller/:action"
        defaults = { action = "index" }

        [inflector]
        uncountable = ["sheep"]

        [inflector.irregular]
        goose = "geese"
    "#;

    #[test]
    fn parses_a_full_file() {
        let config = AppConfig::parse(SAMPLE).unwrap();
        assert_eq!(config.url.base_url, "/app/");
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[0].name, "feed");
        assert_eq!(config.inflector.uncountable, vec!["sheep"]);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config.url, UrlConfig::default());
        assert!(config.routes.is_empty());
        assert_eq!(config.inflector, WordLists::default());
    }

    #[test]
    fn router_preserves_file_order() {
        let config = AppConfig::parse(SAMPLE).unwrap();
        let router = config.router();
        assert_eq!(router.len(), 2);

        // "feed" is declared first, so it wins over the catch-all
        let matched = router.matches("feed").unwrap();
        assert_eq!(matched.name, "feed");
        assert_eq!(matched.params.get("controller"), Some("articles"));
    }

    #[test]
    fn route_defaults_are_applied() {
        let config = AppConfig::parse(SAMPLE).unwrap();
        let router = config.router();
        let matched = router.matches("articles").unwrap();
        assert_eq!(matched.name, "default");
        assert_eq!(matched.params.get("action"), Some("index"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = AppConfig::parse("url = {").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = AppConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
