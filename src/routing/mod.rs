//! Named routes — URI matching and reverse URL generation.
//!
//! A [`Route`] is a compiled pattern of literal and `:name` capture
//! segments plus a defaults map:
//!
//! | Pattern                | URI          | Parameters                      |
//! |------------------------|--------------|---------------------------------|
//! | `articles`             | `articles`   | *(defaults only)*               |
//! | `:controller/:action`  | `foo/bar`    | `controller → foo, action → bar`|
//! | `:controller/:action`  | `foo`        | `action` filled from defaults   |
//!
//! Trailing captures whose name has a default may be omitted from the URI;
//! the default supplies the value. The same rule runs in reverse for
//! [`Route::uri`]: trailing segments that land on their default value are
//! trimmed from the generated URI.
//!
//! A [`Router`] holds routes by name in registration order (first match
//! wins) together with the controller registry the internal client
//! dispatches against.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::controller::Controller;

/// Routing errors.
#[derive(Debug, Error, PartialEq)]
pub enum RouteError {
    #[error("route `{name}` is not registered")]
    UnknownRoute { name: String },

    #[error("no route matches `{uri}`")]
    NoMatch { uri: String },

    #[error("required route parameter `{name}` has no value")]
    MissingParam { name: String },
}

/// A string key/value map for route captures, defaults, and query
/// parameters.
///
/// # Examples
///
/// ```
/// use courier::routing::Parameters;
///
/// let mut params = Parameters::new();
/// params.insert("controller", "articles");
/// assert_eq!(params.get("controller"), Some("articles"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    map: HashMap<String, String>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.map.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.map.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Copies every entry of `other` into `self`, overwriting collisions.
    pub fn extend(&mut self, other: &Parameters) {
        for (key, value) in &other.map {
            self.map.insert(key.clone(), value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            map: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<HashMap<String, String>> for Parameters {
    fn from(map: HashMap<String, String>) -> Self {
        Self { map }
    }
}

// One path segment of a compiled pattern.
#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Capture(String),
}

/// A named URI pattern with default parameters.
///
/// # Examples
///
/// ```
/// use courier::routing::{Parameters, Route};
///
/// let route = Route::new(":controller/:action")
///     .defaults([("action", "index")].into_iter().collect());
///
/// let params = route.matches("articles").unwrap();
/// assert_eq!(params.get("controller"), Some("articles"));
/// assert_eq!(params.get("action"), Some("index"));
///
/// let uri = route.uri(&params).unwrap();
/// assert_eq!(uri, "articles"); // default action trimmed back off
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    segments: Vec<Segment>,
    defaults: Parameters,
}

impl Route {
    /// Compiles `pattern` into segments. A leading `:` marks a capture;
    /// surrounding slashes are ignored, so `/foo/:bar/` and `foo/:bar`
    /// compile identically.
    pub fn new(pattern: &str) -> Self {
        let segments = pattern
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix(':') {
                Some(name) => Segment::Capture(name.to_owned()),
                None => Segment::Literal(s.to_owned()),
            })
            .collect();

        Self {
            segments,
            defaults: Parameters::new(),
        }
    }

    /// Attaches default parameter values.
    ///
    /// Defaults serve three roles: they fill captures omitted from a
    /// matched URI, they supply parameters the pattern never captures
    /// (a fixed `controller`, say), and they mark trailing captures as
    /// optional.
    #[must_use]
    pub fn defaults(mut self, defaults: Parameters) -> Self {
        self.defaults = defaults;
        self
    }

    /// The route's default parameters.
    pub fn default_params(&self) -> &Parameters {
        &self.defaults
    }

    /// Matches `uri` against the pattern.
    ///
    /// On success the returned parameters hold the defaults overlaid with
    /// every capture taken from the URI. Extra path segments fail the
    /// match; omitted trailing captures succeed only when a default exists
    /// for them.
    pub fn matches(&self, uri: &str) -> Option<Parameters> {
        let parts: Vec<&str> = uri
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        if parts.len() > self.segments.len() {
            return None;
        }

        let mut params = self.defaults.clone();

        for (index, segment) in self.segments.iter().enumerate() {
            match (segment, parts.get(index)) {
                (Segment::Literal(expected), Some(part)) => {
                    if expected != part {
                        return None;
                    }
                }
                (Segment::Capture(name), Some(part)) => {
                    params.insert(name.clone(), (*part).to_owned());
                }
                // segment omitted: fine if a default covers it
                (Segment::Capture(name), None) => {
                    if !self.defaults.contains(name) {
                        return None;
                    }
                }
                (Segment::Literal(_), None) => return None,
            }
        }

        Some(params)
    }

    /// Reverse-generates a URI from this pattern.
    ///
    /// Capture values come from `params` first, then the defaults. Trailing
    /// captures that land on their default value are trimmed, so generated
    /// URIs are as short as the pattern allows.
    ///
    /// # Errors
    ///
    /// [`RouteError::MissingParam`] when a capture has neither a supplied
    /// value nor a default.
    pub fn uri(&self, params: &Parameters) -> Result<String, RouteError> {
        let mut parts: Vec<&str> = Vec::with_capacity(self.segments.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => parts.push(s),
                Segment::Capture(name) => {
                    let value = params
                        .get(name)
                        .or_else(|| self.defaults.get(name))
                        .ok_or_else(|| RouteError::MissingParam { name: name.clone() })?;
                    parts.push(value);
                }
            }
        }

        let mut end = self.segments.len();
        while end > 0 {
            match &self.segments[end - 1] {
                Segment::Capture(name) => match self.defaults.get(name) {
                    Some(default) if parts[end - 1] == default => end -= 1,
                    _ => break,
                },
                Segment::Literal(_) => break,
            }
        }

        Ok(parts[..end].join("/"))
    }
}

/// A matched route: its name, the route itself, and the merged parameters.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub name: &'a str,
    pub route: &'a Route,
    pub params: Parameters,
}

/// The route table and controller registry.
///
/// Routes are named and kept in registration order; [`matches`]
/// (Router::matches) returns the first hit. Controllers are registered by
/// the name the matched `controller` parameter refers to.
///
/// # Examples
///
/// ```
/// use courier::routing::{Parameters, Route, Router};
///
/// let mut router = Router::new();
/// router.route(
///     "default",
///     Route::new(":controller/:action").defaults([("action", "index")].into_iter().collect()),
/// );
///
/// let matched = router.matches("articles/list").unwrap();
/// assert_eq!(matched.name, "default");
/// assert_eq!(matched.params.get("action"), Some("list"));
/// ```
#[derive(Default)]
pub struct Router {
    routes: Vec<(String, Route)>,
    controllers: HashMap<String, Arc<dyn Controller>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a named route. Later registrations with the same name are
    /// kept but shadowed for [`find`](Self::find); matching still scans in
    /// registration order.
    pub fn route(&mut self, name: impl Into<String>, route: Route) -> &mut Self {
        self.routes.push((name.into(), route));
        self
    }

    /// Registers a controller under `name`, the value a matched
    /// `controller` parameter selects it by.
    pub fn controller(
        &mut self,
        name: impl Into<String>,
        controller: impl Controller + 'static,
    ) -> &mut Self {
        self.controllers.insert(name.into(), Arc::new(controller));
        self
    }

    /// Looks up a route by name.
    pub fn find(&self, name: &str) -> Option<&Route> {
        self.routes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, route)| route)
    }

    /// Matches `uri` against the table in registration order.
    pub fn matches(&self, uri: &str) -> Option<RouteMatch<'_>> {
        self.routes.iter().find_map(|(name, route)| {
            route.matches(uri).map(|params| RouteMatch {
                name: name.as_str(),
                route,
                params,
            })
        })
    }

    /// Reverse-generates a URI from the named route.
    ///
    /// # Errors
    ///
    /// [`RouteError::UnknownRoute`] for an unregistered name, or the
    /// generation error from [`Route::uri`].
    pub fn uri(&self, name: &str, params: &Parameters) -> Result<String, RouteError> {
        let route = self.find(name).ok_or_else(|| RouteError::UnknownRoute {
            name: name.to_owned(),
        })?;
        route.uri(params)
    }

    /// The controller registered under `name`.
    pub fn controller_named(&self, name: &str) -> Option<Arc<dyn Controller>> {
        self.controllers.get(name).cloned()
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field(
                "routes",
                &self.routes.iter().map(|(n, _)| n).collect::<Vec<_>>(),
            )
            .field(
                "controllers",
                &self.controllers.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}
