//! Controller lifecycle — the handler surface the internal client drives.
//!
//! A controller runs through three phases per request:
//!
//! 1. [`before`](Controller::before) — may short-circuit by returning a
//!    response (auth redirect, maintenance page); the action never runs.
//! 2. [`handle`](Controller::handle) — produces the response. Action
//!    selection is the controller's own business, usually a match on the
//!    request's `action` parameter.
//! 3. [`after`](Controller::after) — decorates the response on its way out
//!    (common headers, wrapping a rendered [`View`]).
//!
//! Implementations must be `Send + Sync`: one controller value serves every
//! request concurrently, so per-request state belongs in locals inside
//! `handle`, not in fields.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use crate::http::{Request, Response};

/// Boxed response future tied to the borrow of the controller and request.
pub type ControllerFuture<'a> = Pin<Box<dyn Future<Output = Response> + Send + 'a>>;

/// A registered request handler with lifecycle hooks.
///
/// # Examples
///
/// ```
/// use courier::controller::{Controller, ControllerFuture};
/// use courier::http::{Request, Response, Status};
///
/// struct Articles;
///
/// impl Controller for Articles {
///     fn handle<'a>(&'a self, request: &'a Request) -> ControllerFuture<'a> {
///         Box::pin(async move {
///             match request.param("action") {
///                 Some("index") => Response::new(Status::OK).body("article list"),
///                 _ => Response::new(Status::NOT_FOUND),
///             }
///         })
///     }
/// }
/// ```
pub trait Controller: Send + Sync {
    /// Runs before the action. Returning `Some(response)` short-circuits
    /// the request; `handle` and `after` are skipped.
    fn before(&self, _request: &Request) -> Option<Response> {
        None
    }

    /// Produces the response for the request.
    fn handle<'a>(&'a self, request: &'a Request) -> ControllerFuture<'a>;

    /// Runs after the action; the returned response is what the client
    /// sees.
    fn after(&self, _request: &Request, response: Response) -> Response {
        response
    }
}

/// A string template with `{name}` placeholders.
///
/// Variables set on the view replace their placeholders on
/// [`render`](View::render); placeholders without a variable are left
/// as-is.
///
/// # Examples
///
/// ```
/// use courier::controller::View;
///
/// let mut view = View::new("<h1>{title}</h1>");
/// view.set("title", "Archive");
/// assert_eq!(view.render(), "<h1>Archive</h1>");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct View {
    source: String,
    vars: HashMap<String, String>,
}

impl View {
    /// Creates a view over a template source.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            vars: HashMap::new(),
        }
    }

    /// Sets a template variable.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Returns a variable's current value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Substitutes every `{name}` placeholder with its variable.
    pub fn render(&self) -> String {
        let mut rendered = self.source.clone();
        for (key, value) in &self.vars {
            rendered = rendered.replace(&format!("{{{key}}}"), value);
        }
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Status;

    struct Fallthrough;

    impl Controller for Fallthrough {
        fn handle<'a>(&'a self, _request: &'a Request) -> ControllerFuture<'a> {
            Box::pin(async { Response::new(Status::OK).body("handled") })
        }
    }

    #[test]
    fn lifecycle_defaults_pass_through() {
        let controller = Fallthrough;
        let request = Request::factory("foo/bar");
        assert!(controller.before(&request).is_none());

        let response = Response::new(Status::OK).body("x");
        assert_eq!(controller.after(&request, response.clone()), response);
    }

    #[tokio::test]
    async fn handle_produces_the_response() {
        let controller = Fallthrough;
        let request = Request::factory("foo/bar");
        let response = controller.handle(&request).await;
        assert_eq!(response.text(), "handled");
    }

    #[test]
    fn view_renders_placeholders() {
        let mut view = View::new("{greeting}, {name}!");
        view.set("greeting", "Hello").set("name", "world");
        assert_eq!(view.render(), "Hello, world!");
    }

    #[test]
    fn view_leaves_unset_placeholders() {
        let view = View::new("{missing} stays");
        assert_eq!(view.render(), "{missing} stays");
    }
}
