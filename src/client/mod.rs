//! Dispatch clients — the strategy objects that execute a request.
//!
//! [`Request::factory`](crate::http::Request::factory) classifies its URI
//! two ways and fixes the choice for the request's lifetime:
//!
//! - a local route target is executed by [`InternalClient`], which resolves
//!   the route table and drives a registered controller, without a network
//!   hop;
//! - an absolute `http`/`https` URL is executed by [`ExternalClient`],
//!   which performs a real HTTP call.
//!
//! Both implement [`RequestClient`]; the boxed-future method shape keeps
//! the trait object-safe.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::http::{Request, Response, Status};
use crate::routing::Router;

pub mod external;
pub mod internal;

pub use external::ExternalClient;
pub use internal::InternalClient;

/// Which dispatch strategy a request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientKind {
    /// In-process dispatch against the route table.
    Internal,
    /// Real HTTP call to a remote host.
    External,
}

/// Dispatch failures.
///
/// Plain error returns, mapped to an HTTP status for error pages: unknown
/// routes and controllers are not-found conditions, upstream failures
/// surface as a bad gateway.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no route matches `{uri}`")]
    RouteNotFound { uri: String },

    #[error("route for `{uri}` does not resolve a controller")]
    MissingController { uri: String },

    #[error("controller `{name}` is not registered")]
    UnknownController { name: String },

    #[error("`{method}` is not a sendable HTTP method")]
    InvalidMethod { method: String },

    #[error("external request failed: {0}")]
    External(#[from] reqwest::Error),
}

impl DispatchError {
    /// The HTTP status this error reports as.
    pub fn status(&self) -> Status {
        match self {
            Self::RouteNotFound { .. }
            | Self::MissingController { .. }
            | Self::UnknownController { .. } => Status::NOT_FOUND,
            Self::InvalidMethod { .. } => Status::BAD_REQUEST,
            Self::External(_) => Status::BAD_GATEWAY,
        }
    }
}

/// Boxed future returned by [`RequestClient::execute`].
pub type ClientFuture<'a> = Pin<Box<dyn Future<Output = Result<Response, DispatchError>> + Send + 'a>>;

/// A dispatch strategy.
///
/// Executing may mutate the request (the internal client applies matched
/// route parameters before the controller runs). The route table is passed
/// in by the caller; the external client ignores it.
pub trait RequestClient: Send + Sync {
    /// Which strategy this client is.
    fn kind(&self) -> ClientKind;

    /// Executes `request`, producing its response.
    fn execute<'a>(&'a self, request: &'a mut Request, routes: &'a Router) -> ClientFuture<'a>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_statuses() {
        let err = DispatchError::RouteNotFound {
            uri: "x".to_owned(),
        };
        assert_eq!(err.status(), Status::NOT_FOUND);

        let err = DispatchError::UnknownController {
            name: "x".to_owned(),
        };
        assert_eq!(err.status(), Status::NOT_FOUND);

        let err = DispatchError::InvalidMethod {
            method: "".to_owned(),
        };
        assert_eq!(err.status(), Status::BAD_REQUEST);
    }
}
