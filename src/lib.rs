//! # courier
//!
//! An async HTTP request routing and dispatch framework written in Rust.
//!
//! Requests are created through a factory that inspects the URI and fixes a
//! dispatch strategy: local route targets resolve in-process against a
//! named route table, absolute URLs go out over the wire. Named routes
//! reverse-generate URLs, Accept headers negotiate by quality weight, and a
//! small TCP front end serves the whole thing.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use courier::controller::{Controller, ControllerFuture};
//! use courier::http::{Request, Response, Status};
//! use courier::routing::{Route, Router};
//! use courier::server::Server;
//!
//! struct Articles;
//!
//! impl Controller for Articles {
//!     fn handle<'a>(&'a self, request: &'a Request) -> ControllerFuture<'a> {
//!         Box::pin(async move {
//!             match request.param("action") {
//!                 Some("index") => Response::new(Status::OK).body("article list"),
//!                 _ => Response::new(Status::NOT_FOUND),
//!             }
//!         })
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut router = Router::new();
//!     router.route(
//!         "default",
//!         Route::new(":controller/:action").defaults([("action", "index")].into_iter().collect()),
//!     );
//!     router.controller("articles", Articles);
//!
//!     let server = Server::bind("127.0.0.1:8080").await?;
//!     println!("Listening on http://127.0.0.1:8080");
//!     server.serve(router).await?;
//!     Ok(())
//! }
//! ```
//!
//! Sub-requests work without a server: `Request::factory("articles/list")`
//! dispatches in-process, `Request::factory("http://example.com/feed")`
//! performs a real HTTP call, both through [`Request::execute`].
//!
//! [`Request::execute`]: http::Request::execute

pub mod client;
pub mod config;
pub mod controller;
pub mod http;
pub mod inflector;
pub mod routing;
pub mod server;
pub mod url;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use client::{ClientKind, DispatchError, RequestClient};
pub use config::AppConfig;
pub use controller::{Controller, View};
pub use http::{Accept, Headers, Method, Request, Response, Status};
pub use routing::{Parameters, Route, RouteError, Router};
pub use server::{Server, ServerError};
pub use url::UrlConfig;
