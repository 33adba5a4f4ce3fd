//! A small site wired from configuration: two routes, one controller, and
//! templated pages.
//!
//! Run with `cargo run --example petsite`, then:
//!
//! ```text
//! curl http://127.0.0.1:8080/
//! curl http://127.0.0.1:8080/articles/show?title=geese
//! curl http://127.0.0.1:8080/feed
//! ```

use courier::controller::{Controller, ControllerFuture, View};
use courier::http::{Request, Response, Status};
use courier::inflector::Inflector;
use courier::server::Server;
use courier::{AppConfig, url};

struct Articles {
    inflector: Inflector,
}

impl Controller for Articles {
    fn handle<'a>(&'a self, request: &'a Request) -> ControllerFuture<'a> {
        Box::pin(async move {
            match request.param("action") {
                Some("index") => {
                    let mut page = View::new("<h1>{title}</h1><p>{hint}</p>");
                    page.set("title", "Articles")
                        .set("hint", "try /articles/show?title=goose");
                    Response::new(Status::OK)
                        .header("Content-Type", "text/html; charset=utf-8")
                        .body(page.render())
                }
                Some("show") => {
                    let title = request.query().get("title").unwrap_or("article");
                    let body = format!(
                        "one {}, many {}",
                        self.inflector.singular(title),
                        self.inflector.plural(title),
                    );
                    Response::new(Status::OK).body(body)
                }
                Some("feed") => Response::json(&serde_json::json!({
                    "items": [],
                    "self": url::query(request.query()),
                }))
                .unwrap_or_else(|_| Response::new(Status::INTERNAL_SERVER_ERROR)),
                _ => Response::new(Status::NOT_FOUND).body("no such action"),
            }
        })
    }

    fn after(&self, _request: &Request, mut response: Response) -> Response {
        response.headers_mut().set("X-Powered-By", "courier");
        response
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = AppConfig::load("demos/config.toml")?;

    let mut router = config.router();
    router.controller(
        "articles",
        Articles {
            inflector: Inflector::new(config.inflector.clone()),
        },
    );

    let server = Server::bind("127.0.0.1:8080").await?;
    println!("Listening on http://{}", server.local_addr());
    server.serve(router).await?;
    Ok(())
}
