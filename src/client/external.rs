//! Real HTTP calls for requests targeting a remote host.

use tracing::debug;

use crate::http::{Request, Response, Status};
use crate::routing::Router;

use super::{ClientFuture, ClientKind, DispatchError, RequestClient};

/// Executes a request as a real HTTP call via [`reqwest`].
///
/// Method, headers, and body are carried over to the upstream call;
/// status, headers, and body come back into the framework [`Response`].
/// An upstream error status is not a dispatch failure — it propagates as a
/// response with that status, exactly as the remote server answered.
pub struct ExternalClient {
    http: reqwest::Client,
}

impl ExternalClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for ExternalClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestClient for ExternalClient {
    fn kind(&self) -> ClientKind {
        ClientKind::External
    }

    fn execute<'a>(&'a self, request: &'a mut Request, _routes: &'a Router) -> ClientFuture<'a> {
        Box::pin(async move {
            let method = reqwest::Method::from_bytes(request.method().as_str().as_bytes())
                .map_err(|_| DispatchError::InvalidMethod {
                    method: request.method().as_str().to_owned(),
                })?;

            let mut outgoing = self.http.request(method, request.uri());
            for (name, value) in request.headers().iter() {
                outgoing = outgoing.header(name, value);
            }
            if !request.body().is_empty() {
                outgoing = outgoing.body(request.body().clone());
            }

            let upstream = outgoing.send().await?;
            let status = Status::from_u16(upstream.status().as_u16());

            debug!(url = %request.uri(), status = status.as_u16(), "external request completed");

            let mut response = Response::new(status);
            for (name, value) in upstream.headers() {
                if let Ok(value) = value.to_str() {
                    response.headers_mut().insert(name.as_str(), value);
                }
            }

            let body = upstream.bytes().await?;
            Ok(response.body_bytes(body))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_external_kind() {
        assert_eq!(ExternalClient::new().kind(), ClientKind::External);
    }

    #[tokio::test]
    async fn invalid_method_is_rejected_before_sending() {
        let mut request = Request::factory("http://example.com/");
        request.set_method("bad token");
        let routes = Router::new();
        let err = ExternalClient::new()
            .execute(&mut request, &routes)
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::InvalidMethod { .. }));
    }
}
