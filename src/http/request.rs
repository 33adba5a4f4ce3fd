//! The framework request object.
//!
//! A [`Request`] is created through [`Request::factory`], which inspects the
//! URI and selects the dispatch client: URIs that parse as absolute
//! `http`/`https` URLs are executed by the external HTTP client, everything
//! else is resolved against the route table by the internal client. The
//! selection is fixed for the lifetime of the request.
//!
//! Wire-level HTTP/1.1 parsing ([`Request::parse`], via the [`httparse`]
//! crate) feeds the server module; parsed requests go through the same
//! factory path.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;

use crate::client::{DispatchError, ExternalClient, InternalClient, RequestClient};
use crate::routing::{Parameters, RouteError, Router};
use crate::url::UrlConfig;

use super::{Accept, Headers, Method, Response, Status};

/// Errors from wire-level request parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("request headers are incomplete")]
    Incomplete,

    #[error("malformed request: {0}")]
    Malformed(#[from] httparse::Error),

    #[error("request line is missing its {field}")]
    MissingField { field: &'static str },
}

/// One HTTP-like request: URI, method, headers, body, route parameters, an
/// optionally bound [`Response`], and the dispatch client selected at
/// construction.
///
/// # Examples
///
/// ```
/// use courier::http::Request;
/// use courier::{ClientKind, RequestClient};
///
/// let request = Request::factory("articles/list");
/// assert_eq!(request.client().kind(), ClientKind::Internal);
/// assert_eq!(request.param("uri"), Some("articles/list"));
///
/// let request = Request::factory("http://example.com/feed");
/// assert_eq!(request.client().kind(), ClientKind::External);
/// ```
pub struct Request {
    uri: String,
    method: Method,
    version: u8,
    headers: Headers,
    body: Bytes,
    query: Parameters,
    params: Parameters,
    route: Option<String>,
    response: Option<Response>,
    client: Arc<dyn RequestClient>,
}

impl Request {
    /// Maximum number of headers accepted per wire request.
    const MAX_HEADERS: usize = 64;

    /// Creates a request for `uri`, selecting the dispatch client.
    ///
    /// A URI that parses as an absolute `http`/`https` URL gets the external
    /// client; any other URI is treated as a local route target and gets the
    /// internal client. The original URI string is kept verbatim under the
    /// `uri` parameter. For local targets the query string is split off and
    /// percent-decoded into [`query`](Self::query), and surrounding slashes
    /// are trimmed from the routed path.
    pub fn factory(uri: impl Into<String>) -> Request {
        let original = uri.into();
        let external = is_absolute(&original);

        let client: Arc<dyn RequestClient> = if external {
            Arc::new(ExternalClient::new())
        } else {
            Arc::new(InternalClient)
        };

        let (target, query) = if external {
            (original.clone(), Parameters::new())
        } else {
            match original.split_once('?') {
                Some((path, qs)) => (path.trim_matches('/').to_owned(), parse_query(qs)),
                None => (original.trim_matches('/').to_owned(), Parameters::new()),
            }
        };

        let mut params = Parameters::new();
        params.insert("uri", original);

        Request {
            uri: target,
            method: Method::Get,
            version: 1,
            headers: Headers::new(),
            body: Bytes::new(),
            query,
            params,
            route: None,
            response: None,
            client,
        }
    }

    /// Parses a raw HTTP/1.1 request from a byte buffer.
    ///
    /// Returns the request and the byte offset at which the body begins. The
    /// body is sliced to `Content-Length` bytes, or to whatever shorter
    /// prefix has arrived so far — callers wanting the complete body should
    /// compare `offset + content_length` against the buffer length and retry
    /// once more data is in.
    ///
    /// # Errors
    ///
    /// - [`ParseError::Incomplete`] — the header section is not fully
    ///   buffered yet.
    /// - [`ParseError::Malformed`] — the bytes are not valid HTTP/1.x.
    /// - [`ParseError::MissingField`] — method or target absent.
    pub fn parse(buf: &[u8]) -> Result<(Request, usize), ParseError> {
        let mut headers = [httparse::EMPTY_HEADER; Self::MAX_HEADERS];
        let mut raw = httparse::Request::new(&mut headers);

        let body_offset = match raw.parse(buf)? {
            httparse::Status::Complete(offset) => offset,
            httparse::Status::Partial => return Err(ParseError::Incomplete),
        };

        let method = raw.method.ok_or(ParseError::MissingField { field: "method" })?;
        let target = raw.path.ok_or(ParseError::MissingField { field: "target" })?;

        let mut request = Request::factory(target);
        request.set_method(method);
        request.version = raw.version.unwrap_or(1);

        for header in raw.headers.iter() {
            if let Ok(value) = std::str::from_utf8(header.value) {
                request.headers.insert(header.name, value);
            }
        }

        let remaining = buf.len() - body_offset;
        let body_len = request.content_length().unwrap_or(0).min(remaining);
        request.body = Bytes::copy_from_slice(&buf[body_offset..body_offset + body_len]);

        Ok((request, body_offset))
    }

    /// The routed URI: the path portion for local requests, the full URL for
    /// external ones.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Sets the method, normalizing to uppercase (`"post"` becomes `POST`).
    pub fn set_method(&mut self, method: impl AsRef<str>) -> &mut Self {
        // parsing is infallible; unknown tokens become Method::Custom
        self.method = method.as_ref().parse().unwrap_or_default();
        self
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<Bytes>) -> &mut Self {
        self.body = body.into();
        self
    }

    /// Deserializes the body as JSON.
    pub fn json<T>(&self) -> Result<T, serde_json::Error>
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_slice(&self.body)
    }

    /// Returns a request parameter.
    ///
    /// The `uri` parameter always holds the original URI string passed to
    /// [`factory`](Self::factory); route captures and defaults are merged in
    /// when the internal client resolves the request.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key)
    }

    /// The full parameter map.
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Percent-decoded query-string parameters.
    pub fn query(&self) -> &Parameters {
        &self.query
    }

    /// The name of the matched route, once dispatched.
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    /// Records the matched route and merges its parameters into the request.
    pub(crate) fn apply_route(&mut self, name: impl Into<String>, params: Parameters) {
        self.route = Some(name.into());
        self.params.extend(&params);
    }

    /// The dispatch client selected at construction.
    pub fn client(&self) -> &dyn RequestClient {
        self.client.as_ref()
    }

    /// Creates an empty `200 OK` response for this request.
    ///
    /// With `bind = true` the response is also bound, so an equal value is
    /// observable through [`response`](Self::response); with `bind = false`
    /// the request keeps whatever was bound before (initially nothing).
    pub fn create_response(&mut self, bind: bool) -> Response {
        let response = Response::new(Status::OK);
        if bind {
            self.response = Some(response.clone());
        }
        response
    }

    /// The bound response, if any. A request holds at most one.
    pub fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    /// Binds `response` to this request, replacing any previous binding.
    pub fn set_response(&mut self, response: Response) -> &mut Self {
        self.response = Some(response);
        self
    }

    /// Executes the request through its dispatch client and binds the
    /// resulting response.
    ///
    /// Internal requests resolve against `routes`; external requests ignore
    /// the table and perform a real HTTP call.
    pub async fn execute(&mut self, routes: &Router) -> Result<Response, DispatchError> {
        let client = Arc::clone(&self.client);
        let response = client.execute(self, routes).await?;
        self.response = Some(response.clone());
        Ok(response)
    }

    /// Parses the `Accept` header. Absent header yields `*/* → 1.0`.
    pub fn accept_type(&self) -> Accept {
        Accept::parse(self.headers.get("accept"), &[("*/*", 1.0)])
    }

    /// Parses the `Accept-Language` header with a default of `en-us → 1.0`
    /// for clients that do not name it.
    pub fn accept_lang(&self) -> Accept {
        Accept::parse(self.headers.get("accept-language"), &[("en-us", 1.0)])
    }

    /// Builds the fully qualified URL for this request.
    ///
    /// The request's route (the bound one after dispatch, otherwise found by
    /// matching the request URI) is reverse-generated with `params` layered
    /// over the request's own parameters, then joined with the configured
    /// base URL.
    ///
    /// # Errors
    ///
    /// [`RouteError::NoMatch`] when no route matches an undispatched
    /// request, [`RouteError::UnknownRoute`] when the bound route name has
    /// left the table, or a generation error from [`Route::uri`].
    ///
    /// [`Route::uri`]: crate::routing::Route::uri
    pub fn url(
        &self,
        routes: &Router,
        config: &UrlConfig,
        params: &Parameters,
        protocol: Option<&str>,
    ) -> Result<String, RouteError> {
        let uri = self.route_uri(routes, params)?;
        Ok(config.site(&uri, protocol))
    }

    fn route_uri(&self, routes: &Router, overrides: &Parameters) -> Result<String, RouteError> {
        let (route, mut params) = match &self.route {
            Some(name) => {
                let route = routes
                    .find(name)
                    .ok_or_else(|| RouteError::UnknownRoute { name: name.clone() })?;
                (route, self.params.clone())
            }
            None => {
                let matched = routes
                    .matches(&self.uri)
                    .ok_or_else(|| RouteError::NoMatch {
                        uri: self.uri.clone(),
                    })?;
                (matched.route, matched.params)
            }
        };

        params.extend(overrides);
        route.uri(&params)
    }

    /// The value of `Content-Length`, when present and numeric.
    pub fn content_length(&self) -> Option<usize> {
        self.headers.get("content-length")?.parse().ok()
    }

    /// Whether the connection should stay open after this request.
    ///
    /// HTTP/1.1 defaults to keep-alive; HTTP/1.0 requires an explicit
    /// `Connection: keep-alive`.
    pub fn is_keep_alive(&self) -> bool {
        match self.headers.get("connection") {
            Some(conn) => conn.eq_ignore_ascii_case("keep-alive"),
            None => self.version == 1,
        }
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("uri", &self.uri)
            .field("method", &self.method)
            .field("client", &self.client.kind())
            .field("route", &self.route)
            .finish_non_exhaustive()
    }
}

/// `true` when `uri` is an absolute URL with a dispatchable scheme.
fn is_absolute(uri: &str) -> bool {
    ::url::Url::parse(uri)
        .map(|parsed| matches!(parsed.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Splits `key=value&key2=value2` into percent-decoded parameters.
fn parse_query(raw: &str) -> Parameters {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_encoding::percent_decode_str(&spaced)
        .decode_utf8_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientKind;
    use crate::routing::Route;

    fn test_router() -> Router {
        let mut router = Router::new();
        router.route(
            "default",
            Route::new(":controller/:action").defaults([("action", "index")].into_iter().collect()),
        );
        router
    }

    fn app_config() -> UrlConfig {
        UrlConfig {
            base_url: "/app/".to_owned(),
            host: "localhost".to_owned(),
            protocol: "http".to_owned(),
            index_file: None,
        }
    }

    #[test]
    fn factory_selects_internal_client_for_local_path() {
        let request = Request::factory("foo/bar");
        assert_eq!(request.client().kind(), ClientKind::Internal);
    }

    #[test]
    fn factory_selects_external_client_for_absolute_url() {
        let request = Request::factory("http://google.com");
        assert_eq!(request.client().kind(), ClientKind::External);
    }

    #[test]
    fn non_http_scheme_is_not_external() {
        let request = Request::factory("foo:bar");
        assert_eq!(request.client().kind(), ClientKind::Internal);
    }

    #[test]
    fn uri_param_holds_the_original_string() {
        let request = Request::factory("foo/bar");
        assert_eq!(request.param("uri"), Some("foo/bar"));

        let request = Request::factory("http://google.com");
        assert_eq!(request.param("uri"), Some("http://google.com"));
    }

    #[test]
    fn factory_trims_slashes_from_routed_path() {
        let request = Request::factory("/foo/bar/");
        assert_eq!(request.uri(), "foo/bar");
        // the parameter stays verbatim
        assert_eq!(request.param("uri"), Some("/foo/bar/"));
    }

    #[test]
    fn create_response_with_bind_is_observable() {
        let mut request = Request::factory("foo/bar");
        let response = request.create_response(true);
        assert_eq!(request.response(), Some(&response));
    }

    #[test]
    fn create_response_without_bind_leaves_request_empty() {
        let mut request = Request::factory("foo/bar");
        let response = request.create_response(false);
        assert_eq!(request.response(), None);
        assert_eq!(response.status(), Status::OK);
    }

    #[test]
    fn set_response_binds() {
        let mut request = Request::factory("foo/bar");
        let response = request.create_response(false);
        request.set_response(response.clone());
        assert_eq!(request.response(), Some(&response));
    }

    #[test]
    fn method_round_trips_and_normalizes() {
        let mut request = Request::factory("foo/bar");
        assert_eq!(request.method(), &Method::Get);
        request.set_method("post");
        assert_eq!(request.method().as_str(), "POST");
    }

    #[test]
    fn accept_type_defaults_to_wildcard() {
        let request = Request::factory("foo/bar");
        let accept = request.accept_type();
        assert_eq!(accept.len(), 1);
        assert_eq!(accept.quality("*/*"), Some(1.0));
    }

    #[test]
    fn accept_lang_default_survives_other_languages() {
        // three header shapes, en-us weighs 1.0 in each
        for header in ["en-us,en;q=0.5", "en-gb", "sp-sp;q=0.5"] {
            let mut request = Request::factory("foo/bar");
            request.headers_mut().insert("Accept-Language", header);
            assert_eq!(request.accept_lang().quality("en-us"), Some(1.0), "{header}");
        }
    }

    #[test]
    fn query_string_is_split_and_decoded() {
        let request = Request::factory("search?q=hello+world&lang=en%2Dus");
        assert_eq!(request.uri(), "search");
        assert_eq!(request.query().get("q"), Some("hello world"));
        assert_eq!(request.query().get("lang"), Some("en-us"));
    }

    #[test]
    fn url_joins_base_and_routed_uri() {
        let routes = test_router();
        let config = app_config();

        let request = Request::factory("foo/bar");
        let url = request
            .url(&routes, &config, &Parameters::new(), Some("http"))
            .unwrap();
        assert_eq!(url, "http://localhost/app/foo/bar");
    }

    #[test]
    fn url_applies_parameter_overrides() {
        let routes = test_router();
        let config = app_config();

        let request = Request::factory("foo");
        let params: Parameters = [("action", "bar")].into_iter().collect();
        let url = request.url(&routes, &config, &params, Some("http")).unwrap();
        assert_eq!(url, "http://localhost/app/foo/bar");
    }

    #[test]
    fn url_without_match_is_an_error() {
        let routes = Router::new();
        let config = app_config();
        let request = Request::factory("foo/bar");
        let err = request
            .url(&routes, &config, &Parameters::new(), None)
            .unwrap_err();
        assert!(matches!(err, RouteError::NoMatch { .. }));
    }

    #[test]
    fn parse_simple_get() {
        let raw = b"GET /foo/bar HTTP/1.1\r\nHost: localhost\r\n\r\n";
        let (request, offset) = Request::parse(raw).unwrap();
        assert_eq!(request.method(), &Method::Get);
        assert_eq!(request.uri(), "foo/bar");
        assert_eq!(request.headers().get("host"), Some("localhost"));
        assert_eq!(request.client().kind(), ClientKind::Internal);
        assert_eq!(offset, raw.len());
    }

    #[test]
    fn parse_incomplete_headers() {
        let raw = b"GET /foo HTTP/1.1\r\nHost:";
        assert!(matches!(Request::parse(raw), Err(ParseError::Incomplete)));
    }

    #[test]
    fn parse_slices_body_to_content_length() {
        let raw = b"POST /submit HTTP/1.1\r\nContent-Length: 5\r\n\r\nhelloEXTRA";
        let (request, _) = Request::parse(raw).unwrap();
        assert_eq!(request.content_length(), Some(5));
        assert_eq!(request.body().as_ref(), b"hello");
    }

    #[test]
    fn parse_query_in_request_target() {
        let raw = b"GET /search?q=rust HTTP/1.1\r\nHost: localhost\r\n\r\n";
        let (request, _) = Request::parse(raw).unwrap();
        assert_eq!(request.uri(), "search");
        assert_eq!(request.query().get("q"), Some("rust"));
    }

    #[test]
    fn keep_alive_defaults_by_version() {
        let raw = b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n";
        let (request, _) = Request::parse(raw).unwrap();
        assert!(request.is_keep_alive());

        let raw = b"GET / HTTP/1.1\r\nConnection: close\r\n\r\n";
        let (request, _) = Request::parse(raw).unwrap();
        assert!(!request.is_keep_alive());
    }

    #[test]
    fn json_body_deserializes() {
        let mut request = Request::factory("api/items");
        request.set_body(&br#"{"name":"fish"}"#[..]);
        let value: serde_json::Value = request.json().unwrap();
        assert_eq!(value["name"], "fish");
    }
}
