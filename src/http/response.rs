//! The mutable response container.
//!
//! A [`Response`] is a status/header/body triple bound one-to-one to a
//! [`Request`](super::Request) after dispatch. It serializes itself to
//! HTTP/1.1 wire format for the server module.

use bytes::{BufMut, BytesMut};

use super::{Headers, Status};

/// An HTTP response.
///
/// Comparisons look at status, headers, and body, which is how response
/// binding on a request is observed in tests.
///
/// # Examples
///
/// ```
/// use courier::http::{Response, Status};
///
/// let response = Response::new(Status::OK)
///     .header("Content-Type", "application/json")
///     .body(r#"{"ok":true}"#);
///
/// assert_eq!(response.status(), Status::OK);
/// assert_eq!(response.text(), r#"{"ok":true}"#);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: Status,
    headers: Headers,
    body: Vec<u8>,
    keep_alive: bool,
}

impl Response {
    /// Creates a response with the given status and an empty body.
    pub fn new(status: Status) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: Vec::new(),
            keep_alive: true,
        }
    }

    /// Creates a `200 OK` response with a JSON body and content type.
    pub fn json<T: serde::Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::new(Status::OK)
            .header("Content-Type", "application/json")
            .body_bytes(serde_json::to_vec(value)?))
    }

    /// Appends a header (builder form). Repeated names are additive.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the body from a string (builder form).
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into().into_bytes();
        self
    }

    /// Sets the body from raw bytes (builder form).
    #[must_use]
    pub fn body_bytes(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Controls the `Connection` header written during serialization.
    #[must_use]
    pub fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn set_status(&mut self, status: Status) -> &mut Self {
        self.status = status;
        self
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// The body as bytes.
    pub fn body_raw(&self) -> &[u8] {
        &self.body
    }

    /// The body decoded as UTF-8, lossily.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// In-place body replacement, for handlers that received the response
    /// from elsewhere and only want to swap the payload.
    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) -> &mut Self {
        self.body = body.into();
        self
    }

    /// Serializes to HTTP/1.1 wire format.
    ///
    /// `Content-Length` is always written. A `Content-Type` of
    /// `text/plain; charset=utf-8` is supplied for non-empty bodies that did
    /// not set one, and the `Connection` header reflects
    /// [`keep_alive`](Self::keep_alive).
    pub fn into_bytes(mut self) -> BytesMut {
        let content_length = self.body.len();

        if !self.body.is_empty() && !self.headers.contains("content-type") {
            self.headers
                .insert("Content-Type", "text/plain; charset=utf-8");
        }

        self.headers.set(
            "Connection",
            if self.keep_alive { "keep-alive" } else { "close" },
        );

        let estimated = 128 + self.headers.len() * 64 + content_length;
        let mut buf = BytesMut::with_capacity(estimated);

        buf.put(
            format!(
                "HTTP/1.1 {} {}\r\n",
                self.status.as_u16(),
                self.status.reason()
            )
            .as_bytes(),
        );

        for (name, value) in self.headers.iter() {
            buf.put(format!("{name}: {value}\r\n").as_bytes());
        }

        buf.put(format!("Content-Length: {content_length}\r\n").as_bytes());
        buf.put(&b"\r\n"[..]);

        if !self.body.is_empty() {
            buf.put(self.body.as_slice());
        }

        buf
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(Status::OK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_string(bytes: BytesMut) -> String {
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn serializes_status_line_and_length() {
        let r = Response::new(Status::OK).body("Hello");
        let s = to_string(r.into_bytes());
        assert!(s.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(s.contains("Content-Length: 5\r\n"));
        assert!(s.ends_with("\r\n\r\nHello"));
    }

    #[test]
    fn empty_body_gets_no_content_type() {
        let r = Response::new(Status::NO_CONTENT);
        let s = to_string(r.into_bytes());
        assert!(!s.contains("Content-Type"));
        assert!(s.contains("Content-Length: 0\r\n"));
    }

    #[test]
    fn connection_close_is_written() {
        let r = Response::new(Status::OK).keep_alive(false);
        let s = to_string(r.into_bytes());
        assert!(s.contains("Connection: close\r\n"));
    }

    #[test]
    fn equal_responses_compare_equal() {
        let a = Response::new(Status::OK).body("same");
        let b = Response::new(Status::OK).body("same");
        assert_eq!(a, b);
        assert_ne!(a, Response::new(Status::NOT_FOUND).body("same"));
    }

    #[test]
    fn mutators_update_in_place() {
        let mut r = Response::new(Status::OK);
        r.set_status(Status::NOT_FOUND).set_body("gone");
        assert_eq!(r.status(), Status::NOT_FOUND);
        assert_eq!(r.text(), "gone");
    }

    #[test]
    fn json_builder_sets_content_type() {
        let r = Response::json(&serde_json::json!({"ok": true})).unwrap();
        assert_eq!(r.headers().get("content-type"), Some("application/json"));
        assert_eq!(r.text(), r#"{"ok":true}"#);
    }

    #[test]
    fn unknown_status_serializes_numerically() {
        let r = Response::new(Status::from_u16(599));
        let s = to_string(r.into_bytes());
        assert!(s.starts_with("HTTP/1.1 599 Unknown\r\n"));
    }
}
