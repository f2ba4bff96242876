//! The response being built by a dispatch.
//!
//! A response is "ended" once a handler (or the terminal handler) calls
//! [`Response::end`] or [`Response::send`]. The transport writes whatever the
//! response holds after the dispatch future resolves.

use bytes::{Bytes, BytesMut};
use http::{HeaderMap, HeaderValue, StatusCode, header::IntoHeaderName};

/// An outbound response under construction.
#[derive(Debug, Default)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: BytesMut,
    ended: bool,
}

impl Response {
    /// Create an empty `200 OK` response.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Set the status code.
    pub fn set_status(&mut self, status: StatusCode) -> &mut Self {
        self.status = status;
        self
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable response headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Insert a header, replacing any previous value.
    pub fn set_header<K: IntoHeaderName>(&mut self, name: K, value: HeaderValue) -> &mut Self {
        self.headers.insert(name, value);
        self
    }

    /// Append a chunk to the body.
    ///
    /// Writes after [`end`](Self::end) are discarded.
    pub fn write(&mut self, chunk: impl AsRef<[u8]>) -> &mut Self {
        if self.ended {
            tracing::warn!(
                bytes = chunk.as_ref().len(),
                "write after response end ignored"
            );
        } else {
            self.body.extend_from_slice(chunk.as_ref());
        }
        self
    }

    /// Finish the response.
    pub fn end(&mut self) {
        self.ended = true;
    }

    /// Write a final chunk and finish the response.
    pub fn send(&mut self, chunk: impl AsRef<[u8]>) {
        self.write(chunk);
        self.end();
    }

    /// Whether the response has been finished.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// The body written so far.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The body written so far, as UTF-8 (lossy).
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Convert into a transport-level `http::Response`.
    pub fn into_http(self) -> http::Response<Bytes> {
        let mut response = http::Response::new(self.body.freeze());
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
