//! Request-scoped dispatch state.
//!
//! A [`Request`] is created fresh for every inbound call. The dispatch engine
//! mutates two of its fields while walking the stack:
//!
//! - `path` is trimmed when the request descends into a mounted [`App`] and
//!   restored when it climbs back out.
//! - `params` is replaced every time an entry's pattern matches, whether or
//!   not that entry is invoked.
//!
//! Everything else (method, headers, body, extensions) belongs to the
//! transport and to the handlers.
//!
//! [`App`]: crate::App

use crate::path::PathMatch;
use bytes::Bytes;
use http::{Extensions, HeaderMap, Method};

/// Named path parameters captured by the most recent matching pattern.
///
/// Parameters keep pattern order. Looking up a name that occurs more than
/// once returns the last occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a parameter value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rfind(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Check whether a parameter was captured.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate over `(name, value)` pairs in pattern order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of captured parameters.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if no parameter was captured.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub(crate) fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// An inbound request as seen by handlers.
#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    original_path: String,
    query: Option<String>,
    params: Params,
    matched_end: usize,
    headers: HeaderMap,
    body: Bytes,
    extensions: Extensions,
}

impl Request {
    /// Create a request for `target`, which may carry a `?query` suffix.
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query.to_owned())),
            None => (target, None),
        };
        let path = if path.is_empty() { "/" } else { path };
        Self {
            method,
            path: path.to_owned(),
            original_path: path.to_owned(),
            query,
            params: Params::default(),
            matched_end: 0,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            extensions: Extensions::new(),
        }
    }

    /// Convert a transport-level `http::Request` into a dispatchable request.
    pub fn from_http(request: http::Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();
        let mut req = Self::new(parts.method, parts.uri.path());
        req.query = parts.uri.query().map(str::to_owned);
        req.headers = parts.headers;
        req.extensions = parts.extensions;
        req.body = body;
        req
    }

    /// Replace the body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Add a header. Invalid header names or values are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            http::HeaderName::from_bytes(name.as_bytes()),
            http::HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The path relative to the innermost mounted app currently dispatching.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Rewrite the path seen by the entries that follow.
    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    /// The path exactly as the outermost app received it.
    pub fn original_path(&self) -> &str {
        &self.original_path
    }

    /// The raw query string, without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Parameters captured by the entry currently being invoked.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Shorthand for `self.params().get(name)`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Record the most recent match against the current path.
    pub(crate) fn set_match(&mut self, found: PathMatch) {
        self.params = found.params;
        self.matched_end = found.end;
    }

    /// Raw byte length of the current path consumed by the most recent match.
    pub(crate) fn matched_end(&self) -> usize {
        self.matched_end
    }

    /// Request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable request headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// The collected request body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Typed data shared between the handlers of one dispatch.
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Mutable typed data shared between the handlers of one dispatch.
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_last_wins() {
        let params: Params = [("id", "org"), ("team", "core"), ("id", "user")]
            .into_iter()
            .collect();
        assert_eq!(params.get("id"), Some("user"));
        assert_eq!(params.get("team"), Some("core"));
        assert_eq!(params.get("missing"), None);
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_new_splits_query() {
        let req = Request::new(Method::GET, "/search?q=rust&page=2");
        assert_eq!(req.path(), "/search");
        assert_eq!(req.original_path(), "/search");
        assert_eq!(req.query(), Some("q=rust&page=2"));
        assert!(req.params().is_empty());
    }

    #[test]
    fn test_empty_target_is_root() {
        let req = Request::new(Method::GET, "");
        assert_eq!(req.path(), "/");
    }

    #[test]
    fn test_from_http() {
        let http_req = http::Request::builder()
            .method(Method::POST)
            .uri("http://example.com/users/7?verbose=1")
            .header("content-type", "application/json")
            .body(Bytes::from_static(b"{}"))
            .unwrap();

        let req = Request::from_http(http_req);
        assert_eq!(req.method(), Method::POST);
        assert_eq!(req.path(), "/users/7");
        assert_eq!(req.query(), Some("verbose=1"));
        assert_eq!(req.headers()["content-type"], "application/json");
        assert_eq!(req.body().as_ref(), b"{}");
    }

    #[test]
    fn test_set_path_keeps_original() {
        let mut req = Request::new(Method::GET, "/foo/bar");
        req.set_path("/bar");
        assert_eq!(req.path(), "/bar");
        assert_eq!(req.original_path(), "/foo/bar");
    }
}
