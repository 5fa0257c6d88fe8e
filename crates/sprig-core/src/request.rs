//! Request capability and the in-memory request type

use crate::Method;
use bytes::Bytes;
use smallvec::SmallVec;
use std::collections::HashMap;

/// What the router needs from a server's request object
///
/// Servers implement this for their own request/context type; the router
/// never depends on a concrete server.
pub trait RequestContext {
    /// HTTP method as sent on the wire
    fn method(&self) -> &str;

    /// Raw request path (without query string)
    fn path(&self) -> &[u8];

    /// Store a bound route parameter
    fn set_param(&mut self, name: &str, value: &str);

    /// Header lookup, used by the logging middleware for request ids
    fn header(&self, _name: &str) -> Option<&str> {
        None
    }
}

/// HTTP Request
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method
    pub method: Method,
    /// Request path (without query string)
    pub path: String,
    /// Request headers (stack-allocated for small header counts)
    pub headers: SmallVec<[(String, String); 16]>,
    /// Request body
    pub body: Bytes,
    /// Route parameters (populated by router)
    pub params: HashMap<String, String>,
}

impl Request {
    /// Create a new request
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: SmallVec::new(),
            body: Bytes::new(),
            params: HashMap::new(),
        }
    }

    /// Build a request from `http` request parts
    ///
    /// Headers whose value is not visible ASCII are skipped.
    #[cfg(feature = "http")]
    pub fn from_http(parts: &http::request::Parts, body: Bytes) -> crate::Result<Self> {
        let method = Method::try_from(&parts.method)?;
        let headers = parts
            .headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();

        Ok(Self {
            method,
            path: parts.uri.path().to_string(),
            headers,
            body,
            params: HashMap::new(),
        })
    }

    /// Get a header value (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Get a route parameter
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|s| s.as_str())
    }
}

impl RequestContext for Request {
    fn method(&self) -> &str {
        self.method.as_str()
    }

    fn path(&self) -> &[u8] {
        self.path.as_bytes()
    }

    fn set_param(&mut self, name: &str, value: &str) {
        self.params.insert(name.to_string(), value.to_string());
    }

    fn header(&self, name: &str) -> Option<&str> {
        Request::header(self, name)
    }
}

/// Builder for constructing requests
pub struct RequestBuilder {
    request: Request,
}

impl RequestBuilder {
    /// Create a new builder
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            request: Request::new(method, path),
        }
    }

    /// Add a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.headers.push((name.into(), value.into()));
        self
    }

    /// Set body
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.request.body = body.into();
        self
    }

    /// Build the request
    pub fn build(self) -> Request {
        self.request
    }
}
