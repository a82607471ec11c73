use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use http::header::{HeaderName, CONTENT_TYPE};
use http::{Extensions, HeaderMap, HeaderValue, Method, StatusCode};

use crate::ids::RequestId;

/// Request data handed to a [`Handler`]
///
/// Produced by the transport adapter. The router only ever reads `path`;
/// everything else is for handlers and middleware.
#[derive(Debug)]
pub struct HandlerRequest {
    /// Unique request ID for tracing and correlation
    pub request_id: RequestId,
    /// HTTP method (GET, POST, etc.)
    pub method: Method,
    /// Request path without the query string
    pub path: String,
    /// Raw query string, if any (never interpreted by the router)
    pub query: Option<String>,
    /// HTTP headers
    pub headers: HeaderMap,
    /// Peer address as seen by the transport
    pub remote_addr: Option<SocketAddr>,
    /// Request body
    pub body: Vec<u8>,
    /// Typed values attached by middleware for downstream handlers
    pub extensions: Extensions,
}

impl HandlerRequest {
    /// Create a request for `method` and `path` with no headers or body.
    ///
    /// A `?query` suffix on `path` is split off into [`HandlerRequest::query`].
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let mut path = path.into();
        let query = path.find('?').map(|pos| {
            let q = path[pos + 1..].to_string();
            path.truncate(pos);
            q
        });

        Self {
            request_id: RequestId::new(),
            method,
            path,
            query,
            headers: HeaderMap::new(),
            remote_addr: None,
            body: Vec::new(),
            extensions: Extensions::new(),
        }
    }

    /// Shorthand for a `GET` request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Get a header by name
    #[inline]
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Response sink a [`Handler`] writes into
///
/// Starts as `200 OK` with no headers and an empty body. Implements
/// [`io::Write`] so handlers can `write!` directly into the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body bytes
    pub body: Vec<u8>,
}

impl Default for HandlerResponse {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }
}

impl HandlerResponse {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Set a header, replacing any previous values for `name`
    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    /// Get a header by name
    #[inline]
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Append bytes to the body
    pub fn write_body(&mut self, bytes: &[u8]) {
        self.body.extend_from_slice(bytes);
    }

    /// Body as UTF-8, lossily decoded
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl io::Write for HandlerResponse {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Anything that can answer a request
///
/// Implemented for every `Fn(&mut HandlerRequest, &mut HandlerResponse)` closure,
/// so plain functions register directly.
pub trait Handler: Send + Sync {
    fn handle(&self, req: &mut HandlerRequest, res: &mut HandlerResponse);
}

impl<F> Handler for F
where
    F: Fn(&mut HandlerRequest, &mut HandlerResponse) + Send + Sync,
{
    fn handle(&self, req: &mut HandlerRequest, res: &mut HandlerResponse) {
        self(req, res)
    }
}

/// Shared, type-erased handler as stored in the routing tree
pub type BoxedHandler = Arc<dyn Handler>;

/// Box a closure as a [`BoxedHandler`]
pub fn handler_fn<F>(f: F) -> BoxedHandler
where
    F: Fn(&mut HandlerRequest, &mut HandlerResponse) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Default responder used when no route resolves: `404 page not found`
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFoundHandler;

impl Handler for NotFoundHandler {
    fn handle(&self, _req: &mut HandlerRequest, res: &mut HandlerResponse) {
        res.set_status(StatusCode::NOT_FOUND);
        res.set_header(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        res.write_body(b"404 page not found\n");
    }
}

/// Handler answering every request with the same status, body and content type
#[derive(Debug, Clone)]
pub struct StaticResponse {
    status: StatusCode,
    content_type: HeaderValue,
    body: Arc<[u8]>,
}

impl StaticResponse {
    pub fn new(status: StatusCode, content_type: HeaderValue, body: impl Into<Vec<u8>>) -> Self {
        let body: Vec<u8> = body.into();
        Self {
            status,
            content_type,
            body: Arc::from(body),
        }
    }

    /// `200 OK` plain-text response
    pub fn text(body: impl Into<Vec<u8>>) -> Self {
        Self::new(
            StatusCode::OK,
            HeaderValue::from_static("text/plain; charset=utf-8"),
            body,
        )
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl Handler for StaticResponse {
    fn handle(&self, _req: &mut HandlerRequest, res: &mut HandlerResponse) {
        res.set_status(self.status);
        res.set_header(CONTENT_TYPE, self.content_type.clone());
        res.write_body(&self.body);
    }
}
