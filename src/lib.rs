//! # radixmux
//!
//! **radixmux** is an HTTP request multiplexer built on a compressed prefix
//! tree. Patterns are literal path strings; a pattern ending in `/` also
//! answers every unmatched path below it.
//!
//! ## Overview
//!
//! The core has two contracts: "register a handler for a pattern" and "given a
//! path, produce a handler". Everything network-facing (listeners, HTTP
//! parsing, connection handling) belongs to a transport adapter that builds a
//! [`dispatcher::HandlerRequest`] and calls [`router::Router::dispatch`].
//!
//! ## Architecture
//!
//! - **[`router`]** - the [`router::Radix`] prefix tree and the [`router::Router`] built on it
//! - **[`dispatcher`]** - request/response types and the [`dispatcher::Handler`] capability
//! - **[`middleware`]** - handler wrappers plus tracing and metrics middleware
//! - **[`config`]** - TOML route tables
//! - **[`logging`]** - `tracing_subscriber` initialization from the environment
//! - **[`cli`]** - the `radixmux` command-line tool
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Transport as Transport adapter
//!     participant Router
//!     participant Tree as Radix tree
//!     participant Chain as Middleware chain
//!     participant Handler
//!
//!     Transport->>Router: dispatch(req, res)
//!     Router->>Tree: lookup_path(req.path) (shared lock)
//!     alt Route resolved
//!         Tree-->>Router: RouteMatch + middleware snapshot
//!         Router->>Chain: compose (lock released)
//!         Chain->>Handler: M1 -> M2 -> ... -> handler
//!     else Nothing resolved
//!         Router->>Handler: not-found handler, no middleware
//!     end
//!     Handler-->>Transport: status, headers, body in res
//! ```
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use http::StatusCode;
//! use radixmux::dispatcher::{HandlerRequest, HandlerResponse};
//! use radixmux::middleware::{BoxedMiddleware, MetricsMiddleware, TracingMiddleware};
//! use radixmux::router::Router;
//!
//! let metrics = MetricsMiddleware::new();
//! let router = Router::new();
//! router.use_middleware([
//!     Arc::new(TracingMiddleware) as BoxedMiddleware,
//!     Arc::new(metrics.clone()) as BoxedMiddleware,
//! ]);
//! router.handle_func("/hello", |_req: &mut HandlerRequest, res: &mut HandlerResponse| {
//!     res.write_body(b"Hello!");
//! });
//! router.handle_func("/static/", |req: &mut HandlerRequest, res: &mut HandlerResponse| {
//!     res.write_body(format!("Resource path: {}", req.path).as_bytes());
//! });
//!
//! let mut req = HandlerRequest::get("/static/css/site.css");
//! let mut res = HandlerResponse::new();
//! router.dispatch(&mut req, &mut res);
//! assert_eq!(res.body_text(), "Resource path: /static/css/site.css");
//!
//! let mut req = HandlerRequest::get("/nope");
//! let mut res = HandlerResponse::new();
//! router.dispatch(&mut req, &mut res);
//! assert_eq!(res.status, StatusCode::NOT_FOUND);
//! assert_eq!(metrics.request_count(), 1);
//! ```

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod router;

pub use dispatcher::{Handler, HandlerRequest, HandlerResponse};
pub use middleware::Middleware;
pub use router::{Radix, RouteMatch, Router};
