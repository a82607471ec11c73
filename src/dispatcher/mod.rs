//! # Dispatcher Module
//!
//! The dispatcher module defines the contract between the router and the code
//! that answers requests.
//!
//! ## Overview
//!
//! - [`HandlerRequest`] - the request as handed over by the transport adapter
//! - [`HandlerResponse`] - the response sink handlers write status, headers and body into
//! - [`Handler`] - the single capability the router stores and invokes
//!
//! The router never inspects a handler; it only resolves one for a path and
//! calls [`Handler::handle`].
//!
//! ## Handler Registration
//!
//! Closures and functions with the right shape are handlers:
//!
//! ```rust
//! use radixmux::dispatcher::{HandlerRequest, HandlerResponse};
//! use radixmux::router::Router;
//! use http::StatusCode;
//!
//! fn root(_req: &mut HandlerRequest, res: &mut HandlerResponse) {
//!     res.set_status(StatusCode::NO_CONTENT);
//! }
//!
//! let router = Router::new();
//! router.handle_func("/", root);
//! router.handle_func("/hello", |req: &mut HandlerRequest, res: &mut HandlerResponse| {
//!     res.write_body(format!("Hello from {}", req.path).as_bytes());
//! });
//! ```
//!
//! ## Built-in handlers
//!
//! - [`NotFoundHandler`] answers `404 page not found` and is the router's default
//! - [`StaticResponse`] answers a fixed status and body, used by route tables

mod core;

pub use self::core::{
    handler_fn, BoxedHandler, Handler, HandlerRequest, HandlerResponse, NotFoundHandler,
    StaticResponse,
};
