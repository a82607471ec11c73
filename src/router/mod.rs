//! # Router Module
//!
//! The router module resolves request paths to handlers using a compressed
//! prefix tree.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Storing `pattern -> handler` registrations in a [`Radix`] tree
//! - Resolving each request path to the most specific registration
//! - Wrapping the resolved handler with the middleware chain and invoking it
//!
//! ## Resolution rules
//!
//! Patterns are literal strings; there are no parameters or wildcards.
//!
//! 1. An exact registration for the path always wins.
//! 2. Otherwise the deepest traversed registration ending in `/` answers
//!    (`/static/` answers `/static/css/site.css`).
//! 3. Otherwise the root registration answers, if any. A pattern not ending in
//!    `/` never acts as a fallback (`/api` does not answer `/api/x`).
//! 4. Otherwise the not-found handler answers, without middleware.
//!
//! ## Example
//!
//! ```rust
//! use radixmux::dispatcher::{HandlerRequest, HandlerResponse};
//! use radixmux::router::Router;
//!
//! let router = Router::new();
//! router.handle_func("/", |_req: &mut HandlerRequest, res: &mut HandlerResponse| {
//!     res.write_body(b"root");
//! });
//! router.handle_func("/api/users/", |_req: &mut HandlerRequest, res: &mut HandlerResponse| {
//!     res.write_body(b"users");
//! });
//!
//! assert_eq!(router.route("/api/users/42").map(|m| m.pattern.to_string()), Some("/api/users/".into()));
//! assert_eq!(router.route("/api/other").map(|m| m.pattern.to_string()), Some("/".into()));
//!
//! let mut req = HandlerRequest::get("/api/users/42");
//! let mut res = HandlerResponse::new();
//! router.dispatch(&mut req, &mut res);
//! assert_eq!(res.body_text(), "users");
//! ```
//!
//! ## Concurrency
//!
//! One `RwLock` guards the tree and the middleware list together. Registration
//! is exclusive, resolution is shared, and handlers run outside the lock.

mod core;
mod radix;

pub use self::core::{RouteMatch, Router};
pub use self::radix::Radix;
