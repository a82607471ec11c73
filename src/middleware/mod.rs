//! # Middleware Module
//!
//! Middleware wraps the resolved handler before the router invokes it. Each
//! wrapper receives the next handler and returns a new one, so pre-logic runs
//! before calling `next` and post-logic after it returns.
//!
//! ## Ordering
//!
//! Wrappers registered with [`crate::router::Router::use_middleware`] compose
//! outermost-first:
//!
//! ```text
//! use_middleware([M1, M2]); handle("/", H)
//!
//! M1 pre -> M2 pre -> H -> M2 post -> M1 post
//! ```
//!
//! The chain only wraps handlers resolved from the routing tree. The router's
//! not-found handler is invoked bare.
//!
//! ## Built-in middleware
//!
//! - [`TracingMiddleware`] - request span plus a completion event
//! - [`MetricsMiddleware`] - atomic request/latency/error counters

mod core;
mod metrics;
mod tracing;

pub use self::core::{compose, BoxedMiddleware, Middleware};
pub use self::metrics::MetricsMiddleware;
pub use self::tracing::TracingMiddleware;
