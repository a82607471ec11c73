//! Router core module - pattern registration and per-request resolution.
//!
//! The routing tree and the middleware list live behind one shared/exclusive
//! lock. Registration takes it exclusively; resolution takes it shared and only
//! long enough to clone two `Arc`s. Middleware composition and handler
//! execution always run after the guard is dropped, so slow handlers never
//! block registration and user code never runs under the lock.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::radix::Radix;
use crate::dispatcher::{BoxedHandler, Handler, HandlerRequest, HandlerResponse, NotFoundHandler};
use crate::middleware::{compose, BoxedMiddleware, Middleware};

/// A registered pattern together with its handler
///
/// Stored as the tree value and returned by [`Router::route`], so callers can
/// tell which pattern answered a path (the exact one or a `/`-terminated
/// fallback).
#[derive(Clone)]
pub struct RouteMatch {
    /// The pattern the handler was registered under
    pub pattern: Arc<str>,
    /// The registered handler, not yet wrapped by middleware
    pub handler: BoxedHandler,
}

impl fmt::Debug for RouteMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "route({})", self.pattern)
    }
}

struct State {
    radix: Radix<RouteMatch>,
    // copy-on-write so dispatch can snapshot the chain with one Arc clone
    middleware: Arc<Vec<BoxedMiddleware>>,
}

/// HTTP request multiplexer
///
/// Matches the path of each request against the registered patterns and calls
/// the handler for the pattern that most closely matches. There are two kinds
/// of pattern:
///
/// 1. Exact: `/foo/bar` answers only `/foo/bar`.
/// 2. Subtree: `/foo/` answers `/foo/` and every path below it that has no
///    closer registration.
///
/// Paths with no exact match and no enclosing subtree pattern go to the
/// not-found handler (a `404` responder unless replaced with
/// [`Router::with_not_found`]). Register `/` to catch everything instead.
///
/// All methods take `&self`; share the router across threads with `Arc`.
pub struct Router {
    state: RwLock<State>,
    not_found: BoxedHandler,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Router")
            .field("routes", &state.radix.len())
            .field("middleware", &state.middleware.len())
            .finish_non_exhaustive()
    }
}

impl Router {
    /// Create an empty router answering unmatched paths with [`NotFoundHandler`]
    #[must_use]
    pub fn new() -> Self {
        Self::with_not_found(Arc::new(NotFoundHandler))
    }

    /// Create an empty router with a custom not-found handler
    ///
    /// The not-found handler is never wrapped by middleware.
    #[must_use]
    pub fn with_not_found(not_found: BoxedHandler) -> Self {
        Self {
            state: RwLock::new(State {
                radix: Radix::new(),
                middleware: Arc::new(Vec::new()),
            }),
            not_found,
        }
    }

    /// Append middleware to the chain, preserving iteration order.
    ///
    /// Earlier entries wrap later ones, and earlier calls wrap later calls.
    pub fn use_middleware<I>(&self, middleware: I)
    where
        I: IntoIterator<Item = BoxedMiddleware>,
    {
        let added: Vec<BoxedMiddleware> = middleware.into_iter().collect();
        if added.is_empty() {
            return;
        }

        let mut state = self.state.write();
        let chain = Arc::make_mut(&mut state.middleware);
        chain.extend(added);
        info!(middleware_count = chain.len(), "Middleware chain extended");
    }

    /// Append a single middleware to the chain
    pub fn add_middleware<M>(&self, middleware: M)
    where
        M: Middleware + 'static,
    {
        self.use_middleware([Arc::new(middleware) as BoxedMiddleware]);
    }

    /// Register `handler` for `pattern`, replacing any existing registration
    pub fn handle<H>(&self, pattern: &str, handler: H)
    where
        H: Handler + 'static,
    {
        self.handle_shared(pattern, Arc::new(handler));
    }

    /// Register an already shared handler for `pattern`
    pub fn handle_shared(&self, pattern: &str, handler: BoxedHandler) {
        let route = RouteMatch {
            pattern: Arc::from(pattern),
            handler,
        };

        let replaced = self.state.write().radix.insert(pattern, route).is_some();
        info!(
            pattern = %pattern,
            replaced,
            subtree = pattern.ends_with('/'),
            "Route registered"
        );
    }

    /// Register a handler function for `pattern`
    pub fn handle_func<F>(&self, pattern: &str, handler: F)
    where
        F: Fn(&mut HandlerRequest, &mut HandlerResponse) + Send + Sync + 'static,
    {
        self.handle(pattern, handler);
    }

    /// Remove the registration for `pattern`.
    ///
    /// Returns `false` when nothing was registered under exactly `pattern`.
    pub fn remove(&self, pattern: &str) -> bool {
        let removed = self.state.write().radix.remove(pattern).is_some();
        if removed {
            info!(pattern = %pattern, "Route removed");
        } else {
            debug!(pattern = %pattern, "Route removal skipped: not registered");
        }
        removed
    }

    /// Resolve `path` to its registration without applying middleware
    #[must_use]
    pub fn route(&self, path: &str) -> Option<RouteMatch> {
        self.state.read().radix.lookup_path(path).cloned()
    }

    /// Resolve `path` to the registered handler, if any
    ///
    /// Returns `None` where [`Router::dispatch`] would fall back to the
    /// not-found handler.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<BoxedHandler> {
        self.route(path).map(|m| m.handler)
    }

    /// Number of registered patterns
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().radix.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render the routing tree for diagnostics
    #[must_use]
    pub fn dump(&self) -> String {
        self.state.read().radix.dump_string()
    }

    /// Resolve the request path, wrap the handler with the middleware chain
    /// and invoke it.
    pub fn dispatch(&self, req: &mut HandlerRequest, res: &mut HandlerResponse) {
        let handler = self.prepare(&req.path);
        handler.handle(req, res);
    }

    /// Like [`Router::dispatch`] but resolves `path` instead of `req.path`
    pub fn dispatch_path(&self, path: &str, req: &mut HandlerRequest, res: &mut HandlerResponse) {
        let handler = self.prepare(path);
        handler.handle(req, res);
    }

    fn prepare(&self, path: &str) -> BoxedHandler {
        let resolved = {
            let state = self.state.read();
            state
                .radix
                .lookup_path(path)
                .map(|route| (route.clone(), Arc::clone(&state.middleware)))
        };

        match resolved {
            Some((route, chain)) => {
                debug!(
                    path = %path,
                    pattern = %route.pattern,
                    middleware_count = chain.len(),
                    "Route matched"
                );
                compose(&chain, route.handler)
            }
            None => {
                warn!(path = %path, "No route matched");
                Arc::clone(&self.not_found)
            }
        }
    }
}

/// A router is itself a handler, so it can be mounted under another router's
/// pattern or handed straight to a transport adapter.
impl Handler for Router {
    fn handle(&self, req: &mut HandlerRequest, res: &mut HandlerResponse) {
        self.dispatch(req, res);
    }
}
