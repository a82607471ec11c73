use std::sync::Arc;

use crate::dispatcher::BoxedHandler;

/// Wrapper turning one handler into another
///
/// Middleware registered first becomes the outermost layer: it runs first on
/// the way in and last on the way out. Implemented for every
/// `Fn(BoxedHandler) -> BoxedHandler` closure.
///
/// ```rust
/// use radixmux::dispatcher::{handler_fn, BoxedHandler, Handler, HandlerRequest, HandlerResponse};
/// use radixmux::middleware::Middleware;
/// use http::{header::HeaderName, HeaderValue};
///
/// let powered_by = |next: BoxedHandler| -> BoxedHandler {
///     handler_fn(move |req: &mut HandlerRequest, res: &mut HandlerResponse| {
///         res.set_header(
///             HeaderName::from_static("x-powered-by"),
///             HeaderValue::from_static("radixmux"),
///         );
///         next.handle(req, res);
///     })
/// };
/// let _wrapped = powered_by.wrap(handler_fn(|_req, _res| {}));
/// ```
pub trait Middleware: Send + Sync {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler;
}

impl<F> Middleware for F
where
    F: Fn(BoxedHandler) -> BoxedHandler + Send + Sync,
{
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        self(next)
    }
}

/// Shared, type-erased middleware as stored by the router
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// Wrap `handler` with `chain`, first entry outermost.
#[must_use]
pub fn compose(chain: &[BoxedMiddleware], handler: BoxedHandler) -> BoxedHandler {
    chain.iter().rev().fold(handler, |next, mw| mw.wrap(next))
}
