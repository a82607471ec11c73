use std::time::Instant;

use tracing::{info, info_span, warn};

use super::Middleware;
use crate::dispatcher::{BoxedHandler, Handler, HandlerRequest, HandlerResponse};

/// Request logging middleware
///
/// Runs the wrapped handler inside a `request` span carrying the request id,
/// method and path, then emits one event with the final status and latency.
/// Server errors are logged at `WARN`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMiddleware;

struct Traced {
    next: BoxedHandler,
}

impl Handler for Traced {
    fn handle(&self, req: &mut HandlerRequest, res: &mut HandlerResponse) {
        let span = info_span!(
            "request",
            request_id = %req.request_id,
            method = %req.method,
            path = %req.path,
        );
        let _guard = span.enter();

        let start = Instant::now();
        self.next.handle(req, res);
        let latency_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);

        if res.status.is_server_error() {
            warn!(status = res.status.as_u16(), latency_us, "Request failed");
        } else {
            info!(status = res.status.as_u16(), latency_us, "Request completed");
        }
    }
}

impl Middleware for TracingMiddleware {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        std::sync::Arc::new(Traced { next })
    }
}
