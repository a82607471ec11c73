use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::Middleware;
use crate::dispatcher::{BoxedHandler, Handler, HandlerRequest, HandlerResponse};

#[derive(Default)]
struct Counters {
    request_count: AtomicUsize,
    total_latency_ns: AtomicU64,
    client_errors: AtomicUsize,
    server_errors: AtomicUsize,
}

/// Middleware for collecting request statistics
///
/// All counters use atomic operations, so one instance can wrap handlers that
/// run concurrently on many threads. Clones share the same counters.
///
/// Metrics collected:
/// - Total request count
/// - Average latency (handler processing time)
/// - 4xx and 5xx response counts
#[derive(Clone, Default)]
pub struct MetricsMiddleware {
    counters: Arc<Counters>,
}

impl MetricsMiddleware {
    /// Create a new metrics middleware with all counters initialized to zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of requests processed
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.counters.request_count.load(Ordering::Relaxed)
    }

    /// Calculate the average request latency
    ///
    /// Returns zero duration if no requests have been processed yet.
    #[must_use]
    pub fn average_latency(&self) -> Duration {
        let count = self.counters.request_count.load(Ordering::Relaxed) as u64;
        if count == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(self.counters.total_latency_ns.load(Ordering::Relaxed) / count)
        }
    }

    /// Number of responses with a 4xx status
    #[must_use]
    pub fn client_errors(&self) -> usize {
        self.counters.client_errors.load(Ordering::Relaxed)
    }

    /// Number of responses with a 5xx status
    #[must_use]
    pub fn server_errors(&self) -> usize {
        self.counters.server_errors.load(Ordering::Relaxed)
    }
}

struct Measured {
    next: BoxedHandler,
    counters: Arc<Counters>,
}

impl Handler for Measured {
    fn handle(&self, req: &mut HandlerRequest, res: &mut HandlerResponse) {
        let start = Instant::now();
        self.next.handle(req, res);
        let elapsed = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);

        let c = &self.counters;
        c.request_count.fetch_add(1, Ordering::Relaxed);
        c.total_latency_ns.fetch_add(elapsed, Ordering::Relaxed);
        if res.status.is_client_error() {
            c.client_errors.fetch_add(1, Ordering::Relaxed);
        } else if res.status.is_server_error() {
            c.server_errors.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl Middleware for MetricsMiddleware {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(Measured {
            next,
            counters: Arc::clone(&self.counters),
        })
    }
}
