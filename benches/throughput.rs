use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use radixmux::dispatcher::{HandlerRequest, HandlerResponse, StaticResponse};
use radixmux::middleware::{BoxedMiddleware, MetricsMiddleware, TracingMiddleware};
use radixmux::router::{Radix, Router};

const PATTERNS: &[&str] = &[
    "/",
    "/zoo/",
    "/zoo/animals",
    "/zoo/animals/",
    "/zoo/animals/cats/",
    "/zoo/health",
    "/inventory/",
    "/inventory/feeds/",
    "/inventory/feeds/items/",
    "/static/",
    "/static/css/",
    "/static/js/app.js",
    "/api/v1/users/",
    "/api/v1/users/admin",
    "/api/v2/users/",
];

const PATHS: &[&str] = &[
    "/zoo/animals/123",
    "/zoo/animals/cats/tom",
    "/inventory/feeds/items/3/batches/4",
    "/static/js/app.js",
    "/api/v1/users/admin123",
    "/nowhere",
];

fn bench_lookup_path(c: &mut Criterion) {
    let mut tree = Radix::new();
    for (i, p) in PATTERNS.iter().enumerate() {
        tree.insert(p, i);
    }
    c.bench_function("radix_lookup_path", |b| {
        b.iter(|| {
            for path in PATHS {
                black_box(tree.lookup_path(black_box(path)));
            }
        })
    });
}

fn bench_dispatch(c: &mut Criterion) {
    let router = Router::new();
    for p in PATTERNS {
        router.handle(p, StaticResponse::text(*p));
    }
    c.bench_function("router_dispatch", |b| {
        b.iter(|| {
            for path in PATHS {
                let mut req = HandlerRequest::get(*path);
                let mut res = HandlerResponse::new();
                router.dispatch(&mut req, &mut res);
                black_box(&res);
            }
        })
    });

    router.use_middleware([
        Arc::new(MetricsMiddleware::new()) as BoxedMiddleware,
        Arc::new(TracingMiddleware) as BoxedMiddleware,
    ]);
    c.bench_function("router_dispatch_with_middleware", |b| {
        b.iter(|| {
            for path in PATHS {
                let mut req = HandlerRequest::get(*path);
                let mut res = HandlerResponse::new();
                router.dispatch(&mut req, &mut res);
                black_box(&res);
            }
        })
    });
}

criterion_group!(benches, bench_lookup_path, bench_dispatch);
criterion_main!(benches);
