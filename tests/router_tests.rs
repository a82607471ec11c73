#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Integration tests for pattern registration, resolution and dispatch
//!
//! # Test Coverage
//!
//! - Prefix tree scenarios through the public `Radix` API
//! - Nearest-root fallback through `Router::route`
//! - Middleware ordering on dispatch and its absence on the not-found path
//! - Shared/exclusive locking: concurrent dispatch with registration, and
//!   handlers/middleware that re-enter the router

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use http::header::HeaderName;
use http::{HeaderValue, StatusCode};
use radixmux::dispatcher::{handler_fn, BoxedHandler, Handler, HandlerRequest, HandlerResponse};
use radixmux::middleware::BoxedMiddleware;
use radixmux::router::{Radix, Router};

fn dispatch(router: &Router, path: &str) -> HandlerResponse {
    let mut req = HandlerRequest::get(path);
    let mut res = HandlerResponse::new();
    router.dispatch(&mut req, &mut res);
    res
}

/// Middleware that sets `header` and records pre/post markers in the body
fn marker(header: &'static str, tag: &'static str) -> BoxedMiddleware {
    Arc::new(move |next: BoxedHandler| -> BoxedHandler {
        handler_fn(move |req: &mut HandlerRequest, res: &mut HandlerResponse| {
            res.set_header(HeaderName::from_static(header), HeaderValue::from_static(tag));
            res.write_body(format!("{tag}-pre;").as_bytes());
            next.handle(req, res);
            res.write_body(format!("{tag}-post;").as_bytes());
        })
    })
}

#[test]
fn test_radix_literal_scenario() {
    let mut tree = Radix::new();
    for (k, v) in [
        ("romane", 1),
        ("romanus", 2),
        ("romulus", 3),
        ("rubens", 4),
        ("ruber", 5),
        ("rubicon", 6),
        ("rubicundus", 7),
        ("rom", 8),
    ] {
        tree.insert(k, v);
    }

    assert_eq!(tree.lookup("rom"), Some(&8));
    assert_eq!(tree.lookup("romane"), Some(&1));
    assert_eq!(tree.lookup("rub"), None);
}

#[test]
fn test_radix_round_trip_overwrite_delete() {
    let mut tree = Radix::new();
    assert_eq!(tree.insert("/k", "v1"), None);
    assert_eq!(tree.lookup("/k"), Some(&"v1"));
    assert_eq!(tree.insert("/k", "v2"), Some("v1"));
    assert_eq!(tree.lookup("/k"), Some(&"v2"));
    assert_eq!(tree.remove("/k"), Some("v2"));
    assert_eq!(tree.lookup("/k"), None);
    assert_eq!(tree.remove("/k"), None);
}

#[test]
fn test_router_fallback_scenario() {
    let router = Router::new();
    for pattern in ["/", "/api", "/api/users", "/api/users/", "/api/users/admin"] {
        router.handle_func(pattern, |_req: &mut HandlerRequest, _res: &mut HandlerResponse| {});
    }

    let pattern = |path: &str| router.route(path).map(|m| m.pattern.to_string());
    assert_eq!(pattern("/api/users/admin123").as_deref(), Some("/api/users/"));
    assert_eq!(pattern("/api/").as_deref(), Some("/"));
    assert_eq!(pattern("/not-found").as_deref(), Some("/"));
    assert_eq!(pattern("/api/users/").as_deref(), Some("/api/users/"));
    assert_eq!(pattern("/api/users/admin").as_deref(), Some("/api/users/admin"));
}

#[test]
fn test_middleware_runs_outermost_first() {
    let router = Router::new();
    router.use_middleware([marker("x-middleware-1", "m1"), marker("x-middleware-2", "m2")]);
    router.handle_func("/", |_req: &mut HandlerRequest, res: &mut HandlerResponse| {
        res.set_status(StatusCode::NO_CONTENT);
        res.write_body(b"h;");
    });

    let res = dispatch(&router, "/test");
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert_eq!(res.header("x-middleware-1"), Some("m1"));
    assert_eq!(res.header("x-middleware-2"), Some("m2"));
    assert_eq!(res.body_text(), "m1-pre;m2-pre;h;m2-post;m1-post;");
}

#[test]
fn test_separate_use_calls_keep_order() {
    let router = Router::new();
    router.use_middleware([marker("x-middleware-1", "m1")]);
    router.use_middleware([marker("x-middleware-2", "m2")]);
    router.handle_func("/", |_req: &mut HandlerRequest, res: &mut HandlerResponse| {
        res.write_body(b"h;");
    });

    assert_eq!(dispatch(&router, "/").body_text(), "m1-pre;m2-pre;h;m2-post;m1-post;");
}

#[test]
fn test_middleware_added_after_registration_applies() {
    let router = Router::new();
    router.handle_func("/", |_req: &mut HandlerRequest, res: &mut HandlerResponse| {
        res.write_body(b"h;");
    });
    assert_eq!(dispatch(&router, "/").body_text(), "h;");

    router.use_middleware([marker("x-middleware-1", "m1")]);
    assert_eq!(dispatch(&router, "/").body_text(), "m1-pre;h;m1-post;");
}

#[test]
fn test_not_found_skips_middleware() {
    let router = Router::new();
    router.use_middleware([marker("x-middleware-1", "m1"), marker("x-middleware-2", "m2")]);

    let res = dispatch(&router, "/test");
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.header("x-middleware-1"), None);
    assert_eq!(res.header("x-middleware-2"), None);
    assert_eq!(res.body_text(), "404 page not found\n");
}

#[test]
fn test_root_catch_all_gets_middleware() {
    let router = Router::new();
    router.use_middleware([marker("x-middleware-1", "m1")]);
    router.handle_func("/", |_req: &mut HandlerRequest, res: &mut HandlerResponse| {
        res.set_status(StatusCode::NOT_FOUND);
    });

    let res = dispatch(&router, "/missing");
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.header("x-middleware-1"), Some("m1"));
}

#[test]
fn test_middleware_can_attach_request_context() {
    #[derive(Clone)]
    struct User(&'static str);

    let router = Router::new();
    router.use_middleware([Arc::new(|next: BoxedHandler| -> BoxedHandler {
        handler_fn(move |req: &mut HandlerRequest, res: &mut HandlerResponse| {
            if req.header("cookie") == Some("auth=alice") {
                req.extensions.insert(User("alice"));
            }
            next.handle(req, res);
        })
    }) as BoxedMiddleware]);
    router.handle_func("/", |req: &mut HandlerRequest, res: &mut HandlerResponse| {
        match req.extensions.get::<User>() {
            Some(user) => res.write_body(format!("Hello, {}!", user.0).as_bytes()),
            None => res.set_status(StatusCode::UNAUTHORIZED),
        }
    });

    let mut req = HandlerRequest::get("/");
    req.headers
        .insert(http::header::COOKIE, HeaderValue::from_static("auth=alice"));
    let mut res = HandlerResponse::new();
    router.dispatch(&mut req, &mut res);
    assert_eq!(res.body_text(), "Hello, alice!");

    assert_eq!(dispatch(&router, "/").status, StatusCode::UNAUTHORIZED);
}

#[test]
fn test_concurrent_dispatch_and_registration() {
    let router = Arc::new(Router::new());
    router.handle_func("/", |_req: &mut HandlerRequest, res: &mut HandlerResponse| {
        res.write_body(b"root");
    });

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let router = Arc::clone(&router);
            thread::spawn(move || {
                for _ in 0..2000 {
                    let body = dispatch(&router, "/jobs/42").body_text();
                    assert!(body == "root" || body == "jobs", "unexpected body {body}");
                }
            })
        })
        .collect();

    for _ in 0..200 {
        router.handle_func("/jobs/", |_req: &mut HandlerRequest, res: &mut HandlerResponse| {
            res.write_body(b"jobs");
        });
        assert!(router.remove("/jobs/"));
    }

    for r in readers {
        r.join().unwrap();
    }
    assert_eq!(router.len(), 1);
}

#[test]
fn test_running_handler_does_not_block_registration() {
    let router = Arc::new(Router::new());
    let (started_tx, started_rx) = mpsc::channel::<()>();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let release_rx = std::sync::Mutex::new(release_rx);

    router.handle_func("/slow", move |_req: &mut HandlerRequest, res: &mut HandlerResponse| {
        started_tx.send(()).unwrap();
        release_rx.lock().unwrap().recv().unwrap();
        res.write_body(b"slow");
    });

    let worker = {
        let router = Arc::clone(&router);
        thread::spawn(move || dispatch(&router, "/slow").body_text())
    };

    started_rx.recv().unwrap();
    // would deadlock if the handler ran under the lock
    router.handle_func("/fast", |_req: &mut HandlerRequest, res: &mut HandlerResponse| {
        res.write_body(b"fast");
    });
    assert_eq!(dispatch(&router, "/fast").body_text(), "fast");
    release_tx.send(()).unwrap();

    assert_eq!(worker.join().unwrap(), "slow");
}

#[test]
fn test_handler_and_middleware_may_reenter_router() {
    let router = Arc::new(Router::new());

    let weak = Arc::downgrade(&router);
    router.use_middleware([Arc::new(move |next: BoxedHandler| -> BoxedHandler {
        // composing happens outside the lock, so reading the router here is fine
        if let Some(router) = weak.upgrade() {
            assert!(router.len() >= 1);
        }
        next
    }) as BoxedMiddleware]);

    let weak = Arc::downgrade(&router);
    router.handle_func("/register", move |_req: &mut HandlerRequest, res: &mut HandlerResponse| {
        if let Some(router) = weak.upgrade() {
            router.handle_func("/added", |_req: &mut HandlerRequest, res: &mut HandlerResponse| {
                res.write_body(b"added");
            });
        }
        res.set_status(StatusCode::CREATED);
    });

    assert_eq!(dispatch(&router, "/register").status, StatusCode::CREATED);
    assert_eq!(dispatch(&router, "/added").body_text(), "added");
}

#[test]
fn test_lookup_returns_registered_handler() {
    let router = Router::new();
    let handler: BoxedHandler = handler_fn(|_req, res| res.write_body(b"it"));
    router.handle_shared("/it", Arc::clone(&handler));

    let found = router.lookup("/it").expect("registered");
    assert!(Arc::ptr_eq(&found, &handler));

    let mut req = HandlerRequest::get("/it");
    let mut res = HandlerResponse::new();
    found.handle(&mut req, &mut res);
    assert_eq!(res.body_text(), "it");
}
