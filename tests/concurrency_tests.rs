//! Many requests served in parallel against one frozen router.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use matcha_router::{Flow, RequestContextExt, Route, Router, RouterService};
use tower::ServiceExt;

mod common;
use common::{body_string, dump_params, get};

fn shared_router() -> Arc<Router> {
    let mut router = Router::new();
    router.attach(|res: &mut Response<Body>, req: Request<Body>| {
        if req.headers().contains_key("x-block") {
            *res.status_mut() = StatusCode::TOO_MANY_REQUESTS;
            return Flow::Halt;
        }
        Flow::Continue(req)
    });
    router.add_route(Route::get("/users/{id}").unwrap(), dump_params()).unwrap();
    router.add_route(Route::get("/files/{path*}").unwrap(), dump_params()).unwrap();
    router
        .add_route(
            Route::get("/items/{n:[0-9]+}").unwrap(),
            |res: &mut Response<Body>, req: Request<Body>| {
                let n: u64 = req.param("n").and_then(|n| n.parse().ok()).unwrap_or(0);
                *res.body_mut() = Body::from((n * 2).to_string());
            },
        )
        .unwrap();
    Arc::new(router)
}

#[test]
fn test_parallel_requests_do_not_share_params() {
    let router = shared_router();
    let halted = AtomicUsize::new(0);

    thread::scope(|s| {
        for t in 0..8 {
            let router = &router;
            let halted = &halted;
            s.spawn(move || {
                let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
                for i in 0..200 {
                    let (req, expected) = match i % 4 {
                        0 => (get(&format!("/users/{}-{}", t, i)), format!("id={}-{}", t, i)),
                        1 => (get(&format!("/files/{}/{}", t, i)), format!("path={}/{}", t, i)),
                        2 => (get(&format!("/items/{}", i)), (i * 2).to_string()),
                        _ => {
                            let req = Request::builder()
                                .uri(format!("/users/{}", i))
                                .header("x-block", "1")
                                .body(Body::empty())
                                .unwrap();
                            let res = router.serve(req);
                            assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
                            halted.fetch_add(1, Ordering::Relaxed);
                            continue;
                        }
                    };
                    let res = router.serve(req);
                    assert_eq!(res.status(), StatusCode::OK);
                    assert_eq!(rt.block_on(body_string(res)), expected);
                }
            });
        }
    });

    assert_eq!(halted.load(Ordering::Relaxed), 8 * 50);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_service_clones_serve_concurrently() {
    let service = RouterService::new(shared_router());

    let mut tasks = Vec::new();
    for i in 0..64u32 {
        let service = service.clone();
        tasks.push(tokio::spawn(async move {
            let res = service.oneshot(get(&format!("/users/{}", i))).await.unwrap();
            (i, body_string(res).await)
        }));
    }

    for task in tasks {
        let (i, body) = task.await.unwrap();
        assert_eq!(body, format!("id={}", i));
    }
}

#[test]
fn test_router_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Router>();
    assert_send_sync::<RouterService>();
}
