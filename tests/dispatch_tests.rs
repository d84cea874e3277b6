//! Dispatch pipeline: ordering, halting, not-found handling and capacity checks.

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use matcha_router::{Flow, Handler, Middleware, RequestContextExt, Route, Router, RouterError};

mod common;
use common::{body_string, dump_params, get, tagged, EventLog};

fn halting(status: StatusCode, body: &'static str) -> Middleware {
    Middleware::new(move |res: &mut Response<Body>, _req: Request<Body>| {
        *res.status_mut() = status;
        *res.body_mut() = Body::from(body);
        Flow::Halt
    })
}

#[test]
fn test_order_global_then_route_then_handler() {
    let log = EventLog::default();
    let mut router = Router::new();
    router.attach(log.recorder("global-1"));
    router.attach(log.recorder("global-2"));
    let route = Route::get("/x")
        .unwrap()
        .with_middleware(log.recorder("route-1"))
        .with_middleware(log.recorder("route-2"));
    router.add_route(route, log.handler("handler")).unwrap();

    let res = router.serve(get("/x"));
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        log.events(),
        vec!["global-1", "global-2", "route-1", "route-2", "handler"]
    );
}

#[tokio::test]
async fn test_global_halt_short_circuits_everything() {
    let log = EventLog::default();
    let mut router = Router::new();
    router.attach(halting(StatusCode::UNAUTHORIZED, "denied"));
    router.attach(log.recorder("global-after-halt"));
    router.set_not_found(log.handler("not-found"));
    let route = Route::get("/x").unwrap().with_middleware(log.recorder("route"));
    router.add_route(route, log.handler("handler")).unwrap();

    for path in ["/x", "/missing"] {
        let res = router.serve(get(path));
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_string(res).await, "denied");
    }
    assert!(log.events().is_empty());
}

#[tokio::test]
async fn test_route_halt_skips_handler_only_for_that_route() {
    let log = EventLog::default();
    let mut router = Router::new();
    router.attach(log.recorder("global"));
    let guarded = Route::get("/admin")
        .unwrap()
        .with_middleware(halting(StatusCode::FORBIDDEN, "no"))
        .with_middleware(log.recorder("after-halt"));
    router.add_route(guarded, log.handler("admin")).unwrap();
    router.add_route(Route::get("/open").unwrap(), log.handler("open")).unwrap();

    let res = router.serve(get("/admin"));
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_string(res).await, "no");

    let res = router.serve(get("/open"));
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(log.events(), vec!["global", "global", "open"]);
}

#[test]
fn test_global_middleware_cannot_see_params_route_middleware_can() {
    let log = EventLog::default();
    let mut router = Router::new();

    let seen = log.clone();
    router.attach(move |_res: &mut Response<Body>, req: Request<Body>| {
        seen.push(format!("global:{:?}", req.param("id")));
        Flow::Continue(req)
    });

    let seen = log.clone();
    let route = Route::get("/users/{id}").unwrap().with_middleware(
        move |_res: &mut Response<Body>, req: Request<Body>| {
            seen.push(format!("route:{:?}", req.param("id")));
            Flow::Continue(req)
        },
    );
    router.add_route(route, Handler::status(StatusCode::OK)).unwrap();

    router.serve(get("/users/77"));
    assert_eq!(log.events(), vec!["global:None", "route:Some(\"77\")"]);
}

#[test]
fn test_route_middleware_can_rewrite_request_for_handler() {
    let mut router = Router::new();
    let route = Route::get("/x").unwrap().with_middleware(
        |_res: &mut Response<Body>, mut req: Request<Body>| {
            req.headers_mut().insert("x-user", "alice".parse().unwrap());
            Flow::Continue(req)
        },
    );
    router
        .add_route(route, |res: &mut Response<Body>, req: Request<Body>| {
            let user = req.headers()["x-user"].clone();
            res.headers_mut().insert("x-user", user);
        })
        .unwrap();

    let res = router.serve(get("/x"));
    assert_eq!(res.headers()["x-user"], "alice");
}

#[tokio::test]
async fn test_no_match_never_invokes_route_handlers() {
    let log = EventLog::default();
    let mut router = Router::new();
    router.add_route(Route::get("/users/{id}").unwrap(), log.handler("users")).unwrap();
    router.add_route(Route::post("/users").unwrap(), log.handler("create")).unwrap();

    for path in ["/users", "/users/1/2", "/other", "/"] {
        let res = router.serve(get(path));
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(res).await, "");
    }
    assert!(log.events().is_empty());
}

#[tokio::test]
async fn test_custom_not_found_handler() {
    let mut router = Router::new();
    router.set_not_found(|res: &mut Response<Body>, req: Request<Body>| {
        *res.status_mut() = StatusCode::NOT_FOUND;
        *res.body_mut() = Body::from(format!("no route for {}", req.uri().path()));
    });
    let res = router.serve(get("/nowhere"));
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(res).await, "no route for /nowhere");
}

#[tokio::test]
async fn test_not_found_sees_global_middleware_changes() {
    let mut router = Router::new();
    router.attach(|res: &mut Response<Body>, req: Request<Body>| {
        res.headers_mut().insert("x-global", "1".parse().unwrap());
        Flow::Continue(req)
    });
    let res = router.serve(get("/nowhere"));
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.headers()["x-global"], "1");
}

fn pattern_with(params: usize) -> String {
    let mut pattern = String::from("/p");
    for i in 0..params {
        pattern.push_str(&format!("/{{p{}}}", i));
    }
    pattern
}

#[tokio::test]
async fn test_capacity_enforced_at_registration() {
    for max in 0..=4 {
        for params in 0..=5 {
            let mut router = Router::with_max_params(max);
            let result = router.add_route(Route::get(&pattern_with(params)).unwrap(), dump_params());

            if params > max {
                assert!(
                    matches!(result, Err(RouterError::TooManyParams { count, max: m, .. }) if count == params && m == max),
                    "params={} max={} should be rejected",
                    params,
                    max
                );
                assert_eq!(router.route_count(), 0);
                continue;
            }

            assert!(result.is_ok(), "params={} max={} should be accepted", params, max);
            let path: String = std::iter::once("/p".to_string())
                .chain((0..params).map(|i| format!("/v{}", i)))
                .collect();
            let expected = (0..params)
                .map(|i| format!("p{}=v{}", i, i))
                .collect::<Vec<_>>()
                .join(";");
            assert_eq!(body_string(router.serve(get(&path))).await, expected);
        }
    }
}

#[test]
fn test_anonymous_regex_does_not_count_against_capacity() {
    let mut router = Router::with_max_params(1);
    let route = Route::get("/{:[a-z]+}/{id}").unwrap();
    assert!(router.add_route(route, tagged("ok")).is_ok());
}

#[test]
fn test_invalid_pattern_is_rejected_before_registration() {
    let mut router = Router::new();
    let err: RouterError = Route::get("/files/{rest*}/tail").unwrap_err().into();
    assert!(matches!(err, RouterError::Route(_)));
    assert_eq!(router.route_count(), 0);
    assert!(router.add_route(Route::get("/files/{rest*}").unwrap(), tagged("files")).is_ok());
}
