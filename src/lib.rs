//! In-process HTTP request router.
//!
//! # Architecture Overview
//!
//! ```text
//!     Request ──▶ global middleware ──▶ context ──▶ route tree ──▶ route middleware ──▶ handler
//!                      │ halt                          │ no match         │ halt
//!                      ▼                               ▼                  ▼
//!                   (done)                      not-found handler       (done)
//! ```
//!
//! Routes are registered on a mutable [`Router`] during setup. Once it is
//! wrapped in an `Arc` (for example by [`RouterService`]) it is read-only and
//! serves any number of requests in parallel without locks.
//!
//! # Example
//!
//! ```
//! use axum::body::Body;
//! use axum::http::{Request, Response};
//! use matcha_router::{RequestContextExt, Route, Router};
//!
//! let mut router = Router::new();
//! router
//!     .add_route(
//!         Route::get("/users/{id}").unwrap(),
//!         |res: &mut Response<Body>, req: Request<Body>| {
//!             let id = req.param("id").unwrap_or_default().to_string();
//!             *res.body_mut() = Body::from(id);
//!         },
//!     )
//!     .unwrap();
//!
//! let req = Request::builder().uri("/users/123").body(Body::empty()).unwrap();
//! let res = router.serve(req);
//! assert_eq!(res.status(), 200);
//! ```

// Core subsystems
pub mod middleware;
pub mod routing;

// Transport and cross-cutting concerns
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::RouterConfig;
pub use http::{HttpServer, RouterService};
pub use lifecycle::Shutdown;
pub use middleware::{AccessControlOptions, Flow, Middleware};
pub use routing::{
    Handler, LeafId, RequestContext, RequestContextExt, Route, RouteError, RouteHash, Router, RouterError,
    RouteTree, TreeMatch,
};
