//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Method, Request, Response};
use matcha_router::{Flow, Handler, Middleware, RequestContextExt};

pub fn request(method: Method, path: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

pub fn get(path: &str) -> Request<Body> {
    request(Method::GET, path)
}

/// Collect a response body as text.
pub async fn body_string(res: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Handler answering with a fixed tag, so tests can tell routes apart.
pub fn tagged(tag: &'static str) -> Handler {
    Handler::new(move |res: &mut Response<Body>, _req: Request<Body>| {
        *res.body_mut() = Body::from(tag);
    })
}

/// Handler writing every bound parameter as `name=value` pairs joined by `;`.
pub fn dump_params() -> Handler {
    Handler::new(|res: &mut Response<Body>, req: Request<Body>| {
        let text = req
            .context()
            .map(|ctx| {
                ctx.iter()
                    .map(|(n, v)| format!("{}={}", n, v))
                    .collect::<Vec<_>>()
                    .join(";")
            })
            .unwrap_or_default();
        *res.body_mut() = Body::from(text);
    })
}

/// Ordered log of events shared between middleware and handlers.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// Middleware that records `name` and continues.
    pub fn recorder(&self, name: &'static str) -> Middleware {
        let log = self.clone();
        Middleware::new(move |_res: &mut Response<Body>, req: Request<Body>| {
            log.push(name);
            Flow::Continue(req)
        })
    }

    /// Handler that records `name`.
    pub fn handler(&self, name: &'static str) -> Handler {
        let log = self.clone();
        Handler::new(move |_res: &mut Response<Body>, _req: Request<Body>| {
            log.push(name);
        })
    }
}
