//! Handler values bound to routes.

use std::fmt;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};

type HandlerFn = dyn Fn(&mut Response<Body>, Request<Body>) + Send + Sync;

/// Writes the response for a request that passed every middleware.
#[derive(Clone)]
pub struct Handler(Arc<HandlerFn>);

impl Handler {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Response<Body>, Request<Body>) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn serve(&self, res: &mut Response<Body>, req: Request<Body>) {
        (self.0)(res, req)
    }

    /// Handler that answers with `status` and an empty body.
    pub fn status(status: StatusCode) -> Self {
        Self::new(move |res: &mut Response<Body>, _req: Request<Body>| {
            *res.status_mut() = status;
            *res.body_mut() = Body::empty();
        })
    }
}

impl<F> From<F> for Handler
where
    F: Fn(&mut Response<Body>, Request<Body>) + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}

impl Default for Handler {
    /// Answers 404 with an empty body.
    fn default() -> Self {
        Self::status(StatusCode::NOT_FOUND)
    }
}
