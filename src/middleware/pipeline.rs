//! Ordered, short-circuiting middleware execution.

use std::fmt;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};

/// Result of running one middleware.
#[derive(Debug)]
pub enum Flow {
    /// Keep going with this (possibly modified) request.
    Continue(Request<Body>),
    /// Stop processing. The middleware has already written the response.
    Halt,
}

impl Flow {
    pub fn is_halt(&self) -> bool {
        matches!(self, Flow::Halt)
    }
}

type MiddlewareFn = dyn Fn(&mut Response<Body>, Request<Body>) -> Flow + Send + Sync;

/// A filter run before a handler.
///
/// Cloning is cheap, so one middleware value can be attached to many routes.
#[derive(Clone)]
pub struct Middleware(Arc<MiddlewareFn>);

impl Middleware {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Response<Body>, Request<Body>) -> Flow + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, res: &mut Response<Body>, req: Request<Body>) -> Flow {
        (self.0)(res, req)
    }
}

impl<F> From<F> for Middleware
where
    F: Fn(&mut Response<Body>, Request<Body>) -> Flow + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Middleware(..)")
    }
}

/// Run `chain` in order, stopping at the first halt.
///
/// The pipeline itself never writes to `res`.
pub fn run(chain: &[Middleware], res: &mut Response<Body>, mut req: Request<Body>) -> Flow {
    for (index, mw) in chain.iter().enumerate() {
        req = match mw.call(res, req) {
            Flow::Continue(req) => req,
            Flow::Halt => {
                tracing::trace!(index, "middleware halted request");
                return Flow::Halt;
            }
        };
    }
    Flow::Continue(req)
}
