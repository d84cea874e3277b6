//! Per-request parameter capture.
//!
//! A `RequestContext` is attached to the request's extensions right after
//! global middleware runs and before the tree walk. Its capacity is fixed
//! when it is created.

use axum::http::Request;

use crate::routing::error::CaptureError;

/// Default maximum number of path parameters per request.
pub const DEFAULT_MAX_PARAMS: usize = 16;

/// Fixed-capacity mapping from parameter name to captured value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    params: Vec<(String, String)>,
    capacity: usize,
}

impl RequestContext {
    /// Create an empty context holding at most `capacity` parameters.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            params: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a captured parameter.
    ///
    /// Fails once the context holds `capacity` entries; the value is not stored.
    pub fn capture(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<(), CaptureError> {
        if self.params.len() >= self.capacity {
            return Err(CaptureError {
                capacity: self.capacity,
            });
        }
        self.params.push((name.into(), value.into()));
        Ok(())
    }

    /// Look up a parameter by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Captured parameters in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

/// Attach a fresh context to `req`, replacing any context already present.
pub fn prepare<B>(mut req: Request<B>, max_params: usize) -> Request<B> {
    req.extensions_mut()
        .insert(RequestContext::with_capacity(max_params));
    req
}

/// Access to the path parameters bound to a request.
pub trait RequestContextExt {
    /// The request's context, if the router prepared one.
    fn context(&self) -> Option<&RequestContext>;

    /// Shorthand for `context().and_then(|c| c.get(name))`.
    fn param(&self, name: &str) -> Option<&str> {
        self.context().and_then(|c| c.get(name))
    }
}

impl<B> RequestContextExt for Request<B> {
    fn context(&self) -> Option<&RequestContext> {
        self.extensions().get::<RequestContext>()
    }
}
