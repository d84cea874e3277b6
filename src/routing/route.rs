//! Route definitions.
//!
//! A route pairs an HTTP method with a parsed pattern, carries its
//! route-scoped middleware, and knows how to bind the tree's captured values
//! to its own parameter names.

use std::borrow::Cow;
use std::fmt;

use axum::body::Body;
use axum::http::{Method, Request};

use crate::middleware::cors::AccessControlOptions;
use crate::middleware::{cors, Middleware};
use crate::routing::context::RequestContext;
use crate::routing::error::RouteError;
use crate::routing::pattern::Pattern;

/// Key identifying the handler bound to a route: method plus canonical pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteHash(String);

impl RouteHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One method + pattern pair.
#[derive(Debug, Clone)]
pub struct Route {
    method: Method,
    pattern: Pattern,
    hash: RouteHash,
    slots: Vec<Option<String>>,
    middleware: Vec<Middleware>,
}

impl Route {
    /// Parse `pattern` into a route for `method`.
    pub fn new(method: Method, pattern: &str) -> Result<Self, RouteError> {
        let pattern = Pattern::parse(pattern)?;
        let hash = RouteHash(format!("{} {}", method, pattern));
        let slots = pattern.param_slots();
        Ok(Self {
            method,
            pattern,
            hash,
            slots,
            middleware: Vec::new(),
        })
    }

    pub fn get(pattern: &str) -> Result<Self, RouteError> {
        Self::new(Method::GET, pattern)
    }

    pub fn post(pattern: &str) -> Result<Self, RouteError> {
        Self::new(Method::POST, pattern)
    }

    pub fn put(pattern: &str) -> Result<Self, RouteError> {
        Self::new(Method::PUT, pattern)
    }

    pub fn delete(pattern: &str) -> Result<Self, RouteError> {
        Self::new(Method::DELETE, pattern)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn hash(&self) -> &RouteHash {
        &self.hash
    }

    /// Number of named parameters the route writes into a request context.
    pub fn param_count(&self) -> usize {
        self.pattern.param_count()
    }

    /// Append route-scoped middleware.
    pub fn attach(&mut self, mw: impl Into<Middleware>) {
        self.middleware.push(mw.into());
    }

    pub fn with_middleware(mut self, mw: impl Into<Middleware>) -> Self {
        self.attach(mw);
        self
    }

    /// Set CORS headers on requests matched by this route only.
    pub fn with_cors(self, options: AccessControlOptions) -> Self {
        self.with_middleware(cors::middleware(options))
    }

    /// Apply a fallible configuration function.
    pub fn configure<F>(mut self, f: F) -> Result<Self, RouteError>
    where
        F: FnOnce(&mut Route) -> Result<(), RouteError>,
    {
        f(&mut self)?;
        Ok(self)
    }

    /// Attached middleware in attachment order.
    pub fn middleware(&self) -> &[Middleware] {
        &self.middleware
    }

    /// Bind captured values to this route's parameter names.
    ///
    /// `captures` must come from a tree match on this route's leaf. Anonymous
    /// regex captures are skipped. Requests without a prepared context get
    /// one sized for this route.
    pub fn match_and_update_context(&self, mut req: Request<Body>, captures: &[Cow<'_, str>]) -> Request<Body> {
        if self.param_count() == 0 {
            return req;
        }

        let extensions = req.extensions_mut();
        if extensions.get::<RequestContext>().is_none() {
            extensions.insert(RequestContext::with_capacity(self.param_count()));
        }
        let Some(ctx) = extensions.get_mut::<RequestContext>() else {
            return req;
        };

        for (slot, value) in self.slots.iter().zip(captures) {
            let Some(name) = slot else { continue };
            if let Err(e) = ctx.capture(name.as_str(), &**value) {
                tracing::warn!(route = %self.hash, error = %e, "dropping path parameter");
                break;
            }
        }
        req
    }
}
