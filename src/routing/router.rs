//! Route registration and request dispatch.
//!
//! # Responsibilities
//! - Own the route tree, per-method route tables and the handler table
//! - Reject misconfigured routes at registration
//! - Drive each request through global middleware, matching, route
//!   middleware and the handler
//!
//! # Design Decisions
//! - Registration takes `&mut self`, serving takes `&self`: once the router
//!   is shared behind an `Arc` it can no longer change
//! - Handlers are looked up by route hash, not leaf id, so a handler can be
//!   rebound without touching the tree
//! - Every request ends in exactly one of: handler, not-found handler, halt

use std::borrow::Cow;
use std::collections::HashMap;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Method, Request, Response};

use crate::config::schema::RoutingConfig;
use crate::middleware::{pipeline, Flow, Middleware};
use crate::observability::metrics::{self, Outcome};
use crate::routing::context::{self, DEFAULT_MAX_PARAMS};
use crate::routing::error::RouterError;
use crate::routing::handler::Handler;
use crate::routing::route::{Route, RouteHash};
use crate::routing::tree::{LeafId, RouteTree, TreeMatch};

/// In-process HTTP router.
#[derive(Debug)]
pub struct Router {
    middleware: Vec<Middleware>,
    routes: HashMap<Method, HashMap<LeafId, Route>>,
    tree: RouteTree,
    handlers: HashMap<RouteHash, Handler>,
    not_found: Handler,
    max_params: usize,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self::with_max_params(DEFAULT_MAX_PARAMS)
    }

    /// Router whose request contexts hold at most `max_params` parameters.
    pub fn with_max_params(max_params: usize) -> Self {
        Self {
            middleware: Vec::new(),
            routes: HashMap::new(),
            tree: RouteTree::new(),
            handlers: HashMap::new(),
            not_found: Handler::default(),
            max_params,
        }
    }

    pub fn from_config(config: &RoutingConfig) -> Self {
        Self::with_max_params(config.max_params)
    }

    pub fn max_params(&self) -> usize {
        self.max_params
    }

    /// Number of registered routes across all methods.
    pub fn route_count(&self) -> usize {
        self.handlers.len()
    }

    /// Append global middleware. Runs before matching, in attachment order.
    pub fn attach(&mut self, mw: impl Into<Middleware>) {
        self.middleware.push(mw.into());
    }

    /// Replace the handler used when no route matches.
    pub fn set_not_found(&mut self, handler: impl Into<Handler>) {
        self.not_found = handler.into();
    }

    /// Register `route` and bind `handler` to its hash.
    pub fn add_route(&mut self, route: Route, handler: impl Into<Handler>) -> Result<LeafId, RouterError> {
        if route.param_count() > self.max_params {
            return Err(RouterError::TooManyParams {
                route: route.hash().clone(),
                count: route.param_count(),
                max: self.max_params,
            });
        }
        if self.handlers.contains_key(route.hash()) {
            return Err(RouterError::DuplicateRoute(route.hash().clone()));
        }

        let leaf = self.tree.add(route.pattern());
        let table = self.routes.entry(route.method().clone()).or_default();
        if let Some(existing) = table.get(&leaf) {
            // Same method and path shape under different parameter names.
            return Err(RouterError::DuplicateRoute(existing.hash().clone()));
        }

        tracing::info!(
            route = %route.hash(),
            leaf = %leaf,
            middleware = route.middleware().len(),
            "Route registered"
        );
        self.handlers.insert(route.hash().clone(), handler.into());
        table.insert(leaf, route);
        Ok(leaf)
    }

    /// Bind a different handler to an already registered route.
    pub fn rebind(&mut self, hash: &RouteHash, handler: impl Into<Handler>) -> Result<(), RouterError> {
        match self.handlers.get_mut(hash) {
            Some(slot) => {
                *slot = handler.into();
                tracing::info!(route = %hash, "Handler rebound");
                Ok(())
            }
            None => Err(RouterError::UnknownRoute(hash.clone())),
        }
    }

    /// Find the route for `method` and `path` along with its captured values.
    ///
    /// Only leaves holding a route for `method` can end the walk, so a
    /// higher-precedence route on another method never hides this one.
    pub fn lookup<'p>(&self, method: &Method, path: &'p str) -> Option<(&Route, Vec<Cow<'p, str>>)> {
        let table = self.routes.get(method)?;
        match self.tree.match_path_with(path, |leaf| table.contains_key(&leaf)) {
            TreeMatch::Matched { leaf, captures } => Some((table.get(&leaf)?, captures)),
            TreeMatch::NotMatched => None,
        }
    }

    /// Dispatch one request, writing into `res`.
    pub fn handle(&self, res: &mut Response<Body>, req: Request<Body>) {
        let start = Instant::now();
        let outcome = self.dispatch(res, req);
        metrics::record_dispatch(outcome, start);
    }

    /// Dispatch one request into a fresh `200 OK` response with an empty body.
    pub fn serve(&self, req: Request<Body>) -> Response<Body> {
        let mut res = Response::new(Body::empty());
        self.handle(&mut res, req);
        res
    }

    fn dispatch(&self, res: &mut Response<Body>, req: Request<Body>) -> Outcome {
        let req = match pipeline::run(&self.middleware, res, req) {
            Flow::Continue(req) => req,
            Flow::Halt => {
                tracing::debug!("Request halted by global middleware");
                return Outcome::Halted;
            }
        };

        let req = context::prepare(req, self.max_params);
        let method = req.method().clone();
        let uri = req.uri().clone();

        let Some((route, captures)) = self.lookup(&method, uri.path()) else {
            tracing::debug!(method = %method, path = %uri.path(), "No route matched");
            self.not_found.serve(res, req);
            return Outcome::NotFound;
        };

        tracing::debug!(method = %method, path = %uri.path(), route = %route.hash(), "Route matched");
        let req = route.match_and_update_context(req, &captures);
        let req = match pipeline::run(route.middleware(), res, req) {
            Flow::Continue(req) => req,
            Flow::Halt => {
                tracing::debug!(route = %route.hash(), "Request halted by route middleware");
                return Outcome::Halted;
            }
        };

        match self.handlers.get(route.hash()) {
            Some(handler) => {
                handler.serve(res, req);
                Outcome::Matched
            }
            None => {
                tracing::error!(route = %route.hash(), "Route has no bound handler");
                self.not_found.serve(res, req);
                Outcome::NotFound
            }
        }
    }
}
