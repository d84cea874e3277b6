//! Registration-time error definitions.
//!
//! Every configuration problem is reported when a route is registered.
//! Request handling itself has no error path.

use thiserror::Error;

use crate::routing::route::RouteHash;

/// Errors raised while parsing a route pattern.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("pattern must start with '/': {0}")]
    MissingLeadingSlash(String),

    #[error("unbalanced braces in segment {0}")]
    UnbalancedBrace(String),

    #[error("invalid parameter name in segment {0}")]
    InvalidParamName(String),

    #[error("empty regex in segment {0}")]
    EmptyRegex(String),

    #[error("invalid regex in segment {segment}: {source}")]
    InvalidRegex {
        segment: String,
        #[source]
        source: regex::Error,
    },

    #[error("catch-all segment must be last in {0}")]
    CatchAllNotLast(String),

    #[error("parameter {0} declared more than once")]
    DuplicateParam(String),
}

/// Errors raised while registering routes on a router.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("route {route} declares {count} parameters, maximum is {max}")]
    TooManyParams {
        route: RouteHash,
        count: usize,
        max: usize,
    },

    #[error("route {0} is already registered")]
    DuplicateRoute(RouteHash),

    #[error("no route registered for {0}")]
    UnknownRoute(RouteHash),
}

/// Raised when a request context is already full.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("request context full: capacity {capacity}")]
pub struct CaptureError {
    pub capacity: usize,
}
