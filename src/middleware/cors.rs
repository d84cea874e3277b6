//! CORS header middleware.
//!
//! # Behavior
//! - No `Origin` header, or an origin outside the allow list: request passes untouched
//! - Preflight (`OPTIONS` + `Access-Control-Request-Method`): write 204 with the
//!   allow headers and halt
//! - Anything else: set `Access-Control-Allow-Origin` (plus credentials and
//!   expose headers when configured) and continue
//!
//! Attached globally it answers every preflight. Attached to a route it only
//! sees requests that route matched, so preflights need an `OPTIONS` route.

use axum::body::Body;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_EXPOSE_HEADERS, ACCESS_CONTROL_MAX_AGE,
    ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN, VARY,
};
use axum::http::{HeaderValue, Method, Request, Response, StatusCode};

use crate::config::schema::CorsConfig;
use crate::middleware::{Flow, Middleware};

/// Access control policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessControlOptions {
    /// Allowed origins. `*` allows any origin.
    pub allow_origins: Vec<String>,
    pub allow_methods: Vec<String>,
    /// Allowed request headers. Empty echoes the preflight's requested headers.
    pub allow_headers: Vec<String>,
    pub expose_headers: Vec<String>,
    pub allow_credentials: bool,
    pub max_age_secs: Option<u64>,
}

impl Default for AccessControlOptions {
    fn default() -> Self {
        Self {
            allow_origins: vec!["*".to_string()],
            allow_methods: ["GET", "HEAD", "POST", "PUT", "PATCH", "DELETE"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            allow_headers: Vec::new(),
            expose_headers: Vec::new(),
            allow_credentials: false,
            max_age_secs: None,
        }
    }
}

impl From<&CorsConfig> for AccessControlOptions {
    fn from(config: &CorsConfig) -> Self {
        Self {
            allow_origins: config.allow_origins.clone(),
            allow_methods: config.allow_methods.clone(),
            allow_headers: config.allow_headers.clone(),
            expose_headers: config.expose_headers.clone(),
            allow_credentials: config.allow_credentials,
            max_age_secs: config.max_age_secs,
        }
    }
}

/// Header values checked once when the middleware is built.
#[derive(Debug)]
struct Policy {
    any_origin: bool,
    origins: Vec<String>,
    credentials: bool,
    methods: Option<HeaderValue>,
    headers: Option<HeaderValue>,
    expose: Option<HeaderValue>,
    max_age: Option<HeaderValue>,
}

impl Policy {
    fn new(options: AccessControlOptions) -> Self {
        Self {
            any_origin: options.allow_origins.iter().any(|o| o == "*"),
            origins: options.allow_origins,
            credentials: options.allow_credentials,
            methods: joined("allow_methods", &options.allow_methods),
            headers: joined("allow_headers", &options.allow_headers),
            expose: joined("expose_headers", &options.expose_headers),
            max_age: options.max_age_secs.map(HeaderValue::from),
        }
    }

    fn allows(&self, origin: &str) -> bool {
        self.any_origin || self.origins.iter().any(|o| o.eq_ignore_ascii_case(origin))
    }

    fn set_origin(&self, res: &mut Response<Body>, origin: &HeaderValue) {
        let headers = res.headers_mut();
        if self.any_origin && !self.credentials {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        } else {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
            headers.append(VARY, HeaderValue::from_static("Origin"));
        }
        if self.credentials {
            headers.insert(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
        }
    }

    fn apply(&self, res: &mut Response<Body>, req: Request<Body>) -> Flow {
        let Some(origin) = req.headers().get(ORIGIN).cloned() else {
            return Flow::Continue(req);
        };
        let allowed = origin.to_str().map(|o| self.allows(o)).unwrap_or(false);
        if !allowed {
            tracing::debug!(origin = ?origin, "origin not allowed by CORS policy");
            return Flow::Continue(req);
        }

        self.set_origin(res, &origin);

        let preflight = req.method() == Method::OPTIONS
            && req.headers().contains_key(ACCESS_CONTROL_REQUEST_METHOD);
        if !preflight {
            if let Some(expose) = &self.expose {
                res.headers_mut().insert(ACCESS_CONTROL_EXPOSE_HEADERS, expose.clone());
            }
            return Flow::Continue(req);
        }

        let headers = res.headers_mut();
        if let Some(methods) = &self.methods {
            headers.insert(ACCESS_CONTROL_ALLOW_METHODS, methods.clone());
        }
        let requested = req.headers().get(ACCESS_CONTROL_REQUEST_HEADERS);
        if let Some(allow) = self.headers.as_ref().or(requested) {
            headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, allow.clone());
        }
        if let Some(max_age) = &self.max_age {
            headers.insert(ACCESS_CONTROL_MAX_AGE, max_age.clone());
        }
        *res.status_mut() = StatusCode::NO_CONTENT;
        *res.body_mut() = Body::empty();
        Flow::Halt
    }
}

fn joined(field: &str, values: &[String]) -> Option<HeaderValue> {
    if values.is_empty() {
        return None;
    }
    match HeaderValue::from_str(&values.join(", ")) {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(field, "ignoring CORS option with invalid header characters");
            None
        }
    }
}

/// Build the CORS middleware for `options`.
pub fn middleware(options: AccessControlOptions) -> Middleware {
    let policy = Policy::new(options);
    Middleware::new(move |res: &mut Response<Body>, req: Request<Body>| policy.apply(res, req))
}
