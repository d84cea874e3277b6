//! Request ID assignment.
//!
//! Global middleware that gives every request an `x-request-id` (UUID v4)
//! unless the client already sent one, and echoes it on the response.

use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, Request, Response};
use uuid::Uuid;

use crate::middleware::{Flow, Middleware};

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Request ID carried in the request's extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

pub fn middleware() -> Middleware {
    Middleware::new(|res: &mut Response<Body>, mut req: Request<Body>| {
        let value = match req.headers().get(&X_REQUEST_ID) {
            Some(existing) => existing.clone(),
            None => {
                // A hyphenated UUID is always a valid header value.
                let generated = HeaderValue::from_str(&Uuid::new_v4().to_string())
                    .unwrap_or_else(|_| HeaderValue::from_static("unknown"));
                req.headers_mut().insert(X_REQUEST_ID, generated.clone());
                generated
            }
        };
        if let Ok(id) = value.to_str() {
            req.extensions_mut().insert(RequestId(id.to_string()));
        }
        res.headers_mut().insert(X_REQUEST_ID, value);
        Flow::Continue(req)
    })
}
