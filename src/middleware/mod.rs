//! Middleware subsystem.
//!
//! # Data Flow
//! ```text
//! Request
//!     → global chain (router.attach)      sees method, path, headers
//!     → [context prepared, route matched]
//!     → route chain (route.with_middleware) sees path parameters
//!     → handler
//! ```
//!
//! Each middleware returns `Flow::Continue(req)` or `Flow::Halt`. A halting
//! middleware has already written the response.

pub mod cors;
pub mod pipeline;
pub mod request_id;

pub use cors::AccessControlOptions;
pub use pipeline::{run, Flow, Middleware};
