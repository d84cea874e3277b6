//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (setup, single writer):
//!     pattern string
//!     → pattern.rs (parse & classify segments)
//!     → route.rs (Route: method, pattern, hash, middleware)
//!     → router.rs (capacity + duplicate checks)
//!     → tree.rs (insert, get leaf id)
//!     → tables: (method, leaf) → Route, hash → Handler
//!
//! Incoming request (many readers):
//!     router.rs (global middleware)
//!     → context.rs (attach bounded parameter area)
//!     → tree.rs (walk segments → leaf + captures | no match)
//!     → route.rs (bind captures to names)
//!     → route middleware → handler.rs
//! ```
//!
//! # Design Decisions
//! - Literal beats regex beats wildcard beats catch-all at every segment
//! - Trailing and repeated slashes are ignored at registration and at match time
//! - Parameter overflow is impossible at runtime: oversized routes are rejected
//! - No match is a value, never an error

pub mod context;
pub mod error;
pub mod handler;
pub mod pattern;
pub mod route;
pub mod router;
pub mod tree;

pub use context::{RequestContext, RequestContextExt, DEFAULT_MAX_PARAMS};
pub use error::{CaptureError, RouteError, RouterError};
pub use handler::Handler;
pub use route::{Route, RouteHash};
pub use router::Router;
pub use tree::{LeafId, RouteTree, TreeMatch};
