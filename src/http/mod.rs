//! HTTP transport adapter.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum, TraceLayer, TimeoutLayer)
//!     → service.rs (tower::Service over Arc<Router>)
//!     → Router::serve
//!     → Response to client
//! ```
//!
//! The router core never touches sockets; this module is the only place that does.

pub mod server;
pub mod service;

pub use server::HttpServer;
pub use service::RouterService;
