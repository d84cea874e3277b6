//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → broadcast → HttpServer stops accepting → in-flight requests finish
//! ```
//!
//! Routes are registered before the server starts and never change while it
//! runs, so there is no reload path.

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
