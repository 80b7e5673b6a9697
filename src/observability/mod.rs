//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Application code:
//!     → facade.rs (process-wide verbose/info/warn/error/fatal)
//!     → logging.rs (Logger: fields extracted once, primary sink)
//!
//! Third-party components:
//!     → tracing.rs (LogProvider::output, tracing events)
//!     → logging.rs (Logger::output, external sink)
//! ```
//!
//! # Design Decisions
//! - One `Logger` type serves both the global functions and explicit handles
//! - Third-party chatter is always verbose and never fails the caller
//! - Fatal is the only operation that ends the process

pub mod facade;
pub mod logging;
pub mod tracing;

pub use self::logging::{InitError, Logger, FATAL_EXIT_CODE};
pub use self::tracing::{install_tracing_bridge, LogProvider};
