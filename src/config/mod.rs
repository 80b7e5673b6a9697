//! Logger configuration.
//!
//! # Data Flow
//! ```text
//! process environment (DEBUG, LOGGING_LEVEL, LOGGING_OUTPUT, LOGGING_BUFFER)
//!     → loader.rs (read once, by the readiness task)
//!     → LoggerConfig (immutable)
//!     → LogOutput (tracing-appender writer) and the two DispatchSinks
//! ```
//!
//! # Design Decisions
//! - Read exactly once; the running logger never re-reads the environment
//! - Unrecognized values keep the mode default instead of failing
//! - Loading goes through a lookup function so tests never touch the real environment

pub mod loader;
pub mod schema;

pub use loader::{env, load_from_env, load_from_lookup};
pub use schema::{LoggerConfig, OutputTarget};
