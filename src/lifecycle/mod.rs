//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     named readiness signals; "configuration" is published by the host
//!
//! Readiness (readiness.rs):
//!     wait "configuration" → resolve hostname → build sinks
//!         → replay queued records → open gate → publish "logprovider"
//!
//! Gate (gate.rs):
//!     publish-once value observed by every waiter
//! ```
//!
//! # Design Decisions
//! - Ordered startup: configuration first, logger second, dependents last
//! - Fail fast: any boot error is fatal
//! - No timeout on waiting; logging is a hard prerequisite

pub mod gate;
pub mod readiness;
pub mod startup;

pub use gate::ReadinessGate;
pub use readiness::{init, init_with, is_ready, wait, PACKAGE_TYPE};
pub use startup::{Startup, CONFIGURATION};
