//! Bridge for third-party components.
//!
//! # Responsibilities
//! - Accept "one debug line" output from embedded components (`LogProvider::output`)
//! - Route `tracing` events emitted by dependencies into the external sink
//!
//! # Design Decisions
//! - `output` lines are logged at verbose severity; `tracing` events keep
//!   their own level
//! - Nothing here returns an error to the component; its chatter must not
//!   change the caller's control flow
//! - `RUST_LOG` overrides the external filter, like any tracing-subscriber setup

use std::sync::Arc;
use tracing::dispatcher::SetGlobalDefaultError;
use tracing::Dispatch;

use crate::observability::{facade, Logger};

/// Handle passed to third-party components that expect a minimal logger.
///
/// Bound to a specific `Logger`, or to the process-wide one.
#[derive(Debug, Clone, Default)]
pub struct LogProvider {
    logger: Option<Arc<Logger>>,
}

impl LogProvider {
    /// Provider writing through `logger`.
    pub fn new(logger: Arc<Logger>) -> Self {
        Self {
            logger: Some(logger),
        }
    }

    /// Provider writing through the process-wide logger.
    pub fn global() -> Self {
        Self::default()
    }

    /// Log one line at verbose severity through the external sink.
    pub fn output(&self, depth: usize, data: &str) {
        match &self.logger {
            Some(logger) => logger.output(depth, data),
            None => facade::output(depth, data),
        }
    }
}

/// Make `dispatch` the process-wide `tracing` subscriber.
///
/// Fails if another global subscriber is already set.
pub fn install_tracing_bridge(dispatch: &Dispatch) -> Result<(), SetGlobalDefaultError> {
    tracing::dispatcher::set_global_default(dispatch.clone())
}
