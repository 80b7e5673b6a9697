//! Startup orchestration.
//!
//! # Responsibilities
//! - Keep one readiness gate per named subsystem
//! - Let subsystems wait on their dependencies and announce themselves
//!
//! # Design Decisions
//! - Gates are created on first mention, by waiter or publisher alike
//! - Publishing twice is a no-op; readiness never reverts
//! - The configuration subsystem is announced with `ready()`

use dashmap::DashMap;
use std::sync::{Arc, OnceLock};

use crate::lifecycle::gate::ReadinessGate;

/// Signal published once process configuration is loaded.
pub const CONFIGURATION: &str = "configuration";

/// Registry of named readiness signals.
#[derive(Debug, Default)]
pub struct Startup {
    signals: DashMap<String, Arc<ReadinessGate<()>>>,
}

impl Startup {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static Startup {
        static GLOBAL: OnceLock<Startup> = OnceLock::new();
        GLOBAL.get_or_init(Startup::new)
    }

    fn signal(&self, name: &str) -> Arc<ReadinessGate<()>> {
        if let Some(gate) = self.signals.get(name) {
            return Arc::clone(gate.value());
        }
        Arc::clone(self.signals.entry(name.to_string()).or_default().value())
    }

    /// Suspend until `name` has been published.
    pub async fn wait(&self, name: &str) {
        let gate = self.signal(name);
        gate.wait().await;
    }

    /// Announce that `name` is ready. Returns false if it already was.
    pub fn publish(&self, name: &str) -> bool {
        self.signal(name).publish(())
    }

    pub fn is_published(&self, name: &str) -> bool {
        self.signals.get(name).is_some_and(|gate| gate.is_ready())
    }

    /// Announce that configuration is available.
    pub fn ready(&self) -> bool {
        self.publish(CONFIGURATION)
    }
}
