//! Publish-once readiness gate.

use tokio::sync::watch;

/// A value that becomes available exactly once and is then observed by
/// every current and future waiter.
pub struct ReadinessGate<T> {
    tx: watch::Sender<Option<T>>,
}

impl<T: Clone> ReadinessGate<T> {
    /// Create an unready gate.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    /// Release the gate with `value`.
    ///
    /// Returns false, leaving the first value in place, if already released.
    pub fn publish(&self, value: T) -> bool {
        self.tx.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(value);
            true
        })
    }

    /// The published value, without waiting.
    pub fn get(&self) -> Option<T> {
        self.tx.borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Suspend until the gate is released.
    pub async fn wait(&self) -> T {
        let mut rx = self.tx.subscribe();
        loop {
            if let Some(value) = rx.borrow_and_update().clone() {
                return value;
            }
            if rx.changed().await.is_err() {
                // The sender lives in `self`, so this cannot happen while borrowed.
                return std::future::pending().await;
            }
        }
    }
}

impl<T: Clone> Default for ReadinessGate<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for ReadinessGate<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadinessGate")
            .field("ready", &self.tx.borrow().is_some())
            .finish()
    }
}
