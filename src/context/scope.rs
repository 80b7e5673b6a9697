//! Immutable, chainable request context.

use std::fmt;
use std::sync::Arc;

use crate::context::{ContextKey, ContextValue, LogContext};

struct Node {
    key: ContextKey,
    value: ContextValue,
    parent: Option<Arc<Node>>,
}

/// Immutable key/value chain passed along a call path.
///
/// `with_value` never mutates; it returns a new context that shares its
/// ancestors. The value nearest the head wins.
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Node>>,
}

impl Context {
    /// An empty context.
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a context carrying `value` under `key`.
    #[must_use]
    pub fn with_value(&self, key: ContextKey, value: impl Into<ContextValue>) -> Self {
        Self {
            head: Some(Arc::new(Node {
                key,
                value: value.into(),
                parent: self.head.clone(),
            })),
        }
    }

    /// Look up the nearest value for `key`.
    pub fn get(&self, key: ContextKey) -> Option<&ContextValue> {
        let mut node = self.head.as_deref();
        while let Some(n) = node {
            if n.key == key {
                return Some(&n.value);
            }
            node = n.parent.as_deref();
        }
        None
    }
}

impl LogContext for Context {
    fn value(&self, key: ContextKey) -> Option<ContextValue> {
        self.get(key).cloned()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_map();
        let mut node = self.head.as_deref();
        while let Some(n) = node {
            list.entry(&n.key.name(), &n.value);
            node = n.parent.as_deref();
        }
        list.finish()
    }
}

impl Drop for Context {
    // Unlink long chains iteratively instead of recursing through Arc drops.
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(mut node) => next = node.parent.take(),
                Err(_) => break,
            }
        }
    }
}
