//! Request and operation context.
//!
//! # Data Flow
//! ```text
//! caller (upstream of logging)
//!     → Context::with_value (immutable chain, scope.rs)
//!     → &dyn LogContext handed to an emitter
//!     → fields::extract reads ContextKey::ALL in order
//!     → response_metadata() capability, if the context offers it
//! ```
//!
//! # Design Decisions
//! - Keys are a closed enumeration; values are typed and read through
//!   accessors that return `None` on a kind mismatch
//! - Extraction only reads; the single write-back goes through
//!   `ResponseMetadata::set` on request-scoped contexts
//! - Transport frameworks plug in through the `ResponseMetadata` capability,
//!   never through downcasting

pub mod keys;
pub mod scope;
pub mod value;

pub use keys::{ContextKey, KeyKind};
pub use scope::Context;
pub use value::ContextValue;

/// Read access to the well-known context keys.
pub trait LogContext: Send + Sync {
    /// Value stored under `key`, if any.
    fn value(&self, key: ContextKey) -> Option<ContextValue>;

    /// Response metadata, for contexts bound to an in-flight request.
    fn response_metadata(&self) -> Option<&dyn ResponseMetadata> {
        None
    }
}

/// Request-scoped state that outlives a single logging call.
///
/// Implementations are shared by reference for the lifetime of one request.
/// Concurrent logging calls against the same request race on `set`; callers
/// log from one task per request.
pub trait ResponseMetadata: Send + Sync {
    /// Value stored under an arbitrary name.
    fn get(&self, name: &str) -> Option<ContextValue>;

    /// Store a value under an arbitrary name.
    fn set(&self, name: &str, value: ContextValue);

    /// A response header, once the response exists.
    fn response_header(&self, name: &str) -> Option<String>;
}
