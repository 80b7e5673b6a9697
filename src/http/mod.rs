//! HTTP integration.
//!
//! # Data Flow
//! ```text
//! incoming request
//!     → middleware/request_context.rs (build RequestContext, log start)
//!     → handler (Extension<Arc<RequestContext>>, logs with it)
//!     → middleware records status/length/headers, logs completion
//! ```
//!
//! # Design Decisions
//! - `RequestContext` implements `ResponseMetadata`, which is how the
//!   extractor finds `contentLength` and `segmentDuration`
//! - The `bulk` flag on a request turns that augmentation off

pub mod middleware;
pub mod request;

pub use middleware::request_context_middleware;
pub use request::{RequestContext, X_REQUEST_ID};
