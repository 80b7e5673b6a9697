//! Field extraction.
//!
//! # Data Flow
//! ```text
//! Option<&dyn LogContext> + hostname
//!     → extract.rs: server, then ContextKey::ALL in order
//!         → object_ids.rs: composite value → independent fields
//!         → response.rs: contentLength, segmentDuration (request contexts only)
//!     → Fields (ordered, unique names, no empty strings)
//! ```
//!
//! # Design Decisions
//! - Extraction never fails; a missing or mistyped value is simply absent
//! - "now" is captured once per record so derived durations agree
//! - Numeric values are emitted even when zero; empty strings never are

pub mod extract;
pub mod field;
pub mod object_ids;
pub mod response;

use chrono::{DateTime, Utc};
use std::time::Duration;

pub use extract::{context_fields, extract_fields, extract_fields_at, SERVER_FIELD};
pub use field::{Field, FieldValue, Fields};

/// Time elapsed from `start` to `now`, clamped at zero.
pub(crate) fn elapsed(start: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (now - start).to_std().unwrap_or(Duration::ZERO)
}
