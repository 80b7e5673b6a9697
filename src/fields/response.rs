//! Fields derived from an in-flight response.

use chrono::{DateTime, Utc};

use crate::context::{ContextKey, ContextValue, ResponseMetadata};
use crate::fields::{elapsed, Field, Fields};

/// Response header carrying the body length.
const CONTENT_LENGTH: &str = "content-length";

/// Append `contentLength` and `segmentDuration`, then restart the segment.
///
/// Skipped entirely when the request carries `bulk = true`. This is the only
/// place extraction writes: the new `segmentStart` is read back by the next
/// logging call on the same request.
pub fn augment(metadata: &dyn ResponseMetadata, now: DateTime<Utc>, fields: &mut Fields) {
    if metadata.get(ContextKey::Bulk.name()).and_then(|v| v.as_bool()) == Some(true) {
        return;
    }

    if let Some(length) = metadata
        .response_header(CONTENT_LENGTH)
        .and_then(|value| value.trim().parse::<u64>().ok())
    {
        fields.push(Field::uint("contentLength", length));
    }

    if let Some(start) = metadata
        .get(ContextKey::SegmentStart.name())
        .and_then(|v| v.as_time())
    {
        fields.push(Field::duration("segmentDuration", elapsed(start, now)));
    }

    metadata.set(ContextKey::SegmentStart.name(), ContextValue::Time(now));
}
