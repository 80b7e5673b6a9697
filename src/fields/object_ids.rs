//! Decomposition of composite `name=value&name=value` values.

use crate::fields::{Field, Fields};

/// Split a composite value into independent string fields.
///
/// Segments are separated by `&` and split on their first `=`. A segment
/// without `=` is skipped; the rest are still processed. Pairs with an empty
/// name or value are dropped by `Fields::push`.
pub fn decompose(composite: &str, fields: &mut Fields) {
    for segment in composite.split('&') {
        if let Some((name, value)) = segment.split_once('=') {
            fields.push(Field::string(name.to_string(), value));
        }
    }
}
