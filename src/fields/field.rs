//! Typed record fields.

use chrono::{DateTime, Utc};
use std::borrow::Cow;
use std::time::Duration;

/// Typed value attached to a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    Uint(u64),
    Duration(Duration),
    Time(DateTime<Utc>),
}

/// One named, typed value attached to a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: Cow<'static, str>,
    pub value: FieldValue,
}

impl Field {
    /// String field.
    pub fn string(name: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FieldValue::Str(value.into()),
        }
    }

    /// Unsigned integer field.
    pub fn uint(name: impl Into<Cow<'static, str>>, value: u64) -> Self {
        Self {
            name: name.into(),
            value: FieldValue::Uint(value),
        }
    }

    /// Duration field.
    pub fn duration(name: impl Into<Cow<'static, str>>, value: Duration) -> Self {
        Self {
            name: name.into(),
            value: FieldValue::Duration(value),
        }
    }

    /// Timestamp field.
    pub fn time(name: impl Into<Cow<'static, str>>, value: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            value: FieldValue::Time(value),
        }
    }

    /// String value, if this is a string field.
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Ordered field list with unique names.
///
/// The first field pushed under a name wins. Empty strings and empty names
/// are never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(Vec<Field>);

impl Fields {
    /// Create an empty list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Create an empty list with room for `capacity` fields.
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Append a field. Returns false if it was dropped.
    pub fn push(&mut self, field: Field) -> bool {
        if field.name.is_empty() || self.contains(&field.name) {
            return false;
        }
        if let FieldValue::Str(s) = &field.value {
            if s.is_empty() {
                return false;
            }
        }
        self.0.push(field);
        true
    }

    /// Append every field of `other`, subject to the same rules as `push`.
    pub fn extend(&mut self, other: Fields) {
        for field in other.0 {
            self.push(field);
        }
    }

    /// Whether a field with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|f| f.name == name)
    }

    /// Value of the field with this name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    /// String value of the field with this name.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(FieldValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Field names in order.
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|f| f.name.as_ref()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Field] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
