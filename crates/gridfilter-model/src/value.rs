//! Field values and row access.
//!
//! The evaluator never sees concrete record types. Rows implement [`Row`]
//! and hand out [`FieldValue`]s per column; the engine normalizes those
//! according to the column's declared type before comparing.
//!
//! # Example
//!
//! ```
//! use gridfilter_model_rs::value::{FieldValue, Row};
//! use serde_json::json;
//!
//! let row = json!({ "cost_centre": "CC-1001", "year": 2024, "is_freeze": false });
//!
//! assert_eq!(row.field("cost_centre"), Some(FieldValue::Text("CC-1001".to_string())));
//! assert_eq!(row.field("year"), Some(FieldValue::Number(2024.0)));
//! assert_eq!(row.field("missing"), None);
//! ```

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A raw field value as exposed by a row.
///
/// This is deliberately loose: the dataset is externally supplied and a
/// field may hold text where the schema says number (or be missing
/// entirely). Normalization during evaluation absorbs the mismatch instead
/// of erroring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// An explicit null (or a value with no scalar representation).
    Null,
    /// Text, including date/datetime strings.
    Text(String),
    /// A numeric value.
    Number(f64),
    /// A boolean value.
    Bool(bool),
}

impl FieldValue {
    /// Returns true for [`FieldValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::Number(value as f64)
                }
            }
        )*
    };
}

impl_from_number!(f32, f64, i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl<T> From<Option<T>> for FieldValue
where
    T: Into<FieldValue>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => FieldValue::Null,
        }
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Text(value.format("%Y-%m-%d").to_string())
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        FieldValue::Text(value.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for FieldValue
where
    Tz::Offset: std::fmt::Display,
{
    fn from(value: DateTime<Tz>) -> Self {
        FieldValue::Text(value.to_rfc3339())
    }
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => match n.as_f64() {
                Some(f) => FieldValue::Number(f),
                None => FieldValue::Null,
            },
            Value::String(s) => FieldValue::Text(s.clone()),
            // Arrays and objects are not scalar fields
            Value::Array(_) | Value::Object(_) => FieldValue::Null,
        }
    }
}

/// Read access to one record of the dataset being filtered.
///
/// Returning `None` means the record has no field for that column at all;
/// evaluation treats it like an absent value and the rule degrades per the
/// fail-open rules rather than erroring.
pub trait Row {
    /// Returns the raw value of the field identified by `column_id`.
    fn field(&self, column_id: &str) -> Option<FieldValue>;
}

impl Row for Value {
    fn field(&self, column_id: &str) -> Option<FieldValue> {
        self.as_object()
            .and_then(|map| map.get(column_id))
            .map(FieldValue::from)
    }
}

impl Row for serde_json::Map<String, Value> {
    fn field(&self, column_id: &str) -> Option<FieldValue> {
        self.get(column_id).map(FieldValue::from)
    }
}

impl Row for HashMap<String, FieldValue> {
    fn field(&self, column_id: &str) -> Option<FieldValue> {
        self.get(column_id).cloned()
    }
}
