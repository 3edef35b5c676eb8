//! Filter evaluation against rows of the dataset.
//!
//! This module provides the [`FilterEvaluator`] for evaluating a filter tree
//! against rows, using the column schema to normalize both sides of every
//! comparison.
//!
//! Evaluation is deliberately fail-open: a rule that cannot be meaningfully
//! evaluated (unknown column, empty comparison value, unparsable numeric
//! filter value) passes every row instead of erroring, and type mismatches
//! degrade to a constant result. Filtering never panics and never returns an
//! error.
//!
//! # Example
//!
//! ```
//! use gridfilter_model_rs::schema::{ColumnDefinition, ColumnType};
//! use gridfilter_model_rs::tree::{FilterGroup, FilterOperator, FilterRule, ROOT_GROUP_ID};
//! use gridfilter_rs::eval::FilterEvaluator;
//! use serde_json::json;
//!
//! let columns = vec![
//!     ColumnDefinition::new("cost_centre_desc", "Description", ColumnType::String),
//!     ColumnDefinition::new("year", "Year", ColumnType::Number),
//! ];
//!
//! let tree = FilterGroup::root()
//!     .add_rule(ROOT_GROUP_ID, FilterRule::new("cost_centre_desc", FilterOperator::Contains, "finance"))
//!     .add_rule(ROOT_GROUP_ID, FilterRule::new("year", FilterOperator::Gte, "2024"));
//!
//! let rows = vec![
//!     json!({ "cost_centre_desc": "Finance Dept", "year": 2024 }),
//!     json!({ "cost_centre_desc": "Operations", "year": 2024 }),
//! ];
//!
//! let evaluator = FilterEvaluator::new(&columns);
//! let kept = evaluator.filter_rows(&rows, &tree);
//! assert_eq!(kept.len(), 1);
//! ```

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use gridfilter_model_rs::schema::{ColumnDefinition, ColumnType};
use gridfilter_model_rs::tree::{
    FilterGroup, FilterItem, FilterOperator, FilterRule, LogicalOperator,
};
use gridfilter_model_rs::value::{FieldValue, Row};

/// A row or filter value after per-column-type normalization.
///
/// Comparisons only succeed between matching variants; a mismatch means the
/// rule's operator cannot apply and degrades to a constant result.
#[derive(Debug, Clone, PartialEq)]
enum Normalized {
    /// Lowercased, trimmed text (string/select columns). Also carries the
    /// raw filter text for date/boolean columns, whose operators parse what
    /// they need themselves.
    Text(String),
    /// Parsed number; NaN when the raw value does not parse.
    Number(f64),
    /// Epoch milliseconds; 0 for absent values, NaN when unparsable.
    Instant(f64),
    /// Truthiness-coerced boolean.
    Truth(bool),
}

/// Evaluates filter trees against rows.
///
/// The evaluator borrows the column schema and holds no other state.
#[derive(Debug, Clone)]
pub struct FilterEvaluator<'a> {
    columns: &'a [ColumnDefinition],
}

impl<'a> FilterEvaluator<'a> {
    /// Creates an evaluator over the given column schema.
    pub fn new(columns: &'a [ColumnDefinition]) -> Self {
        Self { columns }
    }

    fn column(&self, column_id: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|column| column.id == column_id)
    }

    /// Returns true if the row satisfies the rule.
    ///
    /// Follows the fail-open contract: unknown columns, empty comparison
    /// values (boolean literals excepted) and unparsable numeric filter
    /// values all satisfy every row.
    pub fn rule_matches(&self, row: &impl Row, rule: &FilterRule) -> bool {
        let Some(column) = self.column(&rule.column_id) else {
            tracing::trace!(column_id = %rule.column_id, "rule references unknown column, passing row");
            return true;
        };

        let row_value = normalize_row_value(row.field(&column.id), column.column_type);

        // A rule whose value was never filled in filters nothing. Boolean
        // literals carry their value in the operator and are exempt.
        if rule.value.is_empty() && !rule.operator.is_boolean_literal() {
            return true;
        }

        let Some(filter_value) = normalize_filter_value(&rule.value, column.column_type) else {
            return true;
        };

        match rule.operator {
            FilterOperator::Equals => normalized_eq(&row_value, &filter_value),
            FilterOperator::NotEquals => !normalized_eq(&row_value, &filter_value),
            FilterOperator::Contains => contains(&row_value, &filter_value),
            FilterOperator::NotContains => !contains(&row_value, &filter_value),
            FilterOperator::Gt => {
                matches!(ordering(&row_value, &filter_value), Some(Ordering::Greater))
            }
            FilterOperator::Lt => {
                matches!(ordering(&row_value, &filter_value), Some(Ordering::Less))
            }
            FilterOperator::Gte => matches!(
                ordering(&row_value, &filter_value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            FilterOperator::Lte => matches!(
                ordering(&row_value, &filter_value),
                Some(Ordering::Less | Ordering::Equal)
            ),
            FilterOperator::Is => {
                if column.column_type == ColumnType::Date {
                    same_calendar_day(row.field(&column.id), &rule.value)
                } else {
                    normalized_eq(&row_value, &filter_value)
                }
            }
            FilterOperator::Before => on_timeline(&row_value, &rule.value, Ordering::Less),
            FilterOperator::After => on_timeline(&row_value, &rule.value, Ordering::Greater),
            FilterOperator::True => matches!(row_value, Normalized::Truth(true)),
            FilterOperator::False => matches!(row_value, Normalized::Truth(false)),
        }
    }

    /// Returns true if the row satisfies the item (rule or group).
    pub fn item_matches(&self, row: &impl Row, item: &FilterItem) -> bool {
        match item {
            FilterItem::Rule(rule) => self.rule_matches(row, rule),
            FilterItem::Group(group) => self.group_matches(row, group),
        }
    }

    /// Returns true if the row satisfies the group.
    ///
    /// An empty group is always satisfied; `AND` requires every child,
    /// `OR` at least one. Short-circuits.
    pub fn group_matches(&self, row: &impl Row, group: &FilterGroup) -> bool {
        if group.items.is_empty() {
            return true;
        }
        match group.logic {
            LogicalOperator::And => group.items.iter().all(|item| self.item_matches(row, item)),
            LogicalOperator::Or => group.items.iter().any(|item| self.item_matches(row, item)),
        }
    }

    /// Applies the tree to a dataset, returning the rows that satisfy it.
    ///
    /// A root with no children is the identity: every row is returned, in
    /// order. Otherwise the result is the ordered subsequence of matching
    /// rows.
    pub fn filter_rows<R>(&self, rows: &[R], root: &FilterGroup) -> Vec<R>
    where
        R: Row + Clone,
    {
        if root.items.is_empty() {
            return rows.to_vec();
        }
        rows.iter()
            .filter(|row| self.group_matches(*row, root))
            .cloned()
            .collect()
    }
}

// ==================== Normalization ====================

fn normalize_row_value(raw: Option<FieldValue>, column_type: ColumnType) -> Normalized {
    let value = raw.unwrap_or(FieldValue::Null);
    match column_type {
        ColumnType::String | ColumnType::Select => {
            Normalized::Text(text_or_empty(&value).to_lowercase().trim().to_string())
        }
        ColumnType::Number => Normalized::Number(parse_number(&value)),
        ColumnType::Date => Normalized::Instant(date_millis(&value)),
        ColumnType::Boolean => Normalized::Truth(truthy(&value)),
    }
}

/// Normalizes the rule's comparison value. `None` means the value cannot
/// participate in a comparison at all and the rule is vacuously satisfied.
fn normalize_filter_value(value: &str, column_type: ColumnType) -> Option<Normalized> {
    match column_type {
        ColumnType::String | ColumnType::Select => {
            Some(Normalized::Text(value.to_lowercase().trim().to_string()))
        }
        ColumnType::Number => {
            let number = parse_number_prefix(value);
            if number.is_nan() {
                None
            } else {
                Some(Normalized::Number(number))
            }
        }
        // Date and boolean operators parse the raw text themselves
        ColumnType::Date | ColumnType::Boolean => Some(Normalized::Text(value.to_string())),
    }
}

/// Stringification with empty-ish values collapsed to the empty string:
/// null, false, zero and NaN all normalize to "".
fn text_or_empty(value: &FieldValue) -> String {
    match value {
        FieldValue::Null => String::new(),
        FieldValue::Text(text) => text.clone(),
        FieldValue::Number(number) if *number == 0.0 || number.is_nan() => String::new(),
        FieldValue::Number(number) => number.to_string(),
        FieldValue::Bool(true) => "true".to_string(),
        FieldValue::Bool(false) => String::new(),
    }
}

fn parse_number(value: &FieldValue) -> f64 {
    match value {
        FieldValue::Number(number) => *number,
        FieldValue::Text(text) => parse_number_prefix(text),
        FieldValue::Null | FieldValue::Bool(_) => f64::NAN,
    }
}

/// Parses the longest numeric prefix of the text, ignoring whatever trails
/// it: "15abc" is 15, "3.5e2kg" is 350. Accepts an optional sign, one
/// decimal point, an optional exponent and the literal `Infinity`. Text
/// with no numeric prefix at all is NaN.
fn parse_number_prefix(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            end += 1;
            true
        }
        Some(b'+') => {
            end += 1;
            false
        }
        _ => false,
    };

    if text[end..].starts_with("Infinity") {
        return if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let integer_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let integer_digits = end - integer_start;

    let mut fraction_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        let mut fraction_end = end + 1;
        while bytes.get(fraction_end).is_some_and(u8::is_ascii_digit) {
            fraction_end += 1;
        }
        fraction_digits = fraction_end - (end + 1);
        // A bare sign-and-dot prefix is not a number
        if integer_digits > 0 || fraction_digits > 0 {
            end = fraction_end;
        }
    }

    if integer_digits == 0 && fraction_digits == 0 {
        return f64::NAN;
    }

    // The exponent only joins the prefix when at least one digit follows it
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent_end = end + 1;
        if matches!(bytes.get(exponent_end), Some(b'+' | b'-')) {
            exponent_end += 1;
        }
        let exponent_digit_start = exponent_end;
        while bytes.get(exponent_end).is_some_and(u8::is_ascii_digit) {
            exponent_end += 1;
        }
        if exponent_end > exponent_digit_start {
            end = exponent_end;
        }
    }

    text[..end].parse().unwrap_or(f64::NAN)
}

/// Position of a date-typed row value on the epoch-millisecond timeline.
/// Absent values sit at 0; unparsable values are NaN and fail every
/// comparison.
fn date_millis(value: &FieldValue) -> f64 {
    match value {
        FieldValue::Null => 0.0,
        FieldValue::Text(text) if text.is_empty() => 0.0,
        FieldValue::Text(text) => parse_instant(text).unwrap_or(f64::NAN),
        FieldValue::Number(number) if *number == 0.0 || number.is_nan() => 0.0,
        // Numeric date fields already carry epoch milliseconds
        FieldValue::Number(number) => *number,
        FieldValue::Bool(false) => 0.0,
        FieldValue::Bool(true) => f64::NAN,
    }
}

fn truthy(value: &FieldValue) -> bool {
    match value {
        FieldValue::Null => false,
        FieldValue::Text(text) => !text.is_empty(),
        FieldValue::Number(number) => *number != 0.0 && !number.is_nan(),
        FieldValue::Bool(flag) => *flag,
    }
}

// ==================== Comparison Helpers ====================

/// Strict equality on normalized values; mismatched variants never compare
/// equal (no cross-type coercion). NaN numbers are unequal to everything,
/// including themselves.
fn normalized_eq(left: &Normalized, right: &Normalized) -> bool {
    match (left, right) {
        (Normalized::Text(a), Normalized::Text(b)) => a == b,
        (Normalized::Number(a), Normalized::Number(b)) => a == b,
        (Normalized::Instant(a), Normalized::Instant(b)) => a == b,
        (Normalized::Truth(a), Normalized::Truth(b)) => a == b,
        _ => false,
    }
}

fn contains(row_value: &Normalized, filter_value: &Normalized) -> bool {
    match (row_value, filter_value) {
        (Normalized::Text(row_text), Normalized::Text(filter_text)) => {
            row_text.contains(filter_text.as_str())
        }
        _ => false,
    }
}

fn ordering(left: &Normalized, right: &Normalized) -> Option<Ordering> {
    match (left, right) {
        (Normalized::Number(a), Normalized::Number(b)) => a.partial_cmp(b),
        (Normalized::Text(a), Normalized::Text(b)) => Some(a.cmp(b)),
        (Normalized::Instant(a), Normalized::Instant(b)) => a.partial_cmp(b),
        _ => None,
    }
}

/// `before`/`after`: the row's timeline position against the parsed rule
/// value. Anything unparsable fails the comparison.
fn on_timeline(row_value: &Normalized, rule_value: &str, expected: Ordering) -> bool {
    let Normalized::Instant(row_millis) = row_value else {
        return false;
    };
    let Some(rule_millis) = parse_instant(rule_value) else {
        return false;
    };
    row_millis.partial_cmp(&rule_millis) == Some(expected)
}

/// `is` on date columns: calendar-day equality. Both sides are truncated to
/// midnight, so any time-of-day component is ignored. Works from the raw
/// row value rather than the timeline normalization.
fn same_calendar_day(raw_row: Option<FieldValue>, rule_value: &str) -> bool {
    let Some(raw) = raw_row else {
        return false;
    };
    let Some(row_day) = row_calendar_day(&raw) else {
        return false;
    };
    let Some(rule_day) = parse_calendar_day(rule_value) else {
        return false;
    };
    row_day == rule_day
}

fn row_calendar_day(raw: &FieldValue) -> Option<NaiveDate> {
    match raw {
        FieldValue::Text(text) => parse_calendar_day(text),
        FieldValue::Number(millis) => {
            DateTime::from_timestamp_millis(*millis as i64).map(|dt| dt.naive_utc().date())
        }
        FieldValue::Null | FieldValue::Bool(_) => None,
    }
}

// ==================== Date Parsing ====================

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a date or datetime string to epoch milliseconds.
///
/// Accepts RFC 3339, ISO local datetimes, and date-only values (taken as
/// midnight). Naive values are placed on the timeline as written, without
/// timezone conversion.
fn parse_instant(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.timestamp_millis() as f64);
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(datetime.and_utc().timestamp_millis() as f64);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        return Some(midnight.and_utc().timestamp_millis() as f64);
    }
    None
}

/// Parses a date or datetime string down to its calendar day, using the
/// literal date components as written.
fn parse_calendar_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.naive_local().date());
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(datetime.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
