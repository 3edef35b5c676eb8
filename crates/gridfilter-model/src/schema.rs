//! Column schema types describing the shape of the tabular data being filtered.
//!
//! A dataset is described as an ordered list of [`ColumnDefinition`]s. The
//! declared [`ColumnType`] of a column drives how raw row values are
//! normalized during evaluation and which operators a host UI offers for
//! rules on that column.

use serde::{Deserialize, Serialize};

/// The declared type of a column.
///
/// Serialized with the lowercase wire names established by the widget's
/// JSON format (`"string"`, `"number"`, `"date"`, `"boolean"`, `"select"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Free text; both sides of a comparison are lowercased and trimmed.
    String,
    /// Numeric values; compared as 64-bit floats.
    Number,
    /// Date or datetime values; compared as points on an epoch-millisecond
    /// timeline.
    Date,
    /// True/false values; matched with the boolean-literal operators.
    Boolean,
    /// Text restricted to a fixed set of choices; normalized like text.
    Select,
}

/// Describes one filterable column of the dataset.
///
/// # Examples
///
/// ## A plain text column
///
/// ```
/// use gridfilter_model_rs::schema::{ColumnDefinition, ColumnType};
///
/// let column = ColumnDefinition::new("cost_centre_desc", "Description", ColumnType::String);
/// assert_eq!(column.id, "cost_centre_desc");
/// assert!(column.options.is_none());
/// ```
///
/// ## A select column with fixed choices
///
/// ```
/// use gridfilter_model_rs::schema::{ColumnDefinition, ColumnType};
///
/// let column = ColumnDefinition::select("status", "Status", ["open", "closed"]);
/// assert_eq!(column.column_type, ColumnType::Select);
/// assert_eq!(column.options.as_deref(), Some(&["open".to_string(), "closed".to_string()][..]));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Unique column identifier, matched against rule column ids and used to
    /// look fields up on rows.
    pub id: String,

    /// Human-readable label shown by host UIs.
    pub label: String,

    /// Declared type, driving normalization and operator choice.
    #[serde(rename = "type")]
    pub column_type: ColumnType,

    /// Fixed set of choices for [`ColumnType::Select`] columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl ColumnDefinition {
    /// Creates a column definition without select options.
    pub fn new(id: impl Into<String>, label: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            column_type,
            options: None,
        }
    }

    /// Creates a [`ColumnType::Select`] column with its fixed set of choices.
    pub fn select<I, S>(id: impl Into<String>, label: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            label: label.into(),
            column_type: ColumnType::Select,
            options: Some(options.into_iter().map(Into::into).collect()),
        }
    }
}
