//! Option feeds and rendering contracts for host UIs.
//!
//! The engine never renders anything. Hosts implement [`ModalSurface`] and
//! [`SelectControl`] with their own toolkit and fill the controls from the
//! pure option feeds here: columns for the column picker, per-type operator
//! lists with display labels, and declared choices for select columns.
//!
//! # Example
//!
//! ```
//! use gridfilter_model_rs::schema::ColumnType;
//! use gridfilter_rs::ui::operator_options;
//!
//! let options = operator_options(ColumnType::Date);
//! let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
//! assert_eq!(labels, vec!["On date", "Before", "After"]);
//! ```

use gridfilter_model_rs::schema::{ColumnDefinition, ColumnType};
use gridfilter_model_rs::tree::FilterOperator;
use serde::{Deserialize, Serialize};

// ==================== Select Option ====================

/// One entry in a dropdown control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Machine value reported back when the entry is chosen.
    pub value: String,

    /// Text shown to the user.
    pub label: String,
}

impl SelectOption {
    /// Creates an option from a value/label pair.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

// ==================== Option Feeds ====================

/// Options for the column picker: one `(id, label)` entry per schema
/// column, in schema order.
pub fn column_options(columns: &[ColumnDefinition]) -> Vec<SelectOption> {
    columns
        .iter()
        .map(|column| SelectOption::new(column.id.clone(), column.label.clone()))
        .collect()
}

/// Options for the operator picker of a column of the given type.
///
/// The entries pair each operator's wire name with its display label, in a
/// fixed order per type.
pub fn operator_options(column_type: ColumnType) -> Vec<SelectOption> {
    let labelled: &[(FilterOperator, &str)] = match column_type {
        ColumnType::String => &[
            (FilterOperator::Contains, "Contains"),
            (FilterOperator::NotContains, "Does not contain"),
            (FilterOperator::Equals, "Exact match"),
        ],
        ColumnType::Select => &[
            (FilterOperator::Equals, "Is"),
            (FilterOperator::NotEquals, "Is not"),
        ],
        ColumnType::Number => &[
            (FilterOperator::Equals, "="),
            (FilterOperator::NotEquals, "!="),
            (FilterOperator::Gt, ">"),
            (FilterOperator::Lt, "<"),
            (FilterOperator::Gte, ">="),
            (FilterOperator::Lte, "<="),
        ],
        ColumnType::Date => &[
            (FilterOperator::Is, "On date"),
            (FilterOperator::Before, "Before"),
            (FilterOperator::After, "After"),
        ],
        ColumnType::Boolean => &[
            (FilterOperator::True, "True"),
            (FilterOperator::False, "False"),
        ],
    };
    labelled
        .iter()
        .map(|(operator, label)| SelectOption::new(operator.as_str(), *label))
        .collect()
}

/// Options for the value picker of a select column: one entry per declared
/// choice, value and label identical. Columns without declared choices get
/// an empty list (their value editor is free-form).
pub fn value_options(column: &ColumnDefinition) -> Vec<SelectOption> {
    let Some(choices) = &column.options else {
        return Vec::new();
    };
    choices
        .iter()
        .map(|choice| SelectOption::new(choice.clone(), choice.clone()))
        .collect()
}

// ==================== Rendering Contracts ====================

/// Contract for the dialog container hosting the filter editor.
///
/// The engine only drives visibility; sizing, chrome and the footer
/// buttons are the host's concern.
pub trait ModalSurface {
    /// Makes the dialog visible.
    fn show(&mut self);

    /// Hides the dialog.
    fn hide(&mut self);

    /// Reports whether the dialog is currently visible.
    fn is_visible(&self) -> bool;
}

/// Contract for a single-select dropdown control.
///
/// Hosts forward user changes to
/// [`FilterSession::update_rule`](crate::session::FilterSession::update_rule);
/// the engine only pushes options and the current selection down.
pub trait SelectControl {
    /// Replaces the selectable options.
    fn set_options(&mut self, options: Vec<SelectOption>);

    /// Sets the hint text shown while nothing is selected.
    fn set_placeholder(&mut self, placeholder: &str);

    /// Returns the currently selected value, if any.
    fn value(&self) -> Option<String>;

    /// Selects the option with the given value.
    fn set_value(&mut self, value: &str);
}
