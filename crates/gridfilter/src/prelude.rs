//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the gridfilter
//! crates, making it easy for library consumers to import everything they
//! need with a single use statement.
//!
//! # Example
//!
//! ```
//! use gridfilter_rs::prelude::*;
//!
//! // Now you have access to:
//! // - FilterSession, RulePatch, SessionError, Result (editing session)
//! // - FilterEvaluator (tree evaluation)
//! // - SelectOption, ModalSurface, SelectControl, option feeds (host UI)
//! // - ColumnDefinition, ColumnType, FieldValue, Row (data model)
//! // - FilterGroup, FilterRule, FilterItem, FilterOperator, etc. (tree)
//! ```

// Evaluator
pub use crate::eval::FilterEvaluator;

// Editing session
pub use crate::session::{FilterSession, Result, RulePatch, SessionError};

// UI contracts and option feeds
pub use crate::ui::{
    column_options, operator_options, value_options, ModalSurface, SelectControl, SelectOption,
};

// Data model
pub use gridfilter_model_rs::schema::{ColumnDefinition, ColumnType};
pub use gridfilter_model_rs::value::{FieldValue, Row};

// Filter tree
pub use gridfilter_model_rs::tree::{
    new_item_id, FilterGroup, FilterItem, FilterOperator, FilterRule, LogicalOperator,
    ROOT_GROUP_ID,
};
