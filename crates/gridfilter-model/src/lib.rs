//! Data model for the gridfilter widget core.
//!
//! This crate holds everything the filter engine and a host UI share: the
//! column schema describing the dataset, the field values rows expose, and
//! the filter tree of rules and AND/OR groups together with its persistent
//! mutation operations.
//!
//! # Quick Start
//!
//! ```
//! use gridfilter_model_rs::schema::{ColumnDefinition, ColumnType};
//! use gridfilter_model_rs::tree::{FilterGroup, FilterOperator, FilterRule};
//!
//! // Describe the dataset
//! let columns = vec![
//!     ColumnDefinition::new("status", "Status", ColumnType::String),
//!     ColumnDefinition::new("year", "Year", ColumnType::Number),
//! ];
//!
//! // Build a tree: start from the empty root and add a rule
//! let root = FilterGroup::root();
//! let rule = FilterRule::new("status", FilterOperator::Contains, "open");
//! let root = root.add_rule("root", rule);
//!
//! assert_eq!(root.items.len(), 1);
//! assert_eq!(columns.len(), 2);
//! ```

pub mod schema;
pub mod tree;
pub mod value;
