//! Advanced filter engine for typed tabular data.
//!
//! This crate provides the working parts of an advanced-filter widget: the
//! evaluator that runs a filter tree over rows, the editing session that
//! owns tree state between opening the filter UI and apply/reset/cancel,
//! and the option feeds and rendering contracts a host UI consumes. The
//! shared data model (column schema, field values, the filter tree and its
//! persistent mutations) lives in the `gridfilter_model_rs` crate.
//!
//! # Quick Start
//!
//! ```
//! use gridfilter_rs::prelude::*;
//! use serde_json::json;
//!
//! let columns = vec![
//!     ColumnDefinition::new("cost_centre_desc", "Description", ColumnType::String),
//!     ColumnDefinition::new("year", "Year", ColumnType::Number),
//! ];
//! let rows = vec![
//!     json!({ "cost_centre_desc": "Finance Dept", "year": 2024 }),
//!     json!({ "cost_centre_desc": "Operations", "year": 1999 }),
//! ];
//!
//! let mut filtered = Vec::new();
//! {
//!     let mut session = FilterSession::new(columns, rows, |kept| filtered = kept);
//!     let rule_id = session.add_rule(ROOT_GROUP_ID).unwrap();
//!     session.update_rule(&rule_id, RulePatch::new().with_value("finance"));
//!     session.apply();
//! }
//!
//! assert_eq!(filtered.len(), 1);
//! ```

pub mod eval;
pub mod prelude;
pub mod session;
pub mod ui;
