//! The filter editing session: working tree state and apply/reset flow.
//!
//! A [`FilterSession`] is created when the filter UI opens. It owns the
//! column schema, the dataset, and the working filter tree, and publishes
//! filtered datasets to a consumer callback when the user applies or resets.
//! All structural edits go through the session, which delegates to the
//! persistent tree operations.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use gridfilter_model_rs::schema::{ColumnDefinition, ColumnType};
//! use gridfilter_model_rs::tree::ROOT_GROUP_ID;
//! use gridfilter_rs::session::{FilterSession, RulePatch};
//! use serde_json::json;
//!
//! let columns = vec![ColumnDefinition::new("status", "Status", ColumnType::String)];
//! let rows = vec![json!({ "status": "open" }), json!({ "status": "closed" })];
//!
//! let published = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&published);
//! let mut session = FilterSession::new(columns, rows, move |kept| {
//!     *sink.borrow_mut() = kept;
//! });
//!
//! let rule_id = session.add_rule(ROOT_GROUP_ID).unwrap();
//! session.update_rule(&rule_id, RulePatch::new().with_value("open"));
//! session.apply();
//!
//! assert_eq!(published.borrow().len(), 1);
//! assert!(!session.is_open());
//! ```

use gridfilter_model_rs::schema::{ColumnDefinition, ColumnType};
use gridfilter_model_rs::tree::{
    FilterGroup, FilterItem, FilterOperator, FilterRule, LogicalOperator,
};
use gridfilter_model_rs::value::Row;

use crate::eval::FilterEvaluator;

/// Errors reported by session operations.
///
/// Structural edits are otherwise forgiving (a missing target id is a
/// no-op); these two cases are caller mistakes worth surfacing.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The root group anchors the tree and cannot be removed.
    #[error("the root filter group cannot be removed")]
    RemoveRoot,

    /// No column exists to default a new rule to.
    #[error("cannot add a rule: the column schema is empty")]
    EmptySchema,
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// A partial update to one rule, applied by [`FilterSession::update_rule`].
///
/// Only the fields that are set change; everything else on the rule is kept.
/// Changing the column does **not** implicitly reset the operator and value;
/// callers that switch a rule to a differently-typed column are expected to
/// reset both, conventionally via [`RulePatch::for_column`].
#[derive(Debug, Clone, Default)]
pub struct RulePatch {
    /// New column id, if changing.
    pub column_id: Option<String>,
    /// New operator, if changing.
    pub operator: Option<FilterOperator>,
    /// New comparison value, if changing.
    pub value: Option<String>,
}

impl RulePatch {
    /// Creates an empty patch; combine with the `with_*` builders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the column id.
    pub fn with_column_id(mut self, column_id: impl Into<String>) -> Self {
        self.column_id = Some(column_id.into());
        self
    }

    /// Sets the operator.
    pub fn with_operator(mut self, operator: FilterOperator) -> Self {
        self.operator = Some(operator);
        self
    }

    /// Sets the comparison value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// The conventional patch for moving a rule to another column: the
    /// column id, a type-appropriate starting operator (`is` for dates,
    /// `equals` for numbers and selects, `contains` otherwise), and a
    /// cleared value.
    pub fn for_column(column: &ColumnDefinition) -> Self {
        let operator = match column.column_type {
            ColumnType::Date => FilterOperator::Is,
            ColumnType::Number | ColumnType::Select => FilterOperator::Equals,
            ColumnType::String | ColumnType::Boolean => FilterOperator::Contains,
        };
        RulePatch::new()
            .with_column_id(column.id.clone())
            .with_operator(operator)
            .with_value("")
    }

    fn apply_to(self, rule: &mut FilterRule) {
        if let Some(column_id) = self.column_id {
            rule.column_id = column_id;
        }
        if let Some(operator) = self.operator {
            rule.operator = operator;
        }
        if let Some(value) = self.value {
            rule.value = value;
        }
    }
}

/// Owns the editing state of one filter dialog lifecycle.
///
/// The session starts open with an empty root group (or an externally
/// seeded tree), takes structural edits while open, and closes on
/// [`apply`](FilterSession::apply), [`reset`](FilterSession::reset) or
/// [`cancel`](FilterSession::cancel). Filtered datasets are delivered
/// synchronously to the publish callback supplied at construction.
pub struct FilterSession<'a, R> {
    /// The column schema of the dataset.
    columns: Vec<ColumnDefinition>,

    /// The externally supplied dataset, kept unfiltered.
    data: Vec<R>,

    /// The working filter tree.
    root: FilterGroup,

    /// Whether the editing UI is currently showing.
    open: bool,

    /// Consumer of filtered datasets.
    publish: Box<dyn FnMut(Vec<R>) + 'a>,
}

impl<'a, R: Row + Clone> FilterSession<'a, R> {
    /// Creates an open session with an empty root group.
    ///
    /// # Arguments
    ///
    /// * `columns` - The column schema of the dataset
    /// * `data` - The dataset to filter
    /// * `publish` - Receives the filtered dataset on apply/reset
    pub fn new(
        columns: Vec<ColumnDefinition>,
        data: Vec<R>,
        publish: impl FnMut(Vec<R>) + 'a,
    ) -> Self {
        Self {
            columns,
            data,
            root: FilterGroup::root(),
            open: true,
            publish: Box::new(publish),
        }
    }

    /// Creates an open session seeded with an externally persisted tree.
    ///
    /// The supplied tree replaces the root wholesale, ids included.
    pub fn with_initial_tree(
        columns: Vec<ColumnDefinition>,
        data: Vec<R>,
        root: FilterGroup,
        publish: impl FnMut(Vec<R>) + 'a,
    ) -> Self {
        Self {
            columns,
            data,
            root,
            open: true,
            publish: Box::new(publish),
        }
    }

    /// Returns the working filter tree.
    pub fn root(&self) -> &FilterGroup {
        &self.root
    }

    /// Returns the column schema.
    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    /// Returns the unfiltered dataset.
    pub fn data(&self) -> &[R] {
        &self.data
    }

    /// Returns true while the editing UI is showing.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Marks the session open again when the UI is re-shown.
    ///
    /// The tree kept from the last [`apply`](FilterSession::apply) stays in
    /// place, so the user sees the filters that produced the current
    /// published dataset.
    pub fn reopen(&mut self) {
        self.open = true;
    }

    /// Replaces the working tree with an externally supplied one.
    ///
    /// Mirrors the "initial filters changed while the dialog is visible"
    /// flow; ignored while the session is closed.
    pub fn set_root(&mut self, root: FilterGroup) {
        if !self.open {
            return;
        }
        self.root = root;
    }

    /// Replaces the dataset, keeping the working tree.
    pub fn set_data(&mut self, data: Vec<R>) {
        self.data = data;
    }

    /// Replaces the column schema, keeping the working tree.
    pub fn set_columns(&mut self, columns: Vec<ColumnDefinition>) {
        self.columns = columns;
    }

    /// Appends a blank rule to the group identified by `parent_group_id`
    /// and returns the new rule's id.
    ///
    /// The rule defaults to the first schema column with its
    /// type-appropriate starting operator and an empty value. An unknown
    /// parent id leaves the tree unchanged (the returned id then refers to
    /// nothing).
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptySchema`] if the schema has no columns.
    pub fn add_rule(&mut self, parent_group_id: &str) -> Result<String> {
        let Some(first_column) = self.columns.first() else {
            return Err(SessionError::EmptySchema);
        };
        let rule = FilterRule::blank(first_column);
        let rule_id = rule.id.clone();
        tracing::debug!(rule_id = %rule_id, parent_id = %parent_group_id, "adding filter rule");
        self.root = self.root.add_rule(parent_group_id, rule);
        Ok(rule_id)
    }

    /// Appends an empty `AND` subgroup to the group identified by
    /// `parent_group_id` and returns the new group's id.
    pub fn add_group(&mut self, parent_group_id: &str) -> String {
        let group = FilterGroup::new(LogicalOperator::And);
        let group_id = group.id.clone();
        tracing::debug!(group_id = %group_id, parent_id = %parent_group_id, "adding filter group");
        self.root = self.root.add_group(parent_group_id, group);
        group_id
    }

    /// Applies a partial update to the rule identified by `rule_id`.
    ///
    /// A missing id, or an id belonging to a group, leaves the tree
    /// unchanged. See [`RulePatch`] for the column-change convention.
    pub fn update_rule(&mut self, rule_id: &str, patch: RulePatch) {
        self.root = self.root.update_item(rule_id, move |item| match item {
            FilterItem::Rule(mut rule) => {
                patch.apply_to(&mut rule);
                Some(FilterItem::Rule(rule))
            }
            other => Some(other),
        });
    }

    /// Sets the boolean combinator of the group identified by `group_id`.
    ///
    /// Works on the root group as well as nested ones.
    pub fn update_group_logic(&mut self, group_id: &str, logic: LogicalOperator) {
        self.root = self.root.update_item(group_id, move |item| match item {
            FilterItem::Group(mut group) => {
                group.logic = logic;
                Some(FilterItem::Group(group))
            }
            other => Some(other),
        });
    }

    /// Removes the rule or group identified by `item_id` (groups take
    /// their whole subtree with them). A missing id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::RemoveRoot`] when `item_id` is the current
    /// root group's id, whatever that id is in a seeded tree; the tree is
    /// left untouched.
    pub fn remove_item(&mut self, item_id: &str) -> Result<()> {
        if item_id == self.root.id {
            return Err(SessionError::RemoveRoot);
        }
        tracing::debug!(item_id = %item_id, "removing filter item");
        self.root = self.root.remove_item(item_id);
        Ok(())
    }

    /// Runs the working tree over the dataset, delivers the filtered rows
    /// to the publish callback, and closes the session.
    ///
    /// The tree is retained for the next [`reopen`](FilterSession::reopen).
    pub fn apply(&mut self) {
        let evaluator = FilterEvaluator::new(&self.columns);
        let filtered = evaluator.filter_rows(&self.data, &self.root);
        tracing::debug!(
            total = self.data.len(),
            kept = filtered.len(),
            "applying filter tree"
        );
        (self.publish)(filtered);
        self.open = false;
    }

    /// Discards the working tree, publishes the original unfiltered
    /// dataset, and closes the session.
    pub fn reset(&mut self) {
        tracing::debug!("clearing filters and publishing the original dataset");
        self.root = FilterGroup::root();
        let original = self.data.clone();
        (self.publish)(original);
        self.open = false;
    }

    /// Closes the session without publishing anything.
    ///
    /// The in-progress tree is discarded; the previously published dataset
    /// stays in effect on the consumer side.
    pub fn cancel(&mut self) {
        self.root = FilterGroup::root();
        self.open = false;
    }
}
