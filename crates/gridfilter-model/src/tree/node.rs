//! Filter tree nodes: rules, groups, and the operators that combine them.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use crate::schema::{ColumnDefinition, ColumnType};

/// Reserved identifier of the root group.
///
/// The root always exists, is always a group, and is never removed by tree
/// operations; sessions reject attempts to delete it.
pub const ROOT_GROUP_ID: &str = "root";

/// Generates a fresh collision-resistant identifier for a new rule or group.
///
/// Identifiers only need to be unique within one tree, but a random 128-bit
/// token avoids any bookkeeping when trees are merged or seeded externally.
pub fn new_item_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Boolean combinator applied by a group to its children.
///
/// Serialized as `"AND"` / `"OR"`, matching the established wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOperator {
    /// Every child must be satisfied.
    #[serde(rename = "AND")]
    And,
    /// At least one child must be satisfied.
    #[serde(rename = "OR")]
    Or,
}

impl LogicalOperator {
    /// The wire name of the combinator.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
        }
    }
}

impl std::fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison operator carried by a rule.
///
/// Serialized with the snake_case wire names established by the widget's
/// JSON format (`"not_equals"`, `"gte"`, `"true"`, ...). The enum is closed:
/// unknown operator strings are rejected at deserialization time instead of
/// being carried around as always-true rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    // ==================== Equality ====================
    /// Strict equality on normalized values.
    Equals,

    /// Strict inequality on normalized values.
    NotEquals,

    // ==================== Text Containment ====================
    /// Substring containment on normalized text.
    Contains,

    /// Negated substring containment on normalized text.
    NotContains,

    // ==================== Ordering ====================
    /// Strictly greater than.
    Gt,

    /// Strictly less than.
    Lt,

    /// Greater than or equal.
    Gte,

    /// Less than or equal.
    Lte,

    // ==================== Dates ====================
    /// Strictly earlier on the timeline.
    Before,

    /// Strictly later on the timeline.
    After,

    /// Same calendar day (both sides truncated to midnight).
    Is,

    // ==================== Boolean Literals ====================
    /// The coerced row value is exactly `true`; carries no comparison value.
    True,

    /// The coerced row value is exactly `false`; carries no comparison value.
    False,
}

impl FilterOperator {
    /// The wire name of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Equals => "equals",
            FilterOperator::NotEquals => "not_equals",
            FilterOperator::Contains => "contains",
            FilterOperator::NotContains => "not_contains",
            FilterOperator::Gt => "gt",
            FilterOperator::Lt => "lt",
            FilterOperator::Gte => "gte",
            FilterOperator::Lte => "lte",
            FilterOperator::Before => "before",
            FilterOperator::After => "after",
            FilterOperator::Is => "is",
            FilterOperator::True => "true",
            FilterOperator::False => "false",
        }
    }

    /// Returns true for the boolean-literal operators (`true`/`false`).
    ///
    /// These carry their comparison value in the operator itself, so the
    /// empty-value vacuous-truth policy does not apply to them.
    pub fn is_boolean_literal(&self) -> bool {
        matches!(self, FilterOperator::True | FilterOperator::False)
    }

    /// The operator a freshly added rule starts with for a column of the
    /// given type: `contains` for text, `equals` for everything else.
    pub fn default_for(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::String => FilterOperator::Contains,
            _ => FilterOperator::Equals,
        }
    }

    /// The set of operators with meaningful semantics for a column type.
    ///
    /// Host UIs typically offer a curated subset (see the engine crate's
    /// option feeds); this is the full set evaluation supports without
    /// degrading to a constant result.
    pub fn valid_for(column_type: ColumnType) -> &'static [FilterOperator] {
        match column_type {
            ColumnType::String => &[
                FilterOperator::Equals,
                FilterOperator::NotEquals,
                FilterOperator::Contains,
                FilterOperator::NotContains,
            ],
            ColumnType::Select => &[FilterOperator::Equals, FilterOperator::NotEquals],
            ColumnType::Number => &[
                FilterOperator::Equals,
                FilterOperator::NotEquals,
                FilterOperator::Gt,
                FilterOperator::Lt,
                FilterOperator::Gte,
                FilterOperator::Lte,
            ],
            ColumnType::Date => &[
                FilterOperator::Is,
                FilterOperator::Before,
                FilterOperator::After,
            ],
            ColumnType::Boolean => &[FilterOperator::True, FilterOperator::False],
        }
    }
}

impl std::fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leaf predicate: one column compared against one value.
///
/// Serializes with the `"type": "rule"` discriminant every node of the
/// wire format carries.
///
/// # Example
///
/// ```
/// use gridfilter_model_rs::tree::{FilterOperator, FilterRule};
///
/// let rule = FilterRule::new("status", FilterOperator::Equals, "open");
/// assert_eq!(rule.column_id, "status");
/// assert!(!rule.id.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FilterRule {
    /// Unique identifier within the tree.
    pub id: String,

    /// Identifier of the column this rule tests.
    #[serde(rename = "columnId")]
    pub column_id: String,

    /// Comparison operator.
    pub operator: FilterOperator,

    /// Comparison value as entered. The empty string means "not filled in
    /// yet" and makes the rule vacuously satisfied, boolean literals
    /// excepted.
    #[serde(default)]
    pub value: String,
}

impl FilterRule {
    /// Creates a rule with a fresh random id.
    pub fn new(
        column_id: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: new_item_id(),
            column_id: column_id.into(),
            operator,
            value: value.into(),
        }
    }

    /// Creates a rule with an explicit id, for deterministic construction.
    pub fn with_id(
        id: impl Into<String>,
        column_id: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            column_id: column_id.into(),
            operator,
            value: value.into(),
        }
    }

    /// The blank rule appended by "add rule" for the given column: the
    /// column's default operator and an empty value.
    pub fn blank(column: &ColumnDefinition) -> Self {
        FilterRule::new(
            column.id.clone(),
            FilterOperator::default_for(column.column_type),
            "",
        )
    }
}

// Hand-written so the tag is present even when a rule is serialized
// outside a FilterItem.
impl Serialize for FilterRule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("FilterRule", 5)?;
        state.serialize_field("type", "rule")?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("columnId", &self.column_id)?;
        state.serialize_field("operator", &self.operator)?;
        state.serialize_field("value", &self.value)?;
        state.end()
    }
}

/// Boolean combinator node holding rules and further groups.
///
/// Serializes with the `"type": "group"` discriminant every node of the
/// wire format carries, so a persisted root round-trips in the exact shape
/// the widget's JSON uses.
///
/// # Example
///
/// ```
/// use gridfilter_model_rs::tree::{
///     FilterGroup, FilterOperator, FilterRule, LogicalOperator, ROOT_GROUP_ID,
/// };
///
/// let root = FilterGroup::root();
/// assert_eq!(root.id, ROOT_GROUP_ID);
/// assert_eq!(root.logic, LogicalOperator::And);
/// assert!(root.is_empty());
///
/// let rule = FilterRule::new("year", FilterOperator::Equals, "2024");
/// let root = root.add_rule(ROOT_GROUP_ID, rule);
/// assert_eq!(root.items.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FilterGroup {
    /// Unique identifier within the tree.
    pub id: String,

    /// How the children combine.
    pub logic: LogicalOperator,

    /// Child rules and groups, in display order.
    pub items: Vec<FilterItem>,
}

impl FilterGroup {
    /// Creates an empty group with a fresh random id.
    pub fn new(logic: LogicalOperator) -> Self {
        Self {
            id: new_item_id(),
            logic,
            items: Vec::new(),
        }
    }

    /// Creates an empty group with an explicit id.
    pub fn with_id(id: impl Into<String>, logic: LogicalOperator) -> Self {
        Self {
            id: id.into(),
            logic,
            items: Vec::new(),
        }
    }

    /// The empty root group every editing session starts from: reserved id,
    /// `AND` logic, no children.
    pub fn root() -> Self {
        FilterGroup::with_id(ROOT_GROUP_ID, LogicalOperator::And)
    }

    /// Returns true if the group has no children.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Finds a descendant item by id, depth-first.
    ///
    /// The group itself is not an item and is never returned; pass the
    /// group's own id to a parent to locate it as an item.
    pub fn find(&self, item_id: &str) -> Option<&FilterItem> {
        for item in &self.items {
            if item.id() == item_id {
                return Some(item);
            }
            if let FilterItem::Group(sub) = item {
                if let Some(found) = sub.find(item_id) {
                    return Some(found);
                }
            }
        }
        None
    }
}

// Hand-written so a bare root carries the tag that nested groups get.
impl Serialize for FilterGroup {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("FilterGroup", 4)?;
        state.serialize_field("type", "group")?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("logic", &self.logic)?;
        state.serialize_field("items", &self.items)?;
        state.end()
    }
}

/// One entry in a group's child list.
///
/// Deserialized by the `"type"` discriminator (`"rule"` / `"group"`) of the
/// established wire format:
///
/// ```json
/// { "type": "rule", "id": "a1", "columnId": "status", "operator": "equals", "value": "open" }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FilterItem {
    /// Leaf rule.
    Rule(FilterRule),
    /// Nested group.
    Group(FilterGroup),
}

// The node structs already emit their own tags.
impl Serialize for FilterItem {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            FilterItem::Rule(rule) => rule.serialize(serializer),
            FilterItem::Group(group) => group.serialize(serializer),
        }
    }
}

impl FilterItem {
    /// The item's unique identifier.
    pub fn id(&self) -> &str {
        match self {
            FilterItem::Rule(rule) => &rule.id,
            FilterItem::Group(group) => &group.id,
        }
    }

    /// Returns the rule if this item is a leaf.
    pub fn as_rule(&self) -> Option<&FilterRule> {
        match self {
            FilterItem::Rule(rule) => Some(rule),
            FilterItem::Group(_) => None,
        }
    }

    /// Returns the group if this item is a nested group.
    pub fn as_group(&self) -> Option<&FilterGroup> {
        match self {
            FilterItem::Rule(_) => None,
            FilterItem::Group(group) => Some(group),
        }
    }
}
