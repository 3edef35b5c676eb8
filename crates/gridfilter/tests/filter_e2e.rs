//! End-to-end tests for the filter editing session.
//!
//! These tests drive a full dialog lifecycle over a small in-memory
//! dataset: building nested trees through session operations, applying,
//! reopening, resetting and cancelling, and seeding the session from the
//! serialized wire format.
//!
//! Run with: cargo test --package gridfilter-rs --test filter_e2e

use std::cell::RefCell;
use std::rc::Rc;

use gridfilter_rs::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

// ============================================================================
// Test Context
// ============================================================================

type Published = Rc<RefCell<Vec<Vec<Value>>>>;

/// Drives one session over a captured publish sink.
struct SessionTestContext {
    published: Published,
    session: FilterSession<'static, Value>,
}

impl SessionTestContext {
    fn new() -> Self {
        Self::with_dataset(make_columns(), make_rows())
    }

    fn with_dataset(columns: Vec<ColumnDefinition>, rows: Vec<Value>) -> Self {
        let published: Published = Rc::default();
        let sink = Rc::clone(&published);
        let session = FilterSession::new(columns, rows, move |kept| {
            sink.borrow_mut().push(kept);
        });
        Self { published, session }
    }

    fn with_tree(root: FilterGroup) -> Self {
        let published: Published = Rc::default();
        let sink = Rc::clone(&published);
        let session =
            FilterSession::with_initial_tree(make_columns(), make_rows(), root, move |kept| {
                sink.borrow_mut().push(kept);
            });
        Self { published, session }
    }

    fn publish_count(&self) -> usize {
        self.published.borrow().len()
    }

    fn last_published(&self) -> Vec<Value> {
        self.published
            .borrow()
            .last()
            .cloned()
            .expect("nothing published yet")
    }
}

fn make_columns() -> Vec<ColumnDefinition> {
    vec![
        ColumnDefinition::new("cost_centre", "Cost Centre", ColumnType::String),
        ColumnDefinition::new("cost_centre_desc", "Description", ColumnType::String),
        ColumnDefinition::new("cost_centre_limit", "Limit", ColumnType::Number),
        ColumnDefinition::new("year", "Year", ColumnType::Number),
        ColumnDefinition::new("timestamp", "Created", ColumnType::Date),
        ColumnDefinition::new("is_freeze", "Frozen", ColumnType::Boolean),
        ColumnDefinition::select("status", "Status", ["open", "closed", "pending"]),
    ]
}

fn make_rows() -> Vec<Value> {
    vec![
        json!({
            "cost_centre": "CC-100",
            "cost_centre_desc": "Finance Dept",
            "cost_centre_limit": "15000",
            "year": 2024,
            "timestamp": "2024-03-01T09:30:00",
            "is_freeze": false,
            "status": "Open",
        }),
        json!({
            "cost_centre": "CC-200",
            "cost_centre_desc": "Operations",
            "cost_centre_limit": "9000",
            "year": 1999,
            "timestamp": "1999-12-31T23:59:59",
            "is_freeze": true,
            "status": "Closed",
        }),
        json!({
            "cost_centre": "CC-300",
            "cost_centre_desc": "Finance Ops",
            "cost_centre_limit": "22000",
            "year": 2030,
            "timestamp": "2030-06-15T00:00:00",
            "is_freeze": false,
            "status": "Pending",
        }),
        json!({
            "cost_centre": "CC-400",
            "cost_centre_desc": "Research",
            "cost_centre_limit": "not tracked",
            "year": 2024,
            "timestamp": "2024-03-01T23:59:00",
            "is_freeze": true,
            "status": "Open",
        }),
    ]
}

fn cost_centres(rows: &[Value]) -> Vec<&str> {
    rows.iter()
        .map(|row| row["cost_centre"].as_str().unwrap())
        .collect()
}

// ============================================================================
// Dialog Lifecycle
// ============================================================================

#[test]
fn test_e2e_empty_tree_apply_publishes_dataset_unchanged() {
    let mut ctx = SessionTestContext::new();

    ctx.session.apply();

    assert_eq!(ctx.publish_count(), 1);
    assert_eq!(
        cost_centres(&ctx.last_published()),
        vec!["CC-100", "CC-200", "CC-300", "CC-400"]
    );
    assert!(!ctx.session.is_open());
}

#[test]
fn test_e2e_apply_reopen_refine_apply() {
    let mut ctx = SessionTestContext::new();

    let desc_rule = ctx.session.add_rule(ROOT_GROUP_ID).unwrap();
    ctx.session.update_rule(
        &desc_rule,
        RulePatch::new()
            .with_column_id("cost_centre_desc")
            .with_value("finance"),
    );
    ctx.session.apply();

    assert_eq!(cost_centres(&ctx.last_published()), vec!["CC-100", "CC-300"]);

    // Reopening keeps the applied tree; refine it with a second rule
    ctx.session.reopen();
    assert!(ctx.session.root().find(&desc_rule).is_some());

    let year_rule = ctx.session.add_rule(ROOT_GROUP_ID).unwrap();
    ctx.session.update_rule(
        &year_rule,
        RulePatch::new()
            .with_column_id("year")
            .with_operator(FilterOperator::Gte)
            .with_value("2025"),
    );
    ctx.session.apply();

    assert_eq!(ctx.publish_count(), 2);
    assert_eq!(cost_centres(&ctx.last_published()), vec!["CC-300"]);
}

#[test]
fn test_e2e_reset_restores_full_dataset_and_empty_root() {
    let mut ctx = SessionTestContext::new();

    let rule_id = ctx.session.add_rule(ROOT_GROUP_ID).unwrap();
    ctx.session.update_rule(
        &rule_id,
        RulePatch::new()
            .with_column_id("cost_centre_desc")
            .with_value("finance"),
    );
    ctx.session.apply();
    ctx.session.reopen();

    ctx.session.reset();

    assert_eq!(ctx.publish_count(), 2);
    assert_eq!(
        cost_centres(&ctx.last_published()),
        vec!["CC-100", "CC-200", "CC-300", "CC-400"]
    );
    assert_eq!(ctx.session.root().id, ROOT_GROUP_ID);
    assert!(ctx.session.root().is_empty());
}

#[test]
fn test_e2e_cancel_leaves_last_published_dataset_in_effect() {
    let mut ctx = SessionTestContext::new();

    let rule_id = ctx.session.add_rule(ROOT_GROUP_ID).unwrap();
    ctx.session.update_rule(
        &rule_id,
        RulePatch::new()
            .with_column_id("status")
            .with_operator(FilterOperator::Equals)
            .with_value("open"),
    );
    ctx.session.apply();
    assert_eq!(cost_centres(&ctx.last_published()), vec!["CC-100", "CC-400"]);

    // Start a new edit and abandon it
    ctx.session.reopen();
    let abandoned = ctx.session.add_rule(ROOT_GROUP_ID).unwrap();
    ctx.session.update_rule(
        &abandoned,
        RulePatch::new()
            .with_column_id("year")
            .with_operator(FilterOperator::Lt)
            .with_value("2000"),
    );
    ctx.session.cancel();

    assert_eq!(ctx.publish_count(), 1);
    assert!(ctx.session.root().is_empty());
    assert!(!ctx.session.is_open());
}

// ============================================================================
// Nested Trees
// ============================================================================

#[test]
fn test_e2e_nested_or_of_rule_and_and_group() {
    let columns = vec![
        ColumnDefinition::select("status", "Status", ["open", "closed"]),
        ColumnDefinition::new("year", "Year", ColumnType::Number),
        ColumnDefinition::new("is_freeze", "Frozen", ColumnType::Boolean),
    ];
    // The four combinations of (status matches, year+frozen group matches)
    let rows = vec![
        json!({ "status": "Open",   "year": 2024, "is_freeze": false }),
        json!({ "status": "Open",   "year": 1999, "is_freeze": false }),
        json!({ "status": "Closed", "year": 2024, "is_freeze": false }),
        json!({ "status": "Closed", "year": 2024, "is_freeze": true }),
    ];
    let mut ctx = SessionTestContext::with_dataset(columns, rows);

    ctx.session
        .update_group_logic(ROOT_GROUP_ID, LogicalOperator::Or);

    let rule_a = ctx.session.add_rule(ROOT_GROUP_ID).unwrap();
    ctx.session.update_rule(
        &rule_a,
        RulePatch::new()
            .with_column_id("status")
            .with_operator(FilterOperator::Equals)
            .with_value("open"),
    );

    let group_id = ctx.session.add_group(ROOT_GROUP_ID);
    let rule_b = ctx.session.add_rule(&group_id).unwrap();
    ctx.session.update_rule(
        &rule_b,
        RulePatch::new()
            .with_column_id("year")
            .with_operator(FilterOperator::Equals)
            .with_value("2024"),
    );
    let rule_c = ctx.session.add_rule(&group_id).unwrap();
    ctx.session.update_rule(
        &rule_c,
        RulePatch::new()
            .with_column_id("is_freeze")
            .with_operator(FilterOperator::False),
    );

    ctx.session.apply();

    // Rows 1-3 satisfy at least one branch; the last satisfies neither
    let kept = ctx.last_published();
    let years: Vec<i64> = kept.iter().map(|row| row["year"].as_i64().unwrap()).collect();
    let statuses: Vec<&str> = kept
        .iter()
        .map(|row| row["status"].as_str().unwrap())
        .collect();
    assert_eq!(years, vec![2024, 1999, 2024]);
    assert_eq!(statuses, vec!["Open", "Open", "Closed"]);
}

#[test]
fn test_e2e_mixed_type_conjunction() {
    let mut ctx = SessionTestContext::new();

    let before_rule = ctx.session.add_rule(ROOT_GROUP_ID).unwrap();
    ctx.session.update_rule(
        &before_rule,
        RulePatch::new()
            .with_column_id("timestamp")
            .with_operator(FilterOperator::Before)
            .with_value("2025-01-01"),
    );
    let status_rule = ctx.session.add_rule(ROOT_GROUP_ID).unwrap();
    ctx.session.update_rule(
        &status_rule,
        RulePatch::new()
            .with_column_id("status")
            .with_operator(FilterOperator::NotEquals)
            .with_value("closed"),
    );
    let limit_rule = ctx.session.add_rule(ROOT_GROUP_ID).unwrap();
    ctx.session.update_rule(
        &limit_rule,
        RulePatch::new()
            .with_column_id("cost_centre_limit")
            .with_operator(FilterOperator::Gte)
            .with_value("10000"),
    );

    ctx.session.apply();

    // CC-400's limit is unparsable, so the gte rule drops it
    assert_eq!(cost_centres(&ctx.last_published()), vec!["CC-100"]);
}

#[test]
fn test_e2e_column_switch_to_same_day_date_filter() {
    let mut ctx = SessionTestContext::new();
    let rule_id = ctx.session.add_rule(ROOT_GROUP_ID).unwrap();

    // Host flow for a column change: refresh the operator picker from the
    // new column's type, then send the conventional reset patch
    let timestamp = make_columns()
        .into_iter()
        .find(|column| column.id == "timestamp")
        .unwrap();
    let operators = operator_options(timestamp.column_type);
    assert_eq!(operators[0].value, "is");

    ctx.session
        .update_rule(&rule_id, RulePatch::for_column(&timestamp));
    ctx.session
        .update_rule(&rule_id, RulePatch::new().with_value("2024-03-01"));
    ctx.session.apply();

    // Both Mar 1 rows match regardless of their time of day
    assert_eq!(cost_centres(&ctx.last_published()), vec!["CC-100", "CC-400"]);
}

// ============================================================================
// Wire Format Seeding
// ============================================================================

#[test]
fn test_e2e_session_seeded_from_serialized_tree() {
    let wire = r#"{
        "id": "root",
        "logic": "AND",
        "items": [
            {
                "type": "rule",
                "id": "r-desc",
                "columnId": "cost_centre_desc",
                "operator": "contains",
                "value": "finance"
            },
            {
                "type": "group",
                "id": "g-recent",
                "logic": "OR",
                "items": [
                    {
                        "type": "rule",
                        "id": "r-year",
                        "columnId": "year",
                        "operator": "gte",
                        "value": "2024"
                    },
                    {
                        "type": "rule",
                        "id": "r-frozen",
                        "columnId": "is_freeze",
                        "operator": "true"
                    }
                ]
            }
        ]
    }"#;
    let root: FilterGroup = serde_json::from_str(wire).unwrap();

    let mut ctx = SessionTestContext::with_tree(root);
    ctx.session.apply();

    assert_eq!(cost_centres(&ctx.last_published()), vec!["CC-100", "CC-300"]);
}

#[test]
fn test_e2e_edited_tree_round_trips_through_wire_format() {
    let mut ctx = SessionTestContext::new();

    let group_id = ctx.session.add_group(ROOT_GROUP_ID);
    let rule_id = ctx.session.add_rule(&group_id).unwrap();
    ctx.session.update_rule(
        &rule_id,
        RulePatch::new()
            .with_column_id("year")
            .with_operator(FilterOperator::Gt)
            .with_value("2000"),
    );

    let serialized = serde_json::to_string(ctx.session.root()).unwrap();

    // The exported root uses the tagged node shape consumers persist
    let as_json: Value = serde_json::from_str(&serialized).unwrap();
    assert_eq!(as_json["type"], "group");
    assert_eq!(as_json["items"][0]["type"], "group");

    let restored: FilterGroup = serde_json::from_str(&serialized).unwrap();
    assert_eq!(&restored, ctx.session.root());

    // The restored tree drives a fresh session to the same result
    let mut seeded = SessionTestContext::with_tree(restored);
    seeded.session.apply();
    ctx.session.apply();
    assert_eq!(seeded.last_published(), ctx.last_published());
}
