//! The filter tree: nested AND/OR groups of rules over typed columns.
//!
//! A tree is a single root [`FilterGroup`] whose children are
//! [`FilterItem`]s: leaf [`FilterRule`]s or further groups, nested to any
//! depth. Every node carries a globally unique id; mutations locate their
//! target by id and rebuild the tree persistently, so the input tree is
//! never changed in place.
//!
//! # Example
//!
//! ```
//! use gridfilter_model_rs::tree::{
//!     FilterGroup, FilterOperator, FilterRule, LogicalOperator, ROOT_GROUP_ID,
//! };
//!
//! // root AND [ status equals "open", OR [ year gt "2023" ] ]
//! let subgroup = FilterGroup::with_id("g1", LogicalOperator::Or);
//! let tree = FilterGroup::root()
//!     .add_rule(ROOT_GROUP_ID, FilterRule::with_id("r1", "status", FilterOperator::Equals, "open"))
//!     .add_group(ROOT_GROUP_ID, subgroup)
//!     .add_rule("g1", FilterRule::with_id("r2", "year", FilterOperator::Gt, "2023"));
//!
//! assert_eq!(tree.items.len(), 2);
//! assert!(tree.find("r2").is_some());
//!
//! // Mutations are persistent: removing from `tree` yields a new tree
//! let pruned = tree.remove_item("g1");
//! assert!(pruned.find("r2").is_none());
//! assert!(tree.find("r2").is_some());
//! ```

mod node;
mod ops;

pub use node::{
    new_item_id, FilterGroup, FilterItem, FilterOperator, FilterRule, LogicalOperator,
    ROOT_GROUP_ID,
};
