//! Persistent mutation operations over the filter tree.
//!
//! Every operation takes the tree by shared reference and returns a rebuilt
//! tree; the input is never mutated, so callers holding the previous value
//! keep a consistent snapshot. Targets are located depth-first by unique id,
//! the root's own id is checked before descending, and the traversal stops
//! at the first match. A target id that does not exist anywhere in the tree
//! makes the operation a no-op: the result is structurally equal to the
//! input.

use super::node::{FilterGroup, FilterItem, FilterRule};

impl FilterGroup {
    /// Returns a new tree with `rule` appended to the child list of the
    /// group identified by `parent_group_id`.
    ///
    /// If no group carries that id (including when the id belongs to a
    /// rule, which has no child list), the tree is returned unchanged.
    pub fn add_rule(&self, parent_group_id: &str, rule: FilterRule) -> FilterGroup {
        self.add_item(parent_group_id, FilterItem::Rule(rule))
    }

    /// Returns a new tree with `group` appended to the child list of the
    /// group identified by `parent_group_id`.
    ///
    /// Same no-op semantics as [`FilterGroup::add_rule`] when the parent id
    /// cannot be resolved to a group.
    pub fn add_group(&self, parent_group_id: &str, group: FilterGroup) -> FilterGroup {
        self.add_item(parent_group_id, FilterItem::Group(group))
    }

    fn add_item(&self, parent_group_id: &str, item: FilterItem) -> FilterGroup {
        let mut pending = Some(item);
        append_into(self, parent_group_id, &mut pending)
    }

    /// Returns a new tree with the item identified by `item_id` replaced by
    /// `updater(item)`.
    ///
    /// The updater receives the current item and returns its replacement;
    /// returning `None` deletes the item from its parent's child list.
    ///
    /// When `item_id` is the tree's own id the updater is applied to the
    /// whole tree; because the root must always remain a group, a `None` or
    /// non-group result leaves the tree unchanged. Root replacement is how
    /// an externally supplied tree is swapped in, not a deletion path.
    ///
    /// # Example
    ///
    /// ```
    /// use gridfilter_model_rs::tree::{FilterGroup, FilterItem, FilterOperator, FilterRule};
    ///
    /// let rule = FilterRule::with_id("r1", "status", FilterOperator::Equals, "open");
    /// let root = FilterGroup::root().add_rule("root", rule);
    ///
    /// let updated = root.update_item("r1", |item| match item {
    ///     FilterItem::Rule(mut rule) => {
    ///         rule.value = "closed".to_string();
    ///         Some(FilterItem::Rule(rule))
    ///     }
    ///     other => Some(other),
    /// });
    ///
    /// let rule = updated.find("r1").and_then(|item| item.as_rule()).unwrap();
    /// assert_eq!(rule.value, "closed");
    /// // The original tree is untouched.
    /// let rule = root.find("r1").and_then(|item| item.as_rule()).unwrap();
    /// assert_eq!(rule.value, "open");
    /// ```
    pub fn update_item<F>(&self, item_id: &str, updater: F) -> FilterGroup
    where
        F: FnOnce(FilterItem) -> Option<FilterItem>,
    {
        if self.id == item_id {
            return match updater(FilterItem::Group(self.clone())) {
                Some(FilterItem::Group(replacement)) => replacement,
                _ => self.clone(),
            };
        }
        let mut updater = Some(updater);
        update_into(self, item_id, &mut updater)
    }

    /// Returns a new tree with the item identified by `item_id` removed.
    ///
    /// Removing a group removes its whole subtree. The root cannot be
    /// removed: passing the tree's own id returns the tree unchanged.
    pub fn remove_item(&self, item_id: &str) -> FilterGroup {
        self.update_item(item_id, |_| None)
    }
}

fn append_into(
    group: &FilterGroup,
    parent_group_id: &str,
    pending: &mut Option<FilterItem>,
) -> FilterGroup {
    if group.id == parent_group_id {
        let mut items = group.items.clone();
        if let Some(item) = pending.take() {
            items.push(item);
        }
        return FilterGroup {
            id: group.id.clone(),
            logic: group.logic,
            items,
        };
    }

    let items = group
        .items
        .iter()
        .map(|child| match child {
            FilterItem::Group(sub) if pending.is_some() => {
                FilterItem::Group(append_into(sub, parent_group_id, pending))
            }
            other => other.clone(),
        })
        .collect();

    FilterGroup {
        id: group.id.clone(),
        logic: group.logic,
        items,
    }
}

fn update_into<F>(group: &FilterGroup, item_id: &str, updater: &mut Option<F>) -> FilterGroup
where
    F: FnOnce(FilterItem) -> Option<FilterItem>,
{
    let mut items = Vec::with_capacity(group.items.len());
    for child in &group.items {
        if updater.is_none() {
            // Already matched earlier in the traversal
            items.push(child.clone());
            continue;
        }
        if child.id() == item_id {
            if let Some(updater) = updater.take() {
                if let Some(updated) = updater(child.clone()) {
                    items.push(updated);
                }
            }
        } else if let FilterItem::Group(sub) = child {
            items.push(FilterItem::Group(update_into(sub, item_id, updater)));
        } else {
            items.push(child.clone());
        }
    }

    FilterGroup {
        id: group.id.clone(),
        logic: group.logic,
        items,
    }
}
