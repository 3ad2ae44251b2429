//! Selection state and group partitioning over one item list

use std::collections::HashSet;

use super::Group;
use super::SelectionOptions;
use super::group::partition;
use super::group::render_label;
use crate::model::Item;
use crate::model::Key;

/// Selection and grouping state for one table instance.
///
/// The selection is an ordered list of rows, unique by the configured key.
/// Groups are derived from the item list on every [`set_items`](Self::set_items);
/// the expanded-key set is the only group state that survives regrouping.
///
/// Rows without a derivable key (no rule and no `id` field) are matched by
/// whole-row equality instead.
///
/// # Example
///
/// ```
/// use datatable_lib::model::Item;
/// use datatable_lib::selection::{SelectionOptions, TableSelection};
///
/// let mut table = TableSelection::new(SelectionOptions::new().with_group_by("team"));
/// table.set_items(vec![
///     Item::new().set("id", 1i64).set("team", "b"),
///     Item::new().set("id", 2i64).set("team", "a"),
/// ]);
///
/// let first = table.items()[0].clone();
/// table.toggle_selection(&first);
/// assert!(table.some_selected());
/// assert_eq!(table.groups()[0].label, "a (1 records)");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TableSelection {
    options: SelectionOptions,
    items: Vec<Item>,
    selected: Vec<Item>,
    groups: Vec<Group>,
    expanded: HashSet<Key>,
}

impl TableSelection {
    pub fn new(options: SelectionOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &SelectionOptions {
        &self.options
    }

    // =========================================================================
    // Keys
    // =========================================================================

    /// Identity of a row: the configured rule, else the `id` field.
    pub fn unique_key(&self, item: &Item) -> Key {
        match &self.options.unique_key {
            Some(rule) => rule.extract(item),
            None => item.id().map(Key::from).unwrap_or(Key::Null),
        }
    }

    /// Group a row belongs to.
    ///
    /// Rows with no grouping rule, or whose group value is missing or null,
    /// share the empty-string group.
    pub fn group_key(&self, item: &Item) -> Key {
        match self.options.group_by.as_ref().map(|rule| rule.extract(item)) {
            Some(key) if !key.is_null() => key,
            _ => Key::Text(String::new()),
        }
    }

    fn same_row(&self, a: &Item, b: &Item) -> bool {
        let key = self.unique_key(a);
        if key.is_null() {
            a == b
        } else {
            key == self.unique_key(b)
        }
    }

    fn position(&self, item: &Item) -> Option<usize> {
        self.selected.iter().position(|s| self.same_row(s, item))
    }

    // =========================================================================
    // Items and groups
    // =========================================================================

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Replaces the item list and recomputes groups.
    ///
    /// The selection is left as is; rows no longer present stay selected
    /// until cleared or toggled.
    pub fn set_items(&mut self, items: impl Into<Vec<Item>>) {
        self.items = items.into();
        self.regroup();
    }

    fn regroup(&mut self) {
        let buckets = partition(&self.items, |item| self.group_key(item));

        let mut groups = Vec::with_capacity(buckets.len());
        for (key, items) in buckets {
            if self.options.default_expanded {
                self.expanded.insert(key.clone());
            }
            groups.push(Group {
                label: render_label(&self.options.group_label, &key, items.len()),
                is_expanded: self.expanded.contains(&key),
                key,
                items,
            });
        }

        log::debug!("Regrouped {} rows into {} groups", self.items.len(), groups.len());
        self.groups = groups;
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, key: &Key) -> Option<&Group> {
        self.groups.iter().find(|g| &g.key == key)
    }

    pub fn expanded_keys(&self) -> &HashSet<Key> {
        &self.expanded
    }

    pub fn is_group_expanded(&self, key: &Key) -> bool {
        self.expanded.contains(key)
    }

    /// Flips a group between expanded and collapsed.
    ///
    /// Updates the expanded-key set and the group record together. Returns
    /// the new expansion state.
    pub fn toggle_group(&mut self, key: &Key) -> bool {
        let expanded = if self.expanded.remove(key) {
            false
        } else {
            self.expanded.insert(key.clone());
            true
        };

        if let Some(group) = self.groups.iter_mut().find(|g| &g.key == key) {
            group.is_expanded = expanded;
        }
        expanded
    }

    pub fn expand_all_groups(&mut self) {
        self.expanded = self.groups.iter().map(|g| g.key.clone()).collect();
        for group in &mut self.groups {
            group.is_expanded = true;
        }
    }

    pub fn collapse_all_groups(&mut self) {
        self.expanded.clear();
        for group in &mut self.groups {
            group.is_expanded = false;
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn selected(&self) -> &[Item] {
        &self.selected
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_selected(&self, item: &Item) -> bool {
        self.position(item).is_some()
    }

    /// Selects or deselects a row. Returns `true` if the row is now selected.
    ///
    /// In single-select mode selecting a row replaces the whole selection.
    pub fn toggle_selection(&mut self, item: &Item) -> bool {
        if let Some(index) = self.position(item) {
            self.selected.remove(index);
            return false;
        }

        if !self.options.multi_select {
            self.selected.clear();
        }
        self.selected.push(item.clone());
        true
    }

    /// Clears the selection if every row is selected, otherwise selects all
    /// current rows.
    pub fn toggle_select_all(&mut self) {
        if self.selected.len() == self.items.len() {
            self.selected.clear();
        } else {
            self.selected = self.items.clone();
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Selects the current rows whose key is in `keys`, replacing the
    /// selection. Unknown keys are ignored.
    pub fn select_where<'a>(&mut self, keys: impl IntoIterator<Item = &'a Key>) {
        let keys: HashSet<&Key> = keys.into_iter().collect();
        let mut selected: Vec<Item> = self
            .items
            .iter()
            .filter(|item| keys.contains(&self.unique_key(item)))
            .cloned()
            .collect();

        if !self.options.multi_select {
            selected.truncate(1);
        }
        self.selected = selected;
    }

    /// Every row is selected and there is at least one.
    pub fn all_selected(&self) -> bool {
        !self.items.is_empty() && self.selected.len() == self.items.len()
    }

    /// Some, but not all, rows are selected.
    pub fn some_selected(&self) -> bool {
        !self.selected.is_empty() && !self.all_selected()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::KeyExtractor;
    use crate::model::Value;

    fn row(id: i64, team: &str) -> Item {
        Item::new().set("id", id).set("team", team)
    }

    fn grouped() -> TableSelection {
        let mut table = TableSelection::new(SelectionOptions::new().with_group_by("team"));
        table.set_items(vec![row(1, "b"), row(2, "a"), row(3, "b")]);
        table
    }

    #[test]
    fn test_grouping_is_sorted_and_stable() {
        let table = grouped();
        let groups = table.groups();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, Key::from("a"));
        assert_eq!(groups[0].count(), 1);
        assert_eq!(groups[1].key, Key::from("b"));
        assert_eq!(groups[1].items, vec![row(1, "b"), row(3, "b")]);
        assert_eq!(groups[1].label, "b (2 records)");
    }

    #[test]
    fn test_without_group_rule_single_group() {
        let mut table = TableSelection::new(SelectionOptions::new());
        table.set_items(vec![row(1, "x"), row(2, "y")]);

        assert_eq!(table.groups().len(), 1);
        assert_eq!(table.groups()[0].key, Key::from(""));
        assert_eq!(table.groups()[0].count(), 2);
    }

    #[test]
    fn test_toggle_selection_round_trip() {
        let mut table = grouped();
        let item = row(1, "b");

        assert!(table.toggle_selection(&item));
        assert!(table.is_selected(&item));
        assert!(!table.toggle_selection(&item));
        assert!(table.selected().is_empty());
    }

    #[test]
    fn test_selection_unique_by_key() {
        let mut table = grouped();
        table.toggle_selection(&row(1, "b"));
        // Same id, different payload: the same row.
        assert!(table.is_selected(&row(1, "changed")));
        table.toggle_selection(&row(1, "changed"));
        assert_eq!(table.selected_count(), 0);
    }

    #[test]
    fn test_single_select_replaces() {
        let mut table = TableSelection::new(SelectionOptions::new().with_multi_select(false));
        table.set_items(vec![row(1, "a"), row(2, "a")]);

        table.toggle_selection(&row(1, "a"));
        table.toggle_selection(&row(2, "a"));
        assert_eq!(table.selected(), &[row(2, "a")]);
    }

    #[test]
    fn test_keyless_rows_compare_structurally() {
        let mut table = TableSelection::new(SelectionOptions::new());
        let a = Item::new().set("name", "a");
        let b = Item::new().set("name", "b");
        table.set_items(vec![a.clone(), b.clone()]);

        table.toggle_selection(&a);
        assert!(table.is_selected(&a));
        assert!(!table.is_selected(&b));
    }

    #[test]
    fn test_custom_unique_key() {
        let mut table = TableSelection::new(
            SelectionOptions::new().with_unique_key(KeyExtractor::func(|item| {
                Key::from(item.get("team").map(|v| v.to_string()).unwrap_or_default())
            })),
        );
        table.set_items(vec![row(1, "a"), row(2, "a")]);

        table.toggle_selection(&row(1, "a"));
        assert!(table.is_selected(&row(2, "a")));
    }

    #[test]
    fn test_tri_state() {
        let mut table = grouped();
        assert!(!table.all_selected());
        assert!(!table.some_selected());

        table.toggle_selection(&row(2, "a"));
        assert!(table.some_selected());

        table.toggle_select_all();
        assert!(table.all_selected());
        assert!(!table.some_selected());
        assert_eq!(table.selected_count(), 3);

        table.toggle_select_all();
        assert_eq!(table.selected_count(), 0);
    }

    #[test]
    fn test_empty_list_never_all_selected() {
        let mut table = TableSelection::new(SelectionOptions::new());
        table.set_items(Vec::new());
        table.toggle_select_all();
        assert!(!table.all_selected());
    }

    #[test]
    fn test_select_where() {
        let mut table = grouped();
        table.select_where(&[Key::Int(3), Key::Int(1), Key::Int(99)]);
        assert_eq!(table.selected(), &[row(1, "b"), row(3, "b")]);
    }

    #[test]
    fn test_toggle_group_survives_regroup() {
        let mut table = grouped();
        let b = Key::from("b");

        assert!(table.toggle_group(&b));
        assert!(table.group(&b).unwrap().is_expanded);
        assert!(table.is_group_expanded(&b));

        table.set_items(vec![row(4, "b"), row(5, "c")]);
        assert!(table.group(&b).unwrap().is_expanded);
        assert!(!table.group(&Key::from("c")).unwrap().is_expanded);

        assert!(!table.toggle_group(&b));
        assert!(!table.group(&b).unwrap().is_expanded);

        // Unknown key: only the set changes.
        table.toggle_group(&Key::from("zzz"));
        assert_eq!(table.groups().len(), 2);
    }

    #[test]
    fn test_expand_and_collapse_all() {
        let mut table = grouped();

        table.expand_all_groups();
        assert!(table.groups().iter().all(|g| g.is_expanded));
        assert_eq!(table.expanded_keys().len(), 2);

        table.collapse_all_groups();
        assert!(table.groups().iter().all(|g| !g.is_expanded));
        assert!(table.expanded_keys().is_empty());
    }

    #[test]
    fn test_default_expanded_reapplies_on_regroup() {
        let mut table = TableSelection::new(
            SelectionOptions::new()
                .with_group_by("team")
                .with_default_expanded(true),
        );
        table.set_items(vec![row(1, "a")]);
        assert!(table.groups()[0].is_expanded);

        assert!(!table.toggle_group(&Key::from("a")));
        assert!(!table.is_group_expanded(&Key::from("a")));

        table.set_items(vec![row(1, "a"), row(2, "b")]);
        assert!(table.groups().iter().all(|g| g.is_expanded));
        assert!(table.is_group_expanded(&Key::from("a")));
        assert!(table.is_group_expanded(&Key::from("b")));
    }

    #[test]
    fn test_missing_null_and_empty_share_one_group() {
        let mut table = TableSelection::new(SelectionOptions::new().with_group_by("team"));
        table.set_items(vec![
            Item::new().set("id", 1i64).set("team", ""),
            Item::new().set("id", 2i64),
            Item::new().set("id", 3i64).set("team", Value::Null),
        ]);

        assert_eq!(table.groups().len(), 1);
        let group = &table.groups()[0];
        assert_eq!(group.key, Key::Text(String::new()));
        assert_eq!(group.count(), 3);
        assert_eq!(group.label, " (3 records)");
    }

    #[test]
    fn test_group_label_template() {
        let mut table = TableSelection::new(
            SelectionOptions::new()
                .with_group_by("team")
                .with_group_label("{key}: {count}"),
        );
        table.set_items(vec![row(1, "a"), row(2, "a")]);
        assert_eq!(table.groups()[0].label, "a: 2");
    }
}
