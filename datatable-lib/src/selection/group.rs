//! Group records

use indexmap::IndexMap;

use crate::model::Item;
use crate::model::Key;

/// A display group: the rows sharing one group key.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: Key,
    pub label: String,
    /// Rows in the order they appear in the source list.
    pub items: Vec<Item>,
    pub is_expanded: bool,
}

impl Group {
    pub fn count(&self) -> usize {
        self.items.len()
    }
}

/// Renders a group label template.
pub(crate) fn render_label(template: &str, key: &Key, count: usize) -> String {
    template
        .replace("{key}", &key.to_string())
        .replace("{count}", &count.to_string())
}

/// Partitions items by key, keeping encounter order inside each bucket, and
/// returns the buckets sorted by key.
pub(crate) fn partition<'a, F>(items: impl IntoIterator<Item = &'a Item>, key_of: F) -> Vec<(Key, Vec<Item>)>
where
    F: Fn(&Item) -> Key,
{
    let mut buckets: IndexMap<Key, Vec<Item>> = IndexMap::new();
    for item in items {
        buckets.entry(key_of(item)).or_default().push(item.clone());
    }

    let mut groups: Vec<_> = buckets.into_iter().collect();
    // Stable sort; keys are unique so order is fully determined.
    groups.sort_by(|(a, _), (b, _)| a.cmp(b));
    groups
}
