//! Selection configuration

use crate::model::KeyExtractor;

/// Group label template; `{key}` and `{count}` are substituted.
pub const DEFAULT_GROUP_LABEL: &str = "{key} ({count} records)";

/// Configuration for a [`TableSelection`](super::TableSelection).
///
/// # Example
///
/// ```
/// use datatable_lib::selection::SelectionOptions;
///
/// let options = SelectionOptions::new()
///     .with_multi_select(false)
///     .with_unique_key("code")
///     .with_group_by("department.name")
///     .with_default_expanded(true);
/// assert!(!options.multi_select);
/// ```
#[derive(Debug, Clone)]
pub struct SelectionOptions {
    /// Allow more than one selected row.
    ///
    /// Default: true
    pub multi_select: bool,

    /// Identity rule for rows. Falls back to the `id` field when unset.
    pub unique_key: Option<KeyExtractor>,

    /// Grouping rule. Without one every row lands in a single group keyed
    /// by the empty string, as do rows whose group value is missing or null.
    pub group_by: Option<KeyExtractor>,

    /// Force every group expanded whenever the item list changes.
    ///
    /// Default: false
    pub default_expanded: bool,

    /// Label template for group headers.
    pub group_label: String,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            multi_select: true,
            unique_key: None,
            group_by: None,
            default_expanded: false,
            group_label: DEFAULT_GROUP_LABEL.to_string(),
        }
    }
}

impl SelectionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_multi_select(mut self, multi_select: bool) -> Self {
        self.multi_select = multi_select;
        self
    }

    pub fn with_unique_key(mut self, key: impl Into<KeyExtractor>) -> Self {
        self.unique_key = Some(key.into());
        self
    }

    pub fn with_group_by(mut self, key: impl Into<KeyExtractor>) -> Self {
        self.group_by = Some(key.into());
        self
    }

    pub fn with_default_expanded(mut self, expanded: bool) -> Self {
        self.default_expanded = expanded;
        self
    }

    pub fn with_group_label(mut self, template: impl Into<String>) -> Self {
        self.group_label = template.into();
        self
    }
}
