//! Resolved row actions

use std::fmt;
use std::sync::Arc;

use super::CustomAction;
use crate::model::Item;

/// Row predicate for enabling an action.
pub type ItemPredicate = Arc<dyn Fn(&Item) -> bool + Send + Sync>;

/// Click handler of a custom button.
pub type ItemHandler = Arc<dyn Fn(&Item) + Send + Sync>;

/// Whether an action can be clicked.
#[derive(Clone)]
pub enum Enabled {
    Always(bool),
    When(ItemPredicate),
}

impl Enabled {
    pub fn is_enabled(&self, item: &Item) -> bool {
        match self {
            Enabled::Always(enabled) => *enabled,
            Enabled::When(predicate) => predicate(item),
        }
    }
}

impl Default for Enabled {
    fn default() -> Self {
        Enabled::Always(true)
    }
}

impl fmt::Debug for Enabled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Enabled::Always(enabled) => f.debug_tuple("Always").field(enabled).finish(),
            Enabled::When(_) => f.write_str("When(..)"),
        }
    }
}

/// What clicking an action does.
#[derive(Clone)]
pub enum ActionKind {
    /// Opens the form dialog on the row.
    View,
    /// Opens the form dialog on the row for editing.
    Edit,
    /// Opens the delete confirmation.
    Delete,
    /// Navigation, delegated to the presentation layer.
    Route { name: String, target: String },
    /// File retrieval, delegated to the presentation layer.
    Download { name: String, url: String },
    /// Opens the custom action dialog.
    Custom(CustomAction),
    /// Runs a caller-supplied handler.
    Button(ItemHandler),
}

impl fmt::Debug for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::View => f.write_str("View"),
            Self::Edit => f.write_str("Edit"),
            Self::Delete => f.write_str("Delete"),
            Self::Route { name, target } => f
                .debug_struct("Route")
                .field("name", name)
                .field("target", target)
                .finish(),
            Self::Download { name, url } => f
                .debug_struct("Download")
                .field("name", name)
                .field("url", url)
                .finish(),
            Self::Custom(action) => f.debug_tuple("Custom").field(action).finish(),
            Self::Button(_) => f.write_str("Button(..)"),
        }
    }
}

/// One control in a row's action list.
#[derive(Debug, Clone)]
pub struct RowAction {
    pub label: String,
    /// Theme color name, e.g. `primary` or `error`.
    pub color: Option<String>,
    pub icon: Option<String>,
    pub outlined: bool,
    pub rounded: bool,
    pub tooltip: Option<String>,
    pub enabled: Enabled,
    pub kind: ActionKind,
}

impl RowAction {
    pub(crate) fn builtin(label: impl Into<String>, color: &str, icon: &str, kind: ActionKind) -> Self {
        Self {
            label: label.into(),
            color: Some(color.to_string()),
            icon: Some(icon.to_string()),
            outlined: true,
            rounded: false,
            tooltip: None,
            enabled: Enabled::default(),
            kind,
        }
    }

    pub fn is_enabled(&self, item: &Item) -> bool {
        self.enabled.is_enabled(item)
    }
}

/// Work an activated action hands to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Delegation {
    Navigate { name: String, target: String, item: Item },
    Download { name: String, url: String, item: Item },
}
