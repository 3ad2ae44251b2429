//! Action configuration

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::Enabled;
use super::ItemHandler;
use super::ItemPredicate;
use crate::model::Item;

/// Built-in record operations.
///
/// `Create` is a table-level operation; it enables the create button but
/// never shows up in a row's action list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrudAction {
    Create,
    View,
    Edit,
    Delete,
}

/// Route name to navigation target.
pub type RouteMap = IndexMap<String, String>;

/// Route actions: one fixed map, or a map computed per row.
#[derive(Clone)]
pub enum Routes {
    Static(RouteMap),
    PerRow(Arc<dyn Fn(&Item) -> RouteMap + Send + Sync>),
}

impl Routes {
    pub fn for_item(&self, item: &Item) -> RouteMap {
        match self {
            Routes::Static(map) => map.clone(),
            Routes::PerRow(f) => f(item),
        }
    }

    fn is_configured(&self) -> bool {
        match self {
            Routes::Static(map) => !map.is_empty(),
            Routes::PerRow(_) => true,
        }
    }
}

impl fmt::Debug for Routes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Routes::Static(map) => f.debug_tuple("Static").field(map).finish(),
            Routes::PerRow(_) => f.write_str("PerRow(..)"),
        }
    }
}

/// An action backed by its own dialog, e.g. "Assign owner".
///
/// `id` tells the presentation layer which form to show in the dialog.
#[derive(Clone)]
pub struct CustomAction {
    pub id: String,
    pub title: String,
    pub condition: Option<ItemPredicate>,
}

impl CustomAction {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            condition: None,
        }
    }

    /// Only offer the action for rows matching `condition`.
    pub fn when<F>(mut self, condition: F) -> Self
    where
        F: Fn(&Item) -> bool + Send + Sync + 'static,
    {
        self.condition = Some(Arc::new(condition));
        self
    }

    /// Returns `true` if the action applies to `item`.
    pub fn applies_to(&self, item: &Item) -> bool {
        self.condition.as_ref().is_none_or(|condition| condition(item))
    }
}

impl PartialEq for CustomAction {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.title == other.title
    }
}

impl fmt::Debug for CustomAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomAction")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("conditional", &self.condition.is_some())
            .finish()
    }
}

/// A caller-defined button with its own click handler.
#[derive(Clone)]
pub struct CustomButton {
    pub label: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub outlined: bool,
    pub rounded: bool,
    pub tooltip: Option<String>,
    pub enabled: Enabled,
    pub on_click: ItemHandler,
}

impl CustomButton {
    pub fn new<F>(label: impl Into<String>, on_click: F) -> Self
    where
        F: Fn(&Item) + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            color: None,
            icon: None,
            outlined: false,
            rounded: false,
            tooltip: None,
            enabled: Enabled::default(),
            on_click: Arc::new(on_click),
        }
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn outlined(mut self) -> Self {
        self.outlined = true;
        self
    }

    pub fn rounded(mut self) -> Self {
        self.rounded = true;
        self
    }

    pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.enabled = Enabled::Always(!disabled);
        self
    }

    /// Enable the button only for rows matching `predicate`.
    pub fn enabled_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Item) -> bool + Send + Sync + 'static,
    {
        self.enabled = Enabled::When(Arc::new(predicate));
        self
    }
}

impl fmt::Debug for CustomButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomButton")
            .field("label", &self.label)
            .field("color", &self.color)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

/// Generator replacing the static custom buttons for each row.
pub type ButtonsFn = Arc<dyn Fn(&Item) -> Vec<CustomButton> + Send + Sync>;

/// Sources of row actions for a table.
///
/// # Example
///
/// ```
/// use datatable_lib::actions::{ActionConfig, CrudAction, CustomAction};
///
/// let config = ActionConfig::new()
///     .with_crud([CrudAction::Edit, CrudAction::Delete])
///     .with_route("details", "/orders/:id")
///     .with_download("invoice", "/orders/invoice.pdf")
///     .with_custom_action(CustomAction::new("refund", "Refund"));
/// assert!(config.has_any_actions());
/// ```
#[derive(Clone, Default)]
pub struct ActionConfig {
    pub crud: Vec<CrudAction>,
    pub routes: Option<Routes>,
    pub downloads: IndexMap<String, String>,
    pub custom_actions: Vec<CustomAction>,
    pub custom_buttons: Vec<CustomButton>,
    /// When set, replaces `custom_buttons` entirely.
    pub custom_buttons_fn: Option<ButtonsFn>,
    /// Show a table-level refresh button.
    pub show_refresh_button: bool,
}

impl ActionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_crud(mut self, actions: impl IntoIterator<Item = CrudAction>) -> Self {
        self.crud = actions.into_iter().collect();
        self
    }

    /// Adds a static route; ignored once per-row routes are configured.
    pub fn with_route(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        match &mut self.routes {
            Some(Routes::Static(map)) => {
                map.insert(name.into(), target.into());
            }
            Some(Routes::PerRow(_)) => {}
            None => {
                let mut map = RouteMap::new();
                map.insert(name.into(), target.into());
                self.routes = Some(Routes::Static(map));
            }
        }
        self
    }

    pub fn with_routes_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&Item) -> RouteMap + Send + Sync + 'static,
    {
        self.routes = Some(Routes::PerRow(Arc::new(f)));
        self
    }

    pub fn with_download(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.downloads.insert(name.into(), url.into());
        self
    }

    pub fn with_custom_action(mut self, action: CustomAction) -> Self {
        self.custom_actions.push(action);
        self
    }

    pub fn with_custom_button(mut self, button: CustomButton) -> Self {
        self.custom_buttons.push(button);
        self
    }

    pub fn with_custom_buttons_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&Item) -> Vec<CustomButton> + Send + Sync + 'static,
    {
        self.custom_buttons_fn = Some(Arc::new(f));
        self
    }

    pub fn with_refresh_button(mut self, show: bool) -> Self {
        self.show_refresh_button = show;
        self
    }

    /// Returns `true` if `action` is in the CRUD allow-list.
    pub fn allows(&self, action: CrudAction) -> bool {
        self.crud.contains(&action)
    }

    /// Returns `true` if any source is configured.
    ///
    /// This looks at configuration only; per-row conditions are not
    /// evaluated, so a row may still end up with no actions.
    pub fn has_any_actions(&self) -> bool {
        !self.crud.is_empty()
            || self.routes.as_ref().is_some_and(Routes::is_configured)
            || !self.downloads.is_empty()
            || !self.custom_actions.is_empty()
            || !self.custom_buttons.is_empty()
            || self.custom_buttons_fn.is_some()
    }
}

impl fmt::Debug for ActionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionConfig")
            .field("crud", &self.crud)
            .field("routes", &self.routes)
            .field("downloads", &self.downloads)
            .field("custom_actions", &self.custom_actions)
            .field("custom_buttons", &self.custom_buttons)
            .field("custom_buttons_fn", &self.custom_buttons_fn.is_some())
            .field("show_refresh_button", &self.show_refresh_button)
            .finish()
    }
}
