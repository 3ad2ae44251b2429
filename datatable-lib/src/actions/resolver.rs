//! Action list assembly and dialog transitions

use super::ActionConfig;
use super::ActionKind;
use super::CrudAction;
use super::CustomAction;
use super::Delegation;
use super::Dialog;
use super::RowAction;
use crate::model::Item;

const ICON_VIEW: &str = "mdi-eye";
const ICON_EDIT: &str = "mdi-pencil";
const ICON_DELETE: &str = "mdi-delete";
const ICON_ROUTE: &str = "mdi-arrow-right";
const ICON_DOWNLOAD: &str = "mdi-file-download";
const ICON_CUSTOM: &str = "mdi-cog";

/// Resolves per-row actions and tracks the dialog they open.
///
/// Actions come from five sources, always in this order: CRUD (view, edit,
/// delete), routes, downloads, custom actions whose condition holds, and
/// custom buttons.
///
/// # Example
///
/// ```
/// use datatable_lib::actions::{ActionConfig, ActionResolver, CrudAction};
/// use datatable_lib::model::Item;
///
/// let mut actions = ActionResolver::new(
///     ActionConfig::new().with_crud([CrudAction::Edit, CrudAction::Delete]),
/// );
/// let row = Item::new().set("id", 3i64);
///
/// let resolved = actions.actions_for(&row);
/// let labels: Vec<_> = resolved.iter().map(|a| a.label.as_str()).collect();
/// assert_eq!(labels, ["Edit", "Delete"]);
///
/// actions.activate(&resolved[1], &row);
/// assert_eq!(actions.item_to_delete(), Some(&row));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ActionResolver {
    config: ActionConfig,
    dialog: Dialog,
}

impl ActionResolver {
    pub fn new(config: ActionConfig) -> Self {
        Self {
            config,
            dialog: Dialog::Closed,
        }
    }

    pub fn config(&self) -> &ActionConfig {
        &self.config
    }

    /// See [`ActionConfig::has_any_actions`].
    pub fn has_any_actions(&self) -> bool {
        self.config.has_any_actions()
    }

    // =========================================================================
    // Assembly
    // =========================================================================

    /// Builds the ordered action list for one row.
    pub fn actions_for(&self, item: &Item) -> Vec<RowAction> {
        let config = &self.config;
        let mut actions = Vec::new();

        if config.allows(CrudAction::View) {
            actions.push(RowAction::builtin("View", "info", ICON_VIEW, ActionKind::View));
        }
        if config.allows(CrudAction::Edit) {
            actions.push(RowAction::builtin("Edit", "primary", ICON_EDIT, ActionKind::Edit));
        }
        if config.allows(CrudAction::Delete) {
            actions.push(RowAction::builtin("Delete", "error", ICON_DELETE, ActionKind::Delete));
        }

        if let Some(routes) = &config.routes {
            for (name, target) in routes.for_item(item) {
                actions.push(RowAction::builtin(
                    capitalize(&name),
                    "secondary",
                    ICON_ROUTE,
                    ActionKind::Route { name, target },
                ));
            }
        }

        for (name, url) in &config.downloads {
            actions.push(RowAction::builtin(
                format!("Download {name}"),
                "success",
                ICON_DOWNLOAD,
                ActionKind::Download {
                    name: name.clone(),
                    url: url.clone(),
                },
            ));
        }

        for action in config.custom_actions.iter().filter(|a| a.applies_to(item)) {
            actions.push(RowAction::builtin(
                action.title.clone(),
                "primary",
                ICON_CUSTOM,
                ActionKind::Custom(action.clone()),
            ));
        }

        let buttons = match &config.custom_buttons_fn {
            Some(generate) => generate(item),
            None => config.custom_buttons.clone(),
        };
        actions.extend(buttons.into_iter().map(|button| RowAction {
            label: button.label,
            color: button.color,
            icon: button.icon,
            outlined: button.outlined,
            rounded: button.rounded,
            tooltip: button.tooltip,
            enabled: button.enabled,
            kind: ActionKind::Button(button.on_click),
        }));

        actions
    }

    /// Returns `true` if `action` is offered for `item`.
    pub fn should_show_action(&self, action: &CustomAction, item: &Item) -> bool {
        action.applies_to(item)
    }

    /// Performs a click on `action` for `item`.
    ///
    /// Dialog kinds open their dialog and custom buttons run their handler.
    /// Routes and downloads are returned for the caller to carry out.
    /// Disabled actions do nothing.
    pub fn activate(&mut self, action: &RowAction, item: &Item) -> Option<Delegation> {
        if !action.is_enabled(item) {
            log::debug!("Ignoring disabled action {}", action.label);
            return None;
        }

        match &action.kind {
            ActionKind::View | ActionKind::Edit => self.open_dialog(Some(item)),
            ActionKind::Delete => self.open_delete_dialog(item),
            ActionKind::Custom(custom) => self.open_action_dialog(custom.clone(), item),
            ActionKind::Button(handler) => handler(item),
            ActionKind::Route { name, target } => {
                return Some(Delegation::Navigate {
                    name: name.clone(),
                    target: target.clone(),
                    item: item.clone(),
                });
            }
            ActionKind::Download { name, url } => {
                return Some(Delegation::Download {
                    name: name.clone(),
                    url: url.clone(),
                    item: item.clone(),
                });
            }
        }
        None
    }

    // =========================================================================
    // Dialogs
    //
    // Opening a dialog replaces whichever one is open.
    // =========================================================================

    /// Opens the create form, or the edit form when `item` is given.
    pub fn open_dialog(&mut self, item: Option<&Item>) {
        let item = item.cloned();
        self.dialog = Dialog::Form {
            editing: item.is_some(),
            form_model: item.clone().unwrap_or_default(),
            item: item.unwrap_or_default(),
        };
    }

    pub fn open_delete_dialog(&mut self, item: &Item) {
        self.dialog = Dialog::DeleteConfirm { item: item.clone() };
    }

    pub fn open_action_dialog(&mut self, action: CustomAction, item: &Item) {
        self.dialog = Dialog::CustomAction {
            action,
            item: item.clone(),
            form_model: item.clone(),
        };
    }

    /// Closes any dialog and drops its form state.
    pub fn reset_dialogs(&mut self) {
        self.dialog = Dialog::Closed;
    }

    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    /// The create/edit form is open.
    pub fn is_form_open(&self) -> bool {
        self.dialog.is_form()
    }

    pub fn is_delete_dialog_open(&self) -> bool {
        self.dialog.is_delete_confirm()
    }

    pub fn is_action_dialog_open(&self) -> bool {
        self.dialog.is_custom_action()
    }

    pub fn is_editing(&self) -> bool {
        self.dialog.is_editing()
    }

    pub fn edited_item(&self) -> Option<&Item> {
        self.dialog.edited_item()
    }

    pub fn form_model(&self) -> Option<&Item> {
        self.dialog.form_model()
    }

    pub fn form_model_mut(&mut self) -> Option<&mut Item> {
        self.dialog.form_model_mut()
    }

    pub fn item_to_delete(&self) -> Option<&Item> {
        self.dialog.item_to_delete()
    }

    pub fn current_action(&self) -> Option<&CustomAction> {
        self.dialog.current_action()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::actions::CustomButton;
    use crate::actions::RouteMap;
    use crate::model::Value;

    fn row(id: i64, status: &str) -> Item {
        Item::new().set("id", id).set("status", status)
    }

    fn labels(actions: &[RowAction]) -> Vec<&str> {
        actions.iter().map(|a| a.label.as_str()).collect()
    }

    #[test]
    fn test_precedence_and_filtered_custom_action() {
        let resolver = ActionResolver::new(
            ActionConfig::new()
                .with_crud([CrudAction::Delete, CrudAction::Edit])
                .with_route("history", "/orders/history")
                .with_custom_action(CustomAction::new("refund", "Refund").when(|_| false)),
        );

        let actions = resolver.actions_for(&row(1, "open"));
        assert_eq!(labels(&actions), vec!["Edit", "Delete", "History"]);
        assert_eq!(actions[1].color.as_deref(), Some("error"));
        assert_eq!(actions[2].color.as_deref(), Some("secondary"));
    }

    #[test]
    fn test_all_sources_in_order() {
        let resolver = ActionResolver::new(
            ActionConfig::new()
                .with_crud([CrudAction::Create, CrudAction::View])
                .with_route("details", "/d")
                .with_download("invoice", "/invoice.pdf")
                .with_custom_action(
                    CustomAction::new("close", "Close").when(|item| {
                        item.get_string("status").ok().flatten() == Some("open")
                    }),
                )
                .with_custom_button(CustomButton::new("Ping", |_| {})),
        );

        let open = resolver.actions_for(&row(1, "open"));
        assert_eq!(
            labels(&open),
            vec!["View", "Details", "Download invoice", "Close", "Ping"]
        );

        let closed = resolver.actions_for(&row(2, "closed"));
        assert_eq!(labels(&closed), vec!["View", "Details", "Download invoice", "Ping"]);
    }

    #[test]
    fn test_buttons_fn_replaces_static_buttons() {
        let resolver = ActionResolver::new(
            ActionConfig::new()
                .with_custom_button(CustomButton::new("Static", |_| {}))
                .with_custom_buttons_fn(|item| {
                    let id = item.get_int("id").ok().flatten().unwrap_or_default();
                    vec![CustomButton::new(format!("Row {id}"), |_| {})]
                }),
        );

        assert_eq!(labels(&resolver.actions_for(&row(7, "x"))), vec!["Row 7"]);
    }

    #[test]
    fn test_per_row_routes() {
        let resolver = ActionResolver::new(ActionConfig::new().with_routes_fn(|item| {
            let mut routes = RouteMap::new();
            if item.get_string("status").ok().flatten() == Some("open") {
                routes.insert("track".to_string(), "/track".to_string());
            }
            routes
        }));

        assert_eq!(labels(&resolver.actions_for(&row(1, "open"))), vec!["Track"]);
        assert!(resolver.actions_for(&row(1, "done")).is_empty());
        assert!(resolver.has_any_actions());
    }

    #[test]
    fn test_has_any_actions_is_config_level() {
        assert!(!ActionResolver::default().has_any_actions());

        let conditional = ActionConfig::new()
            .with_custom_action(CustomAction::new("never", "Never").when(|_| false));
        assert!(conditional.has_any_actions());

        assert!(ActionConfig::new().with_crud([CrudAction::Create]).has_any_actions());
    }

    #[test]
    fn test_activate_opens_dialogs() {
        let mut resolver = ActionResolver::new(
            ActionConfig::new()
                .with_crud([CrudAction::Edit, CrudAction::Delete])
                .with_custom_action(CustomAction::new("refund", "Refund")),
        );
        let item = row(1, "open");
        let actions = resolver.actions_for(&item);

        assert_eq!(resolver.activate(&actions[0], &item), None);
        assert!(resolver.is_form_open());
        assert!(resolver.is_editing());
        assert_eq!(resolver.form_model(), Some(&item));

        // Opening another dialog replaces the form.
        resolver.activate(&actions[1], &item);
        assert!(!resolver.is_form_open());
        assert!(resolver.is_delete_dialog_open());
        assert_eq!(resolver.item_to_delete(), Some(&item));
        assert_eq!(resolver.edited_item(), None);

        resolver.activate(&actions[2], &item);
        assert!(resolver.is_action_dialog_open());
        assert_eq!(resolver.current_action().map(|a| a.id.as_str()), Some("refund"));

        resolver.reset_dialogs();
        assert_eq!(resolver.dialog(), &Dialog::Closed);
        assert!(resolver.form_model().is_none());
    }

    #[test]
    fn test_create_dialog_and_form_model_edits() {
        let mut resolver = ActionResolver::default();
        resolver.open_dialog(None);

        assert!(resolver.is_form_open());
        assert!(!resolver.is_editing());
        assert_eq!(resolver.edited_item(), Some(&Item::new()));

        if let Some(model) = resolver.form_model_mut() {
            model.insert("name", "New");
        }
        assert_eq!(
            resolver.form_model().and_then(|m| m.get("name")),
            Some(&Value::from("New"))
        );
    }

    #[test]
    fn test_activate_delegates_navigation_and_download() {
        let mut resolver = ActionResolver::new(
            ActionConfig::new()
                .with_route("details", "/orders/:id")
                .with_download("pdf", "/orders/export.pdf"),
        );
        let item = row(5, "open");
        let actions = resolver.actions_for(&item);

        assert_eq!(
            resolver.activate(&actions[0], &item),
            Some(Delegation::Navigate {
                name: "details".to_string(),
                target: "/orders/:id".to_string(),
                item: item.clone(),
            })
        );
        assert!(matches!(
            resolver.activate(&actions[1], &item),
            Some(Delegation::Download { ref url, .. }) if url == "/orders/export.pdf"
        ));
        assert!(!resolver.dialog().is_open());
    }

    #[test]
    fn test_buttons_run_handler_unless_disabled() {
        let clicks = Arc::new(AtomicUsize::new(0));
        let counter = clicks.clone();
        let mut resolver = ActionResolver::new(
            ActionConfig::new()
                .with_custom_button(CustomButton::new("Count", move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }))
                .with_custom_button(CustomButton::new("Off", |_| panic!("disabled")).disabled(true)),
        );
        let item = row(1, "open");
        let actions = resolver.actions_for(&item);

        resolver.activate(&actions[0], &item);
        resolver.activate(&actions[1], &item);
        assert_eq!(clicks.load(Ordering::SeqCst), 1);
        assert!(!actions[1].is_enabled(&item));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("edit"), "Edit");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("élan"), "Élan");
    }
}
