//! Dialog state

use super::CustomAction;
use crate::model::Item;

/// The dialog a table currently shows. At most one is open at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Dialog {
    #[default]
    Closed,
    /// Create or edit form. `editing` is set when opened on an existing row.
    Form {
        editing: bool,
        item: Item,
        form_model: Item,
    },
    /// Delete confirmation for one row.
    DeleteConfirm { item: Item },
    /// Dialog of a custom action.
    CustomAction {
        action: CustomAction,
        item: Item,
        form_model: Item,
    },
}

impl Dialog {
    pub fn is_open(&self) -> bool {
        !matches!(self, Dialog::Closed)
    }

    pub fn is_form(&self) -> bool {
        matches!(self, Dialog::Form { .. })
    }

    pub fn is_delete_confirm(&self) -> bool {
        matches!(self, Dialog::DeleteConfirm { .. })
    }

    pub fn is_custom_action(&self) -> bool {
        matches!(self, Dialog::CustomAction { .. })
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Dialog::Form { editing: true, .. })
    }

    /// Row copy a form or custom action dialog was opened on.
    pub fn edited_item(&self) -> Option<&Item> {
        match self {
            Dialog::Form { item, .. } | Dialog::CustomAction { item, .. } => Some(item),
            _ => None,
        }
    }

    /// Working copy the form edits.
    pub fn form_model(&self) -> Option<&Item> {
        match self {
            Dialog::Form { form_model, .. } | Dialog::CustomAction { form_model, .. } => {
                Some(form_model)
            }
            _ => None,
        }
    }

    pub fn form_model_mut(&mut self) -> Option<&mut Item> {
        match self {
            Dialog::Form { form_model, .. } | Dialog::CustomAction { form_model, .. } => {
                Some(form_model)
            }
            _ => None,
        }
    }

    pub fn item_to_delete(&self) -> Option<&Item> {
        match self {
            Dialog::DeleteConfirm { item } => Some(item),
            _ => None,
        }
    }

    pub fn current_action(&self) -> Option<&CustomAction> {
        match self {
            Dialog::CustomAction { action, .. } => Some(action),
            _ => None,
        }
    }
}
