//! Header normalization

use std::fmt;
use std::sync::Arc;

use super::Align;
use super::Column;
use super::ColumnDef;
use super::ColumnKind;
use super::IndexFn;
use super::Pin;
use super::Width;
use crate::model::Item;

pub const DEFAULT_INDEX_LABEL: &str = "#";
pub const DEFAULT_ACTIONS_WIDTH: &str = "200px";

const SELECTION_WIDTH: u32 = 50;
const INDEX_WIDTH: u32 = 60;
const DEFAULT_MIN_WIDTH: u32 = 80;

/// Which synthetic columns to inject, and how.
///
/// # Example
///
/// ```
/// use datatable_lib::columns::HeaderOptions;
///
/// let options = HeaderOptions::new()
///     .with_selectable(true)
///     .with_index(true)
///     .with_actions(true)
///     .with_actions_width(160);
/// assert_eq!(options.index_label, "#");
/// ```
#[derive(Clone)]
pub struct HeaderOptions {
    /// Rows can be selected.
    ///
    /// Default: false
    pub selectable: bool,

    /// Show the checkbox column when rows are selectable.
    ///
    /// Default: true
    pub show_selection: bool,

    /// Show a row number column.
    ///
    /// Default: false
    pub show_index: bool,

    /// Title of the index column.
    ///
    /// Default: `#`
    pub index_label: String,

    /// Custom row numbering. Defaults to 1-based positions.
    pub index_fn: Option<IndexFn>,

    /// Append an actions column.
    ///
    /// Default: false
    pub has_actions: bool,

    /// Width of the actions column.
    ///
    /// Default: `200px`
    pub actions_width: Width,
}

impl Default for HeaderOptions {
    fn default() -> Self {
        Self {
            selectable: false,
            show_selection: true,
            show_index: false,
            index_label: DEFAULT_INDEX_LABEL.to_string(),
            index_fn: None,
            has_actions: false,
            actions_width: Width::from(DEFAULT_ACTIONS_WIDTH),
        }
    }
}

impl HeaderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    pub fn with_show_selection(mut self, show: bool) -> Self {
        self.show_selection = show;
        self
    }

    pub fn with_index(mut self, show: bool) -> Self {
        self.show_index = show;
        self
    }

    pub fn with_index_label(mut self, label: impl Into<String>) -> Self {
        self.index_label = label.into();
        self
    }

    pub fn with_index_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) -> usize + Send + Sync + 'static,
    {
        self.index_fn = Some(Arc::new(f));
        self
    }

    pub fn with_actions(mut self, has_actions: bool) -> Self {
        self.has_actions = has_actions;
        self
    }

    pub fn with_actions_width(mut self, width: impl Into<Width>) -> Self {
        self.actions_width = width.into();
        self
    }
}

impl fmt::Debug for HeaderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderOptions")
            .field("selectable", &self.selectable)
            .field("show_selection", &self.show_selection)
            .field("show_index", &self.show_index)
            .field("index_label", &self.index_label)
            .field("has_actions", &self.has_actions)
            .field("actions_width", &self.actions_width)
            .finish_non_exhaustive()
    }
}

/// The normalized, ordered column list of a table.
///
/// Synthetic columns always sit in the same places: selection first, index
/// second, caller columns next and actions last.
///
/// # Example
///
/// ```
/// use datatable_lib::columns::{ColumnDef, ColumnKind, ColumnSet, HeaderOptions};
///
/// let columns = ColumnSet::normalize(
///     vec![ColumnDef::new("name", "Name"), ColumnDef::new("email", "Email").width(220)],
///     &HeaderOptions::new().with_selectable(true).with_actions(true),
/// );
///
/// let kinds: Vec<_> = columns.iter().map(|c| c.kind).collect();
/// assert_eq!(
///     kinds,
///     [ColumnKind::Selection, ColumnKind::Data, ColumnKind::Data, ColumnKind::Actions]
/// );
/// assert_eq!(columns.column_by_key("email").unwrap().width.as_deref(), Some("220px"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ColumnSet {
    columns: Vec<Column>,
}

impl ColumnSet {
    /// Builds the render schema from caller definitions.
    pub fn normalize(defs: impl IntoIterator<Item = ColumnDef>, options: &HeaderOptions) -> Self {
        let mut columns = Vec::new();

        if options.selectable && options.show_selection {
            let mut column = finish(
                ColumnKind::Selection,
                ColumnDef::computed("")
                    .width(SELECTION_WIDTH)
                    .align(Align::Center)
                    .fixed(Pin::Left),
            );
            column.selectable = Some(Arc::new(|_: &Item, _: usize| true));
            columns.push(column);
        }

        if options.show_index {
            let mut column = finish(
                ColumnKind::Index,
                ColumnDef::computed(options.index_label.clone())
                    .width(INDEX_WIDTH)
                    .align(Align::Center)
                    .fixed(Pin::Left),
            );
            column.index_fn = options.index_fn.clone();
            columns.push(column);
        }

        columns.extend(defs.into_iter().map(|def| finish(ColumnKind::Data, def)));

        if options.has_actions {
            columns.push(finish(
                ColumnKind::Actions,
                ColumnDef::new("actions", "Actions")
                    .width(options.actions_width.clone())
                    .align(Align::Center)
                    .fixed(Pin::Right),
            ));
        }

        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// First column with the given key.
    pub fn column_by_key(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key.as_deref() == Some(key))
    }

    /// Position of the first column with the given key.
    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key.as_deref() == Some(key))
    }

    /// Columns not explicitly hidden.
    pub fn visible(&self) -> Vec<&Column> {
        self.filter(|c| !c.hidden)
    }

    /// Columns pinned to either edge.
    pub fn fixed(&self) -> Vec<&Column> {
        self.filter(Column::is_fixed)
    }

    pub fn left_fixed(&self) -> Vec<&Column> {
        self.filter(|c| c.fixed == Pin::Left)
    }

    pub fn right_fixed(&self) -> Vec<&Column> {
        self.filter(|c| c.fixed == Pin::Right)
    }

    /// Columns pinned to neither edge.
    pub fn scrollable(&self) -> Vec<&Column> {
        self.filter(|c| !c.is_fixed())
    }

    fn filter(&self, predicate: impl Fn(&Column) -> bool) -> Vec<&Column> {
        self.columns.iter().filter(|c| predicate(c)).collect()
    }
}

/// Applies column defaults; explicitly set fields win.
fn finish(kind: ColumnKind, def: ColumnDef) -> Column {
    Column {
        kind,
        key: def.key,
        title: def.title,
        align: def.align.unwrap_or_default(),
        width: def.width.map(|w| w.to_css()),
        min_width: def
            .min_width
            .unwrap_or(Width::Px(DEFAULT_MIN_WIDTH))
            .to_css(),
        max_width: def.max_width.map(|w| w.to_css()),
        fixed: def.fixed.unwrap_or_default(),
        sortable: def.sortable.unwrap_or(false),
        resizable: def.resizable.unwrap_or(true),
        show_overflow_tooltip: def.show_overflow_tooltip.unwrap_or(true),
        hidden: def.hidden,
        editable: def.editable,
        filterable: def.filterable,
        formatter: def.formatter,
        render: def.render,
        index_fn: None,
        selectable: None,
    }
}
