//! Column descriptors

use std::fmt;
use std::sync::Arc;

use crate::model::Item;
use crate::model::Value;

/// Cell formatter: `(row, cell value, row index) -> text`.
pub type Formatter = Arc<dyn Fn(&Item, &Value, usize) -> String + Send + Sync>;

/// Whole-cell render hook: `(row, row index) -> text`.
pub type RenderHook = Arc<dyn Fn(&Item, usize) -> String + Send + Sync>;

/// Maps a 0-based row position to the number shown in the index column.
pub type IndexFn = Arc<dyn Fn(usize) -> usize + Send + Sync>;

/// Row predicate used by the selection column.
pub type RowPredicate = Arc<dyn Fn(&Item, usize) -> bool + Send + Sync>;

/// What a column shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Row checkbox.
    Selection,
    /// Row number.
    Index,
    /// A caller-defined data column.
    Data,
    /// Per-row action buttons.
    Actions,
}

/// Horizontal alignment for column content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
}

/// Edge a column is pinned to while the rest scrolls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Pin {
    #[default]
    None,
    Left,
    Right,
}

/// Column width: a pixel count or any CSS length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Width {
    Px(u32),
    Css(String),
}

impl Width {
    /// Canonical CSS text; pixel counts get a `px` suffix.
    pub fn to_css(&self) -> String {
        match self {
            Width::Px(n) => format!("{n}px"),
            Width::Css(s) => s.clone(),
        }
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Width::Px(n) => write!(f, "{n}px"),
            Width::Css(s) => f.write_str(s),
        }
    }
}

impl From<u32> for Width {
    fn from(n: u32) -> Self {
        Width::Px(n)
    }
}

/// Negative counts clamp to zero.
impl From<i32> for Width {
    fn from(n: i32) -> Self {
        Width::Px(u32::try_from(n).unwrap_or(0))
    }
}

impl From<&str> for Width {
    fn from(s: &str) -> Self {
        Width::Css(s.to_string())
    }
}

impl From<String> for Width {
    fn from(s: String) -> Self {
        Width::Css(s)
    }
}

/// Caller-supplied column definition.
///
/// Every layout field is optional; unset fields take the normalizer's
/// defaults.
///
/// # Example
///
/// ```
/// use datatable_lib::columns::{Align, ColumnDef, Pin};
///
/// let name = ColumnDef::new("customer.name", "Customer")
///     .width(240)
///     .fixed(Pin::Left)
///     .sortable(true);
/// let total = ColumnDef::new("total", "Total").align(Align::End);
/// # let _ = (name, total);
/// ```
#[derive(Clone, Default)]
pub struct ColumnDef {
    /// Dotted field path of the cell value.
    pub key: Option<String>,
    pub title: String,
    pub align: Option<Align>,
    pub width: Option<Width>,
    pub min_width: Option<Width>,
    pub max_width: Option<Width>,
    pub fixed: Option<Pin>,
    pub sortable: Option<bool>,
    pub resizable: Option<bool>,
    pub show_overflow_tooltip: Option<bool>,
    pub hidden: bool,
    pub editable: bool,
    pub filterable: bool,
    pub formatter: Option<Formatter>,
    pub render: Option<RenderHook>,
}

impl ColumnDef {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            title: title.into(),
            ..Self::default()
        }
    }

    /// A column with no backing field; pair it with [`render`](Self::render).
    pub fn computed(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }

    pub fn width(mut self, width: impl Into<Width>) -> Self {
        self.width = Some(width.into());
        self
    }

    pub fn min_width(mut self, width: impl Into<Width>) -> Self {
        self.min_width = Some(width.into());
        self
    }

    pub fn max_width(mut self, width: impl Into<Width>) -> Self {
        self.max_width = Some(width.into());
        self
    }

    pub fn fixed(mut self, pin: Pin) -> Self {
        self.fixed = Some(pin);
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = Some(sortable);
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = Some(resizable);
        self
    }

    pub fn overflow_tooltip(mut self, show: bool) -> Self {
        self.show_overflow_tooltip = Some(show);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn editable(mut self) -> Self {
        self.editable = true;
        self
    }

    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    pub fn formatter<F>(mut self, f: F) -> Self
    where
        F: Fn(&Item, &Value, usize) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(f));
        self
    }

    /// Sets a prebuilt formatter, such as one from [`formatters`](super::formatters).
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn render<F>(mut self, f: F) -> Self
    where
        F: Fn(&Item, usize) -> String + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("width", &self.width)
            .field("fixed", &self.fixed)
            .field("hidden", &self.hidden)
            .finish_non_exhaustive()
    }
}

/// A normalized column, ready for rendering.
#[derive(Clone)]
pub struct Column {
    pub kind: ColumnKind,
    pub key: Option<String>,
    pub title: String,
    pub align: Align,
    /// Canonical CSS width.
    pub width: Option<String>,
    pub min_width: String,
    pub max_width: Option<String>,
    pub fixed: Pin,
    pub sortable: bool,
    pub resizable: bool,
    pub show_overflow_tooltip: bool,
    pub hidden: bool,
    pub editable: bool,
    pub filterable: bool,
    pub formatter: Option<Formatter>,
    pub render: Option<RenderHook>,
    /// Row numbering of an index column.
    pub index_fn: Option<IndexFn>,
    /// Row eligibility of a selection column.
    pub selectable: Option<RowPredicate>,
}

impl Column {
    pub fn is_fixed(&self) -> bool {
        self.fixed != Pin::None
    }

    /// Selection, index and actions columns are not backed by row data.
    pub fn is_synthetic(&self) -> bool {
        self.kind != ColumnKind::Data
    }

    /// Returns `true` if the row at `row_index` may be selected.
    pub fn is_row_selectable(&self, item: &Item, row_index: usize) -> bool {
        self.selectable
            .as_ref()
            .is_none_or(|predicate| predicate(item, row_index))
    }

    /// The row number an index column shows for a 0-based position.
    pub fn row_number(&self, row_index: usize) -> usize {
        match &self.index_fn {
            Some(f) => f(row_index),
            None => row_index + 1,
        }
    }

    /// Text of this column's cell for one row.
    ///
    /// A render hook wins over a formatter, which wins over the plain value.
    /// Selection cells and actions cells without a hook are empty.
    pub fn cell_text(&self, item: &Item, row_index: usize) -> String {
        if let Some(render) = &self.render {
            return render(item, row_index);
        }

        match self.kind {
            ColumnKind::Selection | ColumnKind::Actions => String::new(),
            ColumnKind::Index => self.row_number(row_index).to_string(),
            ColumnKind::Data => {
                let value = self
                    .key
                    .as_deref()
                    .and_then(|key| item.lookup(key))
                    .unwrap_or(&Value::Null);

                match &self.formatter {
                    Some(format) => format(item, value, row_index),
                    None => value.to_string(),
                }
            }
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("kind", &self.kind)
            .field("key", &self.key)
            .field("title", &self.title)
            .field("align", &self.align)
            .field("width", &self.width)
            .field("min_width", &self.min_width)
            .field("fixed", &self.fixed)
            .field("sortable", &self.sortable)
            .field("resizable", &self.resizable)
            .field("hidden", &self.hidden)
            .finish_non_exhaustive()
    }
}
