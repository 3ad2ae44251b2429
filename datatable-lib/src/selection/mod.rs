//! Selection and grouping engine
//!
//! [`TableSelection`] tracks the selected rows of a table and partitions the
//! current item list into ordered, expandable [`Group`]s. It only reads the
//! items it is given; the fetch controller stays the single writer of the
//! item list.

mod engine;
mod group;
mod options;

pub use engine::TableSelection;
pub use group::Group;
pub use options::SelectionOptions;
pub use options::DEFAULT_GROUP_LABEL;
