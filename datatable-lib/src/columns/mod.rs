//! Column definitions and header normalization
//!
//! Callers describe their data columns sparsely with [`ColumnDef`];
//! [`ColumnSet::normalize`] injects the synthetic selection, index and actions
//! columns, applies defaults, and answers the layout queries a renderer needs.

mod column;
pub mod formatters;
mod normalizer;

pub use column::*;
pub use normalizer::ColumnSet;
pub use normalizer::HeaderOptions;
pub use normalizer::DEFAULT_ACTIONS_WIDTH;
pub use normalizer::DEFAULT_INDEX_LABEL;
