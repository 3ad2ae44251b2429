//! Row action resolver
//!
//! Assembles the ordered list of per-row controls from an [`ActionConfig`]
//! and owns the dialog state those controls open. Navigation and downloads
//! are never performed here; activating such an action returns a
//! [`Delegation`] for the presentation layer to carry out.

mod config;
mod descriptor;
mod dialog;
mod resolver;

pub use config::*;
pub use descriptor::*;
pub use dialog::Dialog;
pub use resolver::ActionResolver;
