//! Dynamic row model

mod item;
mod key;
mod value;

pub use item::*;
pub use key::*;
pub use value::*;
