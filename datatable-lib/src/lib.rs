//! Data table library
//!
//! Headless state for list views over a paginated REST resource: a fetch
//! controller for the remote page window, a selection and grouping engine,
//! a column normalizer and a per-row action resolver. The presentation layer
//! composes these; nothing here renders.

pub mod actions;
pub mod auth;
pub mod columns;
pub mod error;
pub mod fetch;
pub mod model;
pub mod selection;
pub mod transport;

mod client;
mod service;

pub use client::*;
pub use service::ResourceService;
