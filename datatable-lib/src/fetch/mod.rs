//! Paginated fetch controller
//!
//! Owns the request/response cycle against a paginated list endpoint:
//!
//! - [`ListController`] - page window, loading/error flags, load-more and
//!   debounced refetch on query changes
//! - [`ListState`] - the observable snapshot, published through a
//!   `tokio::sync::watch` channel
//! - [`PageState`] / [`ListResponse`] - pagination metadata and the
//!   `{data, meta}` response envelope
//! - [`Debouncer`] - trailing-edge coalescing of rapid triggers

mod controller;
mod debounce;
mod options;
mod page;

pub use controller::FetchOutcome;
pub use controller::ListController;
pub use controller::ListState;
pub use controller::ListStatus;
pub use debounce::Debouncer;
pub use options::ListOptions;
pub use options::DEFAULT_DEBOUNCE;
pub use options::DEFAULT_PAGE_SIZE;
pub use page::ListResponse;
pub use page::PageMeta;
pub use page::PageState;
