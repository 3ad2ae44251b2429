//! List controller configuration

use std::time::Duration;

use crate::error::GENERIC_FETCH_ERROR;
use crate::transport::QueryParams;

/// Page size used when none (or zero) is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Window for coalescing query-parameter changes into one refetch.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Configuration for a [`ListController`](super::ListController).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use datatable_lib::fetch::ListOptions;
/// use datatable_lib::transport::QueryParams;
///
/// let options = ListOptions::new("/api/users")
///     .with_page_size(25)
///     .with_query_params(QueryParams::new().with("status", "active"))
///     .with_auto_fetch(false);
/// assert_eq!(options.debounce, Duration::from_millis(300));
/// ```
#[derive(Debug, Clone)]
pub struct ListOptions {
    /// Resource path of the list endpoint.
    pub resource: String,

    /// Static query parameters sent with every request.
    pub query_params: QueryParams,

    /// Items per page.
    ///
    /// Default: 10
    pub page_size: usize,

    /// Fetch on construction and refetch when query parameters change.
    ///
    /// Default: true
    pub auto_fetch: bool,

    /// Debounce window for query-driven refetches.
    ///
    /// Default: 300 ms
    pub debounce: Duration,

    /// Error slot text when a failed response carries no message.
    pub error_message: String,
}

impl ListOptions {
    /// Creates options for the given resource with default values.
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            query_params: QueryParams::new(),
            page_size: DEFAULT_PAGE_SIZE,
            auto_fetch: true,
            debounce: DEFAULT_DEBOUNCE,
            error_message: GENERIC_FETCH_ERROR.to_string(),
        }
    }

    pub fn with_query_params(mut self, params: QueryParams) -> Self {
        self.query_params = params;
        self
    }

    /// Sets the page size; zero keeps the default.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size };
        self
    }

    pub fn with_auto_fetch(mut self, auto_fetch: bool) -> Self {
        self.auto_fetch = auto_fetch;
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = message.into();
        self
    }
}
