//! List controller: page window, fetch lifecycle and reactive refetch.

use std::sync::Arc;

use tokio::sync::watch;

use super::Debouncer;
use super::ListOptions;
use super::ListResponse;
use super::PageState;
use crate::error::Error;
use crate::model::Item;
use crate::transport::QueryParams;
use crate::transport::Transport;

/// Observable state of a remote list.
///
/// Published as a whole through [`ListController::subscribe`]; the item list
/// is shared, so cloning a snapshot is cheap.
#[derive(Debug, Clone)]
pub struct ListState {
    /// Current rows. Replaced wholesale by a fetch, extended by load-more.
    pub items: Arc<Vec<Item>>,
    /// A request is in flight.
    pub loading: bool,
    /// Error slot text of the last failed request.
    pub error: Option<String>,
    /// More pages can be appended with load-more.
    pub has_more: bool,
    /// The in-flight request is a load-more. Only set together with `loading`.
    pub is_loading_more: bool,
    pub page: PageState,
    /// Caller query parameters sent with every request.
    pub query: QueryParams,
}

impl ListState {
    fn new(page_size: usize, query: QueryParams) -> Self {
        Self {
            items: Arc::new(Vec::new()),
            loading: false,
            error: None,
            has_more: true,
            is_loading_more: false,
            page: PageState::new(page_size),
            query,
        }
    }

    /// Where the list is in its `idle -> loading -> {idle, error}` cycle.
    pub fn status(&self) -> ListStatus {
        if self.loading {
            ListStatus::Loading
        } else if self.error.is_some() {
            ListStatus::Error
        } else {
            ListStatus::Idle
        }
    }

    /// `{page, per_page}` with the caller query overlaid.
    fn request_params(&self) -> QueryParams {
        QueryParams::new()
            .with("page", self.page.current_page)
            .with("per_page", self.page.items_per_page)
            .merged(&self.query)
    }

    fn finish(&mut self) {
        self.loading = false;
        self.is_loading_more = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStatus {
    Idle,
    Loading,
    Error,
}

/// What a fetch-like call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The item list was replaced with `count` rows.
    Replaced { count: usize },
    /// `count` rows were appended to the item list.
    Appended { count: usize },
    /// Nothing was requested: a request was already in flight, the target
    /// page was out of range, or there was nothing more to load.
    Skipped,
}

/// Owns the request/response cycle against one paginated list endpoint.
///
/// Cheap to clone; clones share state. Requests are self-excluding: while one
/// is in flight, [`fetch`](Self::fetch) and [`load_more`](Self::load_more)
/// return [`FetchOutcome::Skipped`] instead of queueing. Failures are reported
/// twice: as the error slot on [`ListState`] and as the returned `Err`.
///
/// # Example
///
/// ```ignore
/// let client = RestClient::builder().url("https://api.example.com").build()?;
/// let list = ListController::new(
///     Arc::new(client),
///     ListOptions::new("/users").with_auto_fetch(false),
/// );
///
/// list.fetch(QueryParams::new()).await?;
/// list.load_more().await?;
///
/// let mut updates = list.subscribe();
/// list.set_query_params(QueryParams::new().with("q", "smith"));
/// updates.changed().await?;
/// ```
#[derive(Clone)]
pub struct ListController {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    transport: Arc<dyn Transport>,
    resource: String,
    page_size: usize,
    auto_fetch: bool,
    error_message: String,
    state: watch::Sender<ListState>,
    debouncer: Debouncer,
}

impl ListController {
    /// Creates a controller for `options.resource`.
    ///
    /// With `auto_fetch` enabled, the first page is requested right away on
    /// the current tokio runtime.
    pub fn new(transport: Arc<dyn Transport>, options: ListOptions) -> Self {
        let state = ListState::new(options.page_size, options.query_params);
        let controller = Self {
            inner: Arc::new(ControllerInner {
                transport,
                resource: options.resource,
                page_size: options.page_size,
                auto_fetch: options.auto_fetch,
                error_message: options.error_message,
                state: watch::Sender::new(state),
                debouncer: Debouncer::new(options.debounce),
            }),
        };

        if controller.inner.auto_fetch {
            controller.spawn_initial_fetch();
        }

        controller
    }

    fn spawn_initial_fetch(&self) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            log::warn!(
                "No tokio runtime; initial fetch of {} not started",
                self.inner.resource
            );
            return;
        };

        let controller = self.clone();
        handle.spawn(async move {
            // The error is already in the state's error slot.
            let _ = controller.fetch(QueryParams::new()).await;
        });
    }

    // =========================================================================
    // State access
    // =========================================================================

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> ListState {
        self.inner.state.borrow().clone()
    }

    /// Returns a receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.inner.state.subscribe()
    }

    pub fn items(&self) -> Arc<Vec<Item>> {
        self.inner.state.borrow().items.clone()
    }

    pub fn page(&self) -> PageState {
        self.inner.state.borrow().page
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    pub fn resource(&self) -> &str {
        &self.inner.resource
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Requests the current page and replaces the item list.
    ///
    /// Sends `{page, per_page}`, then the caller query, then `extra`, each
    /// overriding the previous on a key collision. No-op while another
    /// request is in flight.
    pub async fn fetch(&self, extra: QueryParams) -> Result<FetchOutcome, Error> {
        let mut params = None;
        self.inner.state.send_if_modified(|s| {
            if s.loading {
                return false;
            }
            s.loading = true;
            s.error = None;
            params = Some(s.request_params().merged(&extra));
            true
        });

        let Some(params) = params else {
            log::debug!("Fetch of {} skipped: request in flight", self.inner.resource);
            return Ok(FetchOutcome::Skipped);
        };

        match self.request(&params).await {
            Ok(response) => {
                let count = response.data.len();
                let page_size = self.inner.page_size;
                self.inner.state.send_modify(|s| {
                    s.items = Arc::new(response.data);
                    match response.meta {
                        Some(meta) => {
                            s.page = meta.to_page_state(page_size);
                            s.has_more = meta.has_more();
                        }
                        None => s.has_more = false,
                    }
                    s.finish();
                });
                log::debug!("Fetched {} rows from {}", count, self.inner.resource);
                Ok(FetchOutcome::Replaced { count })
            }
            Err(err) => {
                self.fail(&err, None);
                log::error!("Error fetching {}: {}", self.inner.resource, err);
                Err(err)
            }
        }
    }

    /// Requests the next page and appends it to the item list.
    ///
    /// No-op while a request is in flight or when there are no more pages.
    /// On failure the page number is rolled back so the same page can be
    /// retried, and the item list is left untouched.
    pub async fn load_more(&self) -> Result<FetchOutcome, Error> {
        let mut started = None;
        self.inner.state.send_if_modified(|s| {
            if s.loading || !s.has_more {
                return false;
            }
            let previous_page = s.page.current_page;
            s.loading = true;
            s.is_loading_more = true;
            s.error = None;
            s.page.current_page += 1;
            started = Some((previous_page, s.request_params()));
            true
        });

        let Some((previous_page, params)) = started else {
            log::debug!("Load-more of {} skipped", self.inner.resource);
            return Ok(FetchOutcome::Skipped);
        };

        match self.request(&params).await {
            Ok(response) => {
                let count = response.data.len();
                self.inner.state.send_modify(|s| {
                    Arc::make_mut(&mut s.items).extend(response.data);
                    match response.meta {
                        Some(meta) => {
                            s.has_more = meta.has_more();
                            if let Some(total) = meta.total {
                                s.page.total_items = total;
                            }
                            if let Some(last) = meta.last_page.filter(|n| *n > 0) {
                                s.page.total_pages = last;
                            }
                        }
                        None => s.has_more = false,
                    }
                    s.finish();
                });
                log::debug!("Appended {} rows from {}", count, self.inner.resource);
                Ok(FetchOutcome::Appended { count })
            }
            Err(err) => {
                self.fail(&err, Some(previous_page));
                log::error!("Error loading more from {}: {}", self.inner.resource, err);
                Err(err)
            }
        }
    }

    /// Moves to page `page` and refetches.
    ///
    /// Pages outside `1..=total_pages` are ignored.
    pub async fn set_page(&self, page: usize) -> Result<FetchOutcome, Error> {
        let accepted = self.inner.state.send_if_modified(|s| {
            if !s.page.contains(page) {
                return false;
            }
            s.page.current_page = page;
            true
        });

        if !accepted {
            log::debug!("Page {} out of range for {}", page, self.inner.resource);
            return Ok(FetchOutcome::Skipped);
        }

        self.fetch(QueryParams::new()).await
    }

    /// Changes the page size, returns to the first page and refetches.
    ///
    /// A size of zero is ignored.
    pub async fn set_items_per_page(&self, size: usize) -> Result<FetchOutcome, Error> {
        if size == 0 {
            return Ok(FetchOutcome::Skipped);
        }

        self.inner.state.send_modify(|s| {
            s.page.items_per_page = size;
            s.page.current_page = 1;
        });

        self.fetch(QueryParams::new()).await
    }

    /// Refetches the current page with no extra parameters.
    pub async fn refresh(&self) -> Result<FetchOutcome, Error> {
        self.fetch(QueryParams::new()).await
    }

    /// Returns the caller query parameters.
    pub fn query_params(&self) -> QueryParams {
        self.inner.state.borrow().query.clone()
    }

    /// Replaces the caller query parameters.
    ///
    /// With `auto_fetch` enabled this schedules a debounced refetch; changes
    /// arriving within the window collapse into one request carrying the
    /// last parameters. An already in-flight request is not cancelled.
    pub fn set_query_params(&self, params: QueryParams) {
        self.inner.state.send_modify(|s| s.query = params.clone());

        if !self.inner.auto_fetch {
            return;
        }

        let weak = Arc::downgrade(&self.inner);
        self.inner.debouncer.schedule(async move {
            let Some(inner) = weak.upgrade() else { return };
            let controller = ListController { inner };
            if let Err(err) = controller.fetch(params).await {
                log::warn!("Debounced refetch of {} failed: {}", controller.resource(), err);
            }
        });
    }

    async fn request(&self, params: &QueryParams) -> Result<ListResponse, Error> {
        let body = self.inner.transport.get(&self.inner.resource, params).await?;
        Ok(ListResponse::parse(body)?)
    }

    fn fail(&self, err: &Error, rollback_page: Option<usize>) {
        let message = err.user_message(&self.inner.error_message);
        self.inner.state.send_modify(|s| {
            if let Some(page) = rollback_page {
                s.page.current_page = page;
            }
            s.error = Some(message);
            s.finish();
        });
    }
}
