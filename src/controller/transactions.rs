//! Search, month filter and pagination over the transactions endpoint.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;

use super::{current_runtime, ControllerOptions, Debouncer, FetchSequence};
use crate::api::CatalogApi;
use crate::error::Result;
use crate::models::{FilterState, Month, PageSize, TransactionPage};
use crate::pagination::{PageResult, ResultStore};

// ---------------------------------------------------------------------------
// TransactionsView
// ---------------------------------------------------------------------------

/// Everything a renderer needs to draw the transactions table.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionsView {
    pub filter: FilterState,
    /// `None` until the first successful fetch.
    pub result: Option<PageResult>,
    pub total_pages: u32,
    pub is_loading: bool,
    /// Message of the most recent failed fetch, cleared by the next success.
    pub last_error: Option<String>,
}

impl TransactionsView {
    pub fn has_next_page(&self) -> bool {
        self.filter.page < self.total_pages
    }

    pub fn has_previous_page(&self) -> bool {
        self.filter.page > 1
    }
}

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

struct State {
    filter: FilterState,
    store: ResultStore,
    sequence: FetchSequence,
    debounce: Debouncer,
    loading: bool,
    last_error: Option<String>,
}

impl State {
    fn total_pages(&self) -> u32 {
        self.store.total_pages(self.filter.page_size)
    }

    fn view(&self) -> TransactionsView {
        TransactionsView {
            filter: self.filter.clone(),
            result: self.store.current().cloned(),
            total_pages: self.total_pages(),
            is_loading: self.loading,
            last_error: self.last_error.clone(),
        }
    }
}

struct Shared {
    api: Arc<dyn CatalogApi>,
    runtime: Handle,
    quiet_period: Duration,
    state: Mutex<State>,
    updates: watch::Sender<TransactionsView>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &State) {
        self.updates.send_replace(state.view());
    }

    /// Issue a fetch for the current filter. Any pending debounced fetch is
    /// dropped since this query already carries the latest search text.
    fn issue_fetch(self: &Arc<Self>, state: &mut State) {
        state.debounce.cancel();
        let seq = state.sequence.issue();
        let query = state.filter.query();
        state.loading = true;

        tracing::debug!(
            seq,
            search = %query.search,
            month = query.month.number(),
            page = query.page,
            limit = query.limit,
            "issuing transactions fetch"
        );

        let api = Arc::clone(&self.api);
        let shared = Arc::downgrade(self);
        self.runtime.spawn(async move {
            let result = api.fetch_transactions(&query).await;
            if let Some(shared) = shared.upgrade() {
                shared.complete(seq, result);
            }
        });
    }

    fn debounce_elapsed(self: &Arc<Self>, generation: u64) {
        let mut state = self.lock();
        if !state.debounce.take_fired(generation) {
            return;
        }
        tracing::debug!(search = %state.filter.search_text, "search input settled");
        self.issue_fetch(&mut state);
        self.publish(&state);
    }

    fn complete(self: &Arc<Self>, seq: u64, result: Result<TransactionPage>) {
        let mut state = self.lock();
        if !state.sequence.is_current(seq) {
            tracing::trace!(seq, "discarding stale transactions response");
            return;
        }
        state.loading = false;

        match result {
            Ok(page) => {
                state.store.replace(page.transactions, page.total_count);
                state.last_error = None;

                let total_pages = state.total_pages();
                if state.filter.page > total_pages {
                    tracing::debug!(
                        page = state.filter.page,
                        total_pages,
                        "page past the end of the result set; clamping"
                    );
                    state.filter.page = total_pages;
                    self.issue_fetch(&mut state);
                }
            }
            Err(e) => {
                tracing::warn!(seq, error = %e, "transactions fetch failed; keeping previous page");
                state.last_error = Some(e.to_string());
            }
        }

        self.publish(&state);
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        if let Ok(state) = self.state.get_mut() {
            state.debounce.cancel();
        }
    }
}

// ---------------------------------------------------------------------------
// TransactionsController
// ---------------------------------------------------------------------------

/// Owns the transactions filter and keeps the displayed page in sync with it.
///
/// Month, page size and page changes fetch immediately. Search text changes
/// wait for the quiet period and only the last keystroke fetches. Responses
/// are applied only if they answer the most recently issued fetch, so a slow
/// response can never overwrite a fresher one.
///
/// The controller is a cheap handle; clones share the same state.
#[derive(Clone)]
pub struct TransactionsController {
    shared: Arc<Shared>,
}

impl TransactionsController {
    /// Create the controller and issue the initial fetch for the default
    /// filter.
    ///
    /// Must be called from within a Tokio runtime; fetches and timers are
    /// spawned on that runtime.
    pub fn start(api: Arc<dyn CatalogApi>, options: ControllerOptions) -> Result<Self> {
        let runtime = current_runtime()?;
        let state = State {
            filter: FilterState::new(options.default_month, options.default_page_size),
            store: ResultStore::new(),
            sequence: FetchSequence::default(),
            debounce: Debouncer::default(),
            loading: false,
            last_error: None,
        };
        let (updates, _) = watch::channel(state.view());
        let shared = Arc::new(Shared {
            api,
            runtime,
            quiet_period: options.quiet_period,
            state: Mutex::new(state),
            updates,
        });

        {
            let mut state = shared.lock();
            shared.issue_fetch(&mut state);
            shared.publish(&state);
        }

        Ok(Self { shared })
    }

    // -- Handlers ----------------------------------------------------------

    /// Update the search text and schedule a debounced fetch.
    pub fn set_search_text(&self, text: &str) {
        let mut state = self.shared.lock();
        state.filter.set_search_text(text);

        let shared = Arc::downgrade(&self.shared);
        state.debounce.schedule(
            &self.shared.runtime,
            self.shared.quiet_period,
            move |generation| {
                if let Some(shared) = shared.upgrade() {
                    shared.debounce_elapsed(generation);
                }
            },
        );
        self.shared.publish(&state);
    }

    pub fn set_month(&self, month: Month) {
        let mut state = self.shared.lock();
        state.filter.set_month(month);
        self.shared.issue_fetch(&mut state);
        self.shared.publish(&state);
    }

    pub fn set_page_size(&self, page_size: PageSize) {
        let mut state = self.shared.lock();
        state.filter.set_page_size(page_size);
        self.shared.issue_fetch(&mut state);
        self.shared.publish(&state);
    }

    /// Advance one page. Returns `false` (and fetches nothing) on the last page.
    pub fn next_page(&self) -> bool {
        let mut state = self.shared.lock();
        if state.filter.page >= state.total_pages() {
            return false;
        }
        state.filter.page += 1;
        self.shared.issue_fetch(&mut state);
        self.shared.publish(&state);
        true
    }

    /// Go back one page. Returns `false` (and fetches nothing) on page 1.
    pub fn previous_page(&self) -> bool {
        let mut state = self.shared.lock();
        if state.filter.page <= 1 {
            return false;
        }
        state.filter.page -= 1;
        self.shared.issue_fetch(&mut state);
        self.shared.publish(&state);
        true
    }

    /// Jump to `page`. Pages outside `1..=total_pages` and the current page
    /// are ignored.
    pub fn go_to_page(&self, page: u32) -> bool {
        let mut state = self.shared.lock();
        if page == 0 || page > state.total_pages() || page == state.filter.page {
            return false;
        }
        state.filter.page = page;
        self.shared.issue_fetch(&mut state);
        self.shared.publish(&state);
        true
    }

    /// Re-fetch the current page without changing any filter.
    pub fn refresh(&self) {
        let mut state = self.shared.lock();
        self.shared.issue_fetch(&mut state);
        self.shared.publish(&state);
    }

    // -- Observers ---------------------------------------------------------

    pub fn view(&self) -> TransactionsView {
        self.shared.lock().view()
    }

    /// Receive a fresh [`TransactionsView`] after every state change.
    pub fn subscribe(&self) -> watch::Receiver<TransactionsView> {
        self.shared.updates.subscribe()
    }

    pub fn filter(&self) -> FilterState {
        self.shared.lock().filter.clone()
    }

    pub fn total_pages(&self) -> u32 {
        self.shared.lock().total_pages()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.lock().loading
    }

    /// True while a search-text fetch is waiting for the quiet period.
    pub fn is_search_pending(&self) -> bool {
        self.shared.lock().debounce.is_pending()
    }
}
