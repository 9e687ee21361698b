//! Month-filtered aggregation statistics.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::watch;

use super::{current_runtime, ControllerOptions, FetchSequence};
use crate::api::CatalogApi;
use crate::error::Result;
use crate::models::{Month, StatisticsSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsView {
    pub month: Month,
    /// `None` until the first successful fetch.
    pub snapshot: Option<StatisticsSnapshot>,
    pub is_loading: bool,
    pub last_error: Option<String>,
}

struct State {
    month: Month,
    snapshot: Option<StatisticsSnapshot>,
    sequence: FetchSequence,
    loading: bool,
    last_error: Option<String>,
}

impl State {
    fn view(&self) -> StatisticsView {
        StatisticsView {
            month: self.month,
            snapshot: self.snapshot.clone(),
            is_loading: self.loading,
            last_error: self.last_error.clone(),
        }
    }
}

struct Shared {
    api: Arc<dyn CatalogApi>,
    runtime: Handle,
    state: Mutex<State>,
    updates: watch::Sender<StatisticsView>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &State) {
        self.updates.send_replace(state.view());
    }

    fn issue_fetch(self: &Arc<Self>, state: &mut State) {
        let seq = state.sequence.issue();
        let month = state.month;
        state.loading = true;
        tracing::debug!(seq, month = month.number(), "issuing statistics fetch");

        let api = Arc::clone(&self.api);
        let shared = Arc::downgrade(self);
        self.runtime.spawn(async move {
            let result = api.fetch_statistics(month).await;
            if let Some(shared) = shared.upgrade() {
                shared.complete(seq, result);
            }
        });
    }

    fn complete(&self, seq: u64, result: Result<StatisticsSnapshot>) {
        let mut state = self.lock();
        if !state.sequence.is_current(seq) {
            tracing::trace!(seq, "discarding stale statistics response");
            return;
        }
        state.loading = false;
        match result {
            Ok(snapshot) => {
                state.snapshot = Some(snapshot);
                state.last_error = None;
            }
            Err(e) => {
                tracing::warn!(seq, error = %e, "statistics fetch failed; keeping previous snapshot");
                state.last_error = Some(e.to_string());
            }
        }
        self.publish(&state);
    }
}

/// Holds the aggregation snapshot for the selected month.
///
/// Every month change fetches immediately; overlapping fetches resolve to
/// whichever was issued last.
#[derive(Clone)]
pub struct StatisticsController {
    shared: Arc<Shared>,
}

impl StatisticsController {
    /// Create the controller and fetch statistics for the default month.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(api: Arc<dyn CatalogApi>, options: ControllerOptions) -> Result<Self> {
        let runtime = current_runtime()?;
        let state = State {
            month: options.default_month,
            snapshot: None,
            sequence: FetchSequence::default(),
            loading: false,
            last_error: None,
        };
        let (updates, _) = watch::channel(state.view());
        let shared = Arc::new(Shared {
            api,
            runtime,
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

    pub fn set_month(&self, month: Month) {
        let mut state = self.shared.lock();
        state.month = month;
        self.shared.issue_fetch(&mut state);
        self.shared.publish(&state);
    }

    pub fn refresh(&self) {
        let mut state = self.shared.lock();
        self.shared.issue_fetch(&mut state);
        self.shared.publish(&state);
    }

    pub fn view(&self) -> StatisticsView {
        self.shared.lock().view()
    }

    pub fn subscribe(&self) -> watch::Receiver<StatisticsView> {
        self.shared.updates.subscribe()
    }

    pub fn month(&self) -> Month {
        self.shared.lock().month
    }

    pub fn snapshot(&self) -> Option<StatisticsSnapshot> {
        self.shared.lock().snapshot.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.lock().loading
    }
}
