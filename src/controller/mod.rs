//! Filter-driven controllers that keep fetched results consistent with the
//! latest user input.
//!
//! Both controllers follow the same shape: handlers mutate state under a short
//! synchronous lock, issue fetches as Tokio tasks tagged with a sequence
//! number, and apply a response only when it belongs to the newest fetch.
//! Every state change is published on a [`tokio::sync::watch`] channel.

pub mod statistics;
pub mod transactions;

pub use statistics::{StatisticsController, StatisticsView};
pub use transactions::{TransactionsController, TransactionsView};

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::config;
use crate::error::{CatalogError, Result};
use crate::models::{Month, PageSize};

// ---------------------------------------------------------------------------
// ControllerOptions
// ---------------------------------------------------------------------------

/// Settings shared by the transactions and statistics controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    /// How long the search-text channel must stay quiet before a fetch.
    pub quiet_period: Duration,
    pub default_month: Month,
    pub default_page_size: PageSize,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            quiet_period: config::DEFAULT_QUIET_PERIOD,
            default_month: Month::default(),
            default_page_size: PageSize::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// FetchSequence
// ---------------------------------------------------------------------------

/// Monotonic tag for issued fetches; only the latest tag may apply a response.
#[derive(Debug, Default)]
pub(crate) struct FetchSequence {
    latest: u64,
}

impl FetchSequence {
    pub(crate) fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub(crate) fn is_current(&self, seq: u64) -> bool {
        seq == self.latest
    }
}

// ---------------------------------------------------------------------------
// Debouncer
// ---------------------------------------------------------------------------

/// A single cancellable delayed callback.
///
/// Scheduling again aborts the pending timer. The generation number handed to
/// the callback lets the receiver ignore a timer that woke up just before it
/// was cancelled.
#[derive(Debug, Default)]
pub(crate) struct Debouncer {
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub(crate) fn schedule<F>(&mut self, runtime: &Handle, delay: Duration, fire: F)
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.cancel();
        let generation = self.generation;
        self.pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            fire(generation);
        }));
    }

    pub(crate) fn cancel(&mut self) {
        self.generation += 1;
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }

    /// Claim a fired timer. Returns `false` if it was superseded.
    pub(crate) fn take_fired(&mut self, generation: u64) -> bool {
        if self.pending.is_some() && generation == self.generation {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

pub(crate) fn current_runtime() -> Result<Handle> {
    Handle::try_current().map_err(|e| {
        CatalogError::Runtime(format!(
            "controllers must be started inside a Tokio runtime: {}",
            e
        ))
    })
}
