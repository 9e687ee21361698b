//! Sales catalog SDK for Rust.
//!
//! Provides controllers for browsing a remote catalog of sale records:
//! debounced keyword search, month filtering and page navigation over the
//! transactions endpoint, plus month-filtered aggregate statistics. The
//! controllers guarantee that the displayed page always matches the latest
//! filter, even when responses arrive out of order.
//!
//! # Quick start
//!
//! ```no_run
//! use sales_catalog_sdk::{CatalogSdk, Month};
//!
//! # async fn example() -> sales_catalog_sdk::Result<()> {
//! let sdk = CatalogSdk::builder()
//!     .base_url("http://localhost:3000")
//!     .build()?;
//!
//! // Starts with the default filter and fetches page 1
//! let transactions = sdk.transactions()?;
//! transactions.set_search_text("shirt");
//! transactions.set_month(Month::new(5)?);
//!
//! let mut updates = transactions.subscribe();
//! updates.changed().await.ok();
//! let view = updates.borrow().clone();
//! println!("page {} of {}", view.filter.page, view.total_pages);
//!
//! let stats = sdk.statistics()?;
//! stats.set_month(Month::ALL);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod pagination;

pub use api::{CatalogApi, HttpCatalogApi};
pub use controller::{
    ControllerOptions, StatisticsController, StatisticsView, TransactionsController,
    TransactionsView,
};
pub use error::{CatalogError, Result};
pub use models::{
    CategoryCount, ChartSeries, FilterState, Month, PageSize, PriceRangeCount, Record, RecordId,
    StatisticsSnapshot, TransactionPage, TransactionQuery,
};
pub use pagination::{total_pages, PageResult, ResultStore};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

// ---------------------------------------------------------------------------
// CatalogSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`CatalogSdk`] instance.
///
/// Use [`CatalogSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](CatalogSdkBuilder::build) to create the SDK.
pub struct CatalogSdkBuilder {
    base_url: Option<String>,
    timeout: Duration,
    options: ControllerOptions,
    api: Option<Arc<dyn CatalogApi>>,
}

impl Default for CatalogSdkBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: config::DEFAULT_TIMEOUT,
            options: ControllerOptions::default(),
            api: None,
        }
    }
}

impl CatalogSdkBuilder {
    /// Set the root URL of the catalog service.
    ///
    /// If not set, the `CATALOG_BACKEND_URL` environment variable is used,
    /// falling back to `http://localhost:3000`.
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }

    /// Set the HTTP request timeout. A request that exceeds it fails as a
    /// transport error and clears the loading flag.
    ///
    /// Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set how long search input must stay quiet before it is fetched.
    ///
    /// Defaults to 300 milliseconds.
    pub fn quiet_period(mut self, quiet_period: Duration) -> Self {
        self.options.quiet_period = quiet_period;
        self
    }

    /// Month selected when a controller starts. Defaults to March.
    pub fn default_month(mut self, month: Month) -> Self {
        self.options.default_month = month;
        self
    }

    /// Page size selected when the transactions controller starts.
    pub fn default_page_size(mut self, page_size: PageSize) -> Self {
        self.options.default_page_size = page_size;
        self
    }

    /// Use a custom [`CatalogApi`] instead of the HTTP client.
    ///
    /// `base_url` and `timeout` are ignored when a custom API is supplied.
    pub fn api(mut self, api: Arc<dyn CatalogApi>) -> Self {
        self.api = Some(api);
        self
    }

    /// Build the SDK. Nothing is fetched until a controller is started.
    pub fn build(self) -> Result<CatalogSdk> {
        let (api, base_url) = match self.api {
            Some(api) => (api, None),
            None => {
                let url = self.base_url.unwrap_or_else(config::default_base_url);
                let http = HttpCatalogApi::new(&url, self.timeout)?;
                let base_url = http.base_url().to_string();
                (Arc::new(http) as Arc<dyn CatalogApi>, Some(base_url))
            }
        };
        Ok(CatalogSdk {
            api,
            base_url,
            options: self.options,
        })
    }
}

// ---------------------------------------------------------------------------
// CatalogSdk
// ---------------------------------------------------------------------------

/// The main entry point for the sales catalog SDK.
///
/// Owns the [`CatalogApi`] and hands out controllers that share it.
///
/// Created via [`CatalogSdk::builder()`].
pub struct CatalogSdk {
    api: Arc<dyn CatalogApi>,
    base_url: Option<String>,
    options: ControllerOptions,
}

impl CatalogSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> CatalogSdkBuilder {
        CatalogSdkBuilder::default()
    }

    /// Start a transactions controller.
    ///
    /// The controller immediately fetches page 1 for the default filter.
    /// Must be called from within a Tokio runtime.
    pub fn transactions(&self) -> Result<TransactionsController> {
        TransactionsController::start(Arc::clone(&self.api), self.options)
    }

    /// Start a statistics controller for the default month.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn statistics(&self) -> Result<StatisticsController> {
        StatisticsController::start(Arc::clone(&self.api), self.options)
    }

    /// Return the shared [`CatalogApi`] for one-off queries.
    pub fn api(&self) -> Arc<dyn CatalogApi> {
        Arc::clone(&self.api)
    }

    pub fn options(&self) -> ControllerOptions {
        self.options
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for CatalogSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CatalogSdk(base_url={}, quiet_period={}ms, default_month={}, page_size={})",
            self.base_url.as_deref().unwrap_or("custom"),
            self.options.quiet_period.as_millis(),
            self.options.default_month.number(),
            self.options.default_page_size
        )
    }
}
