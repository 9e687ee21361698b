//! The remote catalog as consumed by the controllers.
//!
//! [`CatalogApi`] is the seam between the controllers and the transport.
//! [`HttpCatalogApi`] is the production implementation: plain JSON over
//! HTTP with a bounded request timeout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config;
use crate::error::{CatalogError, Result};
use crate::models::{Month, StatisticsSnapshot, TransactionPage, TransactionQuery};

/// Read-only query interface over the sales catalog.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetch one page of records matching `query`.
    async fn fetch_transactions(&self, query: &TransactionQuery) -> Result<TransactionPage>;

    /// Fetch the precomputed aggregation for `month`.
    async fn fetch_statistics(&self, month: Month) -> Result<StatisticsSnapshot>;
}

/// [`CatalogApi`] backed by the catalog's HTTP endpoints.
pub struct HttpCatalogApi {
    base_url: String,
    client: Client,
}

impl HttpCatalogApi {
    /// Create a client for the service rooted at `base_url`.
    ///
    /// Every request is bounded by `timeout`; an expired request surfaces as
    /// [`CatalogError::Http`].
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        reqwest::Url::parse(base_url).map_err(|e| {
            CatalogError::InvalidArgument(format!("invalid base URL '{}': {}", base_url, e))
        })?;
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` with `params` and decode the body as JSON.
    ///
    /// The body is read in full before decoding so a malformed payload is
    /// reported as [`CatalogError::Json`] rather than a transport failure.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = config::endpoint_url(&self.base_url, path);
        let resp = self.client.get(&url).query(params).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url,
            });
        }
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn fetch_transactions(&self, query: &TransactionQuery) -> Result<TransactionPage> {
        self.get_json(config::TRANSACTIONS_PATH, &query.to_params())
            .await
    }

    async fn fetch_statistics(&self, month: Month) -> Result<StatisticsSnapshot> {
        self.get_json(
            config::STATISTICS_PATH,
            &[("month", month.number().to_string())],
        )
        .await
    }
}
