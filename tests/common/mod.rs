//! Shared test fixtures for the sales catalog SDK integration tests.
//!
//! Provides `FakeCatalogApi`, a scripted in-memory [`CatalogApi`] with
//! per-request latency and injectable failures, and `serve_once()`, a
//! one-shot HTTP responder for exercising `HttpCatalogApi` over a real socket.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sales_catalog_sdk::{
    CatalogApi, CatalogError, CategoryCount, Month, PriceRangeCount, Record, RecordId, Result,
    StatisticsSnapshot, TransactionPage, TransactionQuery,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

// ---------------------------------------------------------------------------
// FakeCatalogApi
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailMode {
    None,
    Transport,
    Decode,
}

type TransactionLatency = Box<dyn Fn(&TransactionQuery) -> Duration + Send + Sync>;
type StatisticsLatency = Box<dyn Fn(Month) -> Duration + Send + Sync>;

pub struct FakeCatalogApi {
    total_count: AtomicU64,
    fail: Mutex<FailMode>,
    transaction_latency: Mutex<TransactionLatency>,
    statistics_latency: Mutex<StatisticsLatency>,
    transaction_calls: Mutex<Vec<TransactionQuery>>,
    statistics_calls: Mutex<Vec<Month>>,
}

impl FakeCatalogApi {
    /// A catalog holding `total_count` records for every filter, answering
    /// each request after 10ms.
    pub fn new(total_count: u64) -> Arc<Self> {
        Arc::new(Self {
            total_count: AtomicU64::new(total_count),
            fail: Mutex::new(FailMode::None),
            transaction_latency: Mutex::new(Box::new(|_| Duration::from_millis(10))),
            statistics_latency: Mutex::new(Box::new(|_| Duration::from_millis(10))),
            transaction_calls: Mutex::new(Vec::new()),
            statistics_calls: Mutex::new(Vec::new()),
        })
    }

    pub fn set_total_count(&self, total_count: u64) {
        self.total_count.store(total_count, Ordering::SeqCst);
    }

    /// Requests issued while a failure mode is set fail in that mode.
    pub fn set_failure(&self, mode: FailMode) {
        *self.fail.lock().unwrap() = mode;
    }

    pub fn set_transaction_latency<F>(&self, latency: F)
    where
        F: Fn(&TransactionQuery) -> Duration + Send + Sync + 'static,
    {
        *self.transaction_latency.lock().unwrap() = Box::new(latency);
    }

    pub fn set_statistics_latency<F>(&self, latency: F)
    where
        F: Fn(Month) -> Duration + Send + Sync + 'static,
    {
        *self.statistics_latency.lock().unwrap() = Box::new(latency);
    }

    pub fn transaction_calls(&self) -> Vec<TransactionQuery> {
        self.transaction_calls.lock().unwrap().clone()
    }

    pub fn last_transaction_call(&self) -> TransactionQuery {
        self.transaction_calls
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no transactions fetch was issued")
    }

    pub fn statistics_calls(&self) -> Vec<Month> {
        self.statistics_calls.lock().unwrap().clone()
    }

    fn failure(&self) -> Option<CatalogError> {
        match *self.fail.lock().unwrap() {
            FailMode::None => None,
            FailMode::Transport => Some(CatalogError::Status {
                status: 503,
                url: "http://fake/catalog".to_string(),
            }),
            FailMode::Decode => Some(CatalogError::Json(
                serde_json::from_str::<TransactionPage>("{\"transactions\":").unwrap_err(),
            )),
        }
    }
}

#[async_trait]
impl CatalogApi for FakeCatalogApi {
    async fn fetch_transactions(&self, query: &TransactionQuery) -> Result<TransactionPage> {
        self.transaction_calls.lock().unwrap().push(query.clone());
        let latency = (self.transaction_latency.lock().unwrap())(query);
        let failure = self.failure();
        let total_count = self.total_count.load(Ordering::SeqCst);

        tokio::time::sleep(latency).await;

        if let Some(err) = failure {
            return Err(err);
        }
        Ok(page_for(query, total_count))
    }

    async fn fetch_statistics(&self, month: Month) -> Result<StatisticsSnapshot> {
        self.statistics_calls.lock().unwrap().push(month);
        let latency = (self.statistics_latency.lock().unwrap())(month);
        let failure = self.failure();

        tokio::time::sleep(latency).await;

        if let Some(err) = failure {
            return Err(err);
        }
        Ok(snapshot_for(month))
    }
}

/// Records for one page. Ids encode the query so tests can tell which
/// response was applied: `"{search}|m{month}|p{page}|{index}"`.
pub fn page_for(query: &TransactionQuery, total_count: u64) -> TransactionPage {
    let limit = u64::from(query.limit);
    let skipped = u64::from(query.page.saturating_sub(1)) * limit;
    let on_page = total_count.saturating_sub(skipped).min(limit);

    let transactions = (0..on_page)
        .map(|i| Record {
            id: RecordId::new(format!(
                "{}|m{}|p{}|{}",
                query.search,
                query.month.number(),
                query.page,
                skipped + i
            )),
            title: format!("Item {}", skipped + i),
            description: format!("Matches '{}'", query.search),
            category: "electronics".to_string(),
            price: 19.99,
            sold: i % 2 == 0,
            image_ref: format!("https://img.example/{}.jpg", skipped + i),
            date_of_sale: None,
        })
        .collect();

    TransactionPage {
        transactions,
        total_count,
    }
}

/// Snapshot whose totals encode the month: `total_sale_amount = month * 100`.
pub fn snapshot_for(month: Month) -> StatisticsSnapshot {
    let m = u64::from(month.number());
    StatisticsSnapshot {
        total_sale_amount: m as f64 * 100.0,
        total_sold_items: m,
        total_not_sold_items: 12 - m,
        category_statistics: vec![
            CategoryCount {
                category: "electronics".to_string(),
                count: m,
            },
            CategoryCount {
                category: "jewelery".to_string(),
                count: 12 - m,
            },
        ],
        price_range_statistics: vec![
            PriceRangeCount {
                range: "0-100".to_string(),
                count: m,
            },
            PriceRangeCount {
                range: "901-above".to_string(),
                count: 1,
            },
        ],
    }
}

pub fn month(n: u8) -> Month {
    Month::new(n).unwrap()
}

/// Let every pending timer and fetch run to completion (the clock is paused,
/// so this returns immediately in real time).
pub async fn settle() {
    tokio::time::sleep(Duration::from_secs(10)).await;
}

// ---------------------------------------------------------------------------
// One-shot HTTP responder
// ---------------------------------------------------------------------------

/// Accept a single connection on a random local port, reply with `status`
/// and `body`, and yield the request line that was received.
///
/// Returns the base URL to point the client at.
pub async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request_head(&mut socket).await;
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        request.lines().next().unwrap_or_default().to_string()
    });

    (format!("http://{}", addr), handle)
}

/// Accept a single connection and never answer it.
pub async fn serve_silently() -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let _ = read_request_head(&mut socket).await;
        tokio::time::sleep(Duration::from_secs(30)).await;
    });
    (format!("http://{}", addr), handle)
}

async fn read_request_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}
