use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Environment variable consulted when no base URL is given to the builder.
pub const BASE_URL_ENV: &str = "CATALOG_BACKEND_URL";

pub const TRANSACTIONS_PATH: &str = "transactions";
pub const STATISTICS_PATH: &str = "stats";

/// Month selected when a controller starts (March). `0` means all months.
pub const DEFAULT_MONTH: u8 = 3;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Quiet period the search-text channel must observe before fetching.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub fn default_base_url() -> String {
    match env::var(BASE_URL_ENV) {
        Ok(url) if !url.trim().is_empty() => url.trim().to_string(),
        _ => DEFAULT_BASE_URL.to_string(),
    }
}

/// Join a base URL and an endpoint path with exactly one slash between them.
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
