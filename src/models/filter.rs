use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::{CatalogError, Result};

const MONTH_LABELS: [&str; 13] = [
    "All",
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// ---------------------------------------------------------------------------
// Month — 0 means "all months", 1-12 a calendar month
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(u8);

impl Month {
    /// Sentinel for "no month filter".
    pub const ALL: Month = Month(0);

    pub fn new(month: u8) -> Result<Self> {
        if month <= 12 {
            Ok(Month(month))
        } else {
            Err(CatalogError::InvalidArgument(format!(
                "month must be between 0 and 12, got {}",
                month
            )))
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn is_all(self) -> bool {
        self.0 == 0
    }

    /// Menu label: `"All"` for the sentinel, otherwise the English month name.
    pub fn label(self) -> &'static str {
        MONTH_LABELS[self.0 as usize]
    }

    /// Every selectable month in menu order, starting with [`Month::ALL`].
    pub fn options() -> impl Iterator<Item = Month> {
        (0..=12).map(Month)
    }
}

impl Default for Month {
    fn default() -> Self {
        Month(config::DEFAULT_MONTH)
    }
}

impl TryFrom<u8> for Month {
    type Error = CatalogError;

    fn try_from(value: u8) -> Result<Self> {
        Month::new(value)
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> u8 {
        month.0
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// PageSize — number of records requested per page
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageSize {
    #[default]
    Ten,
    Twenty,
    Fifty,
}

impl PageSize {
    pub const OPTIONS: [PageSize; 3] = [PageSize::Ten, PageSize::Twenty, PageSize::Fifty];

    pub fn get(self) -> u32 {
        match self {
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
            PageSize::Fifty => 50,
        }
    }
}

impl TryFrom<u32> for PageSize {
    type Error = CatalogError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            10 => Ok(PageSize::Ten),
            20 => Ok(PageSize::Twenty),
            50 => Ok(PageSize::Fifty),
            other => Err(CatalogError::InvalidArgument(format!(
                "page size must be 10, 20 or 50, got {}",
                other
            ))),
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

// ---------------------------------------------------------------------------
// FilterState — everything that shapes a transactions query
// ---------------------------------------------------------------------------

/// Filter values owned by the transactions controller.
///
/// `page` is 1-based. Changing `search_text`, `month` or `page_size` through
/// the setters below always moves `page` back to 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub search_text: String,
    pub month: Month,
    pub page: u32,
    pub page_size: PageSize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(Month::default(), PageSize::default())
    }
}

impl FilterState {
    pub fn new(month: Month, page_size: PageSize) -> Self {
        Self {
            search_text: String::new(),
            month,
            page: 1,
            page_size,
        }
    }

    pub fn set_search_text(&mut self, text: &str) {
        self.search_text = text.to_string();
        self.page = 1;
    }

    pub fn set_month(&mut self, month: Month) {
        self.month = month;
        self.page = 1;
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.page = 1;
    }

    /// Snapshot of the outbound query for the current values.
    pub fn query(&self) -> TransactionQuery {
        TransactionQuery {
            search: self.search_text.clone(),
            month: self.month,
            page: self.page,
            limit: self.page_size.get(),
        }
    }
}

// ---------------------------------------------------------------------------
// TransactionQuery — immutable request captured when a fetch is issued
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionQuery {
    pub search: String,
    pub month: Month,
    pub page: u32,
    pub limit: u32,
}

impl TransactionQuery {
    /// Query-string pairs in the order the endpoint documents them.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("search", self.search.clone()),
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
            ("month", self.month.number().to_string()),
        ]
    }
}
