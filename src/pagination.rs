//! Page math and the holder for the latest fetched page.

use crate::models::{PageSize, Record};

/// Number of pages needed to show `total_count` records, never less than 1.
pub fn total_pages(total_count: u64, page_size: PageSize) -> u32 {
    let size = u64::from(page_size.get());
    let pages = total_count.div_ceil(size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// One successfully fetched page and the total size of its result set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageResult {
    pub records: Vec<Record>,
    pub total_count: u64,
}

impl PageResult {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Holds the latest page applied by the transactions controller.
///
/// Starts absent so a never-fetched state can be told apart from an empty
/// result set. Each [`replace`](ResultStore::replace) swaps the page out
/// wholesale.
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    current: Option<PageResult>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, records: Vec<Record>, total_count: u64) {
        self.current = Some(PageResult {
            records,
            total_count,
        });
    }

    pub fn current(&self) -> Option<&PageResult> {
        self.current.as_ref()
    }

    pub fn total_count(&self) -> Option<u64> {
        self.current.as_ref().map(|p| p.total_count)
    }

    /// Page count for the stored total; 1 while nothing has been fetched.
    pub fn total_pages(&self, page_size: PageSize) -> u32 {
        total_pages(self.total_count().unwrap_or(0), page_size)
    }
}
