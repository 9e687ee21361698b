use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CategoryCount / PriceRangeCount — precomputed buckets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRangeCount {
    pub range: String,
    pub count: u64,
}

// ---------------------------------------------------------------------------
// ChartSeries — parallel label/value vectors ready for a chart widget
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

// ---------------------------------------------------------------------------
// StatisticsSnapshot — aggregation result for one month filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSnapshot {
    pub total_sale_amount: f64,
    pub total_sold_items: u64,
    pub total_not_sold_items: u64,
    pub category_statistics: Vec<CategoryCount>,
    pub price_range_statistics: Vec<PriceRangeCount>,
}

impl StatisticsSnapshot {
    pub fn total_items(&self) -> u64 {
        self.total_sold_items + self.total_not_sold_items
    }

    /// Category distribution in server order.
    pub fn category_series(&self) -> ChartSeries {
        ChartSeries {
            labels: self
                .category_statistics
                .iter()
                .map(|c| c.category.clone())
                .collect(),
            values: self.category_statistics.iter().map(|c| c.count).collect(),
        }
    }

    /// Price-bucket histogram in server order.
    pub fn price_range_series(&self) -> ChartSeries {
        ChartSeries {
            labels: self
                .price_range_statistics
                .iter()
                .map(|r| r.range.clone())
                .collect(),
            values: self.price_range_statistics.iter().map(|r| r.count).collect(),
        }
    }
}
