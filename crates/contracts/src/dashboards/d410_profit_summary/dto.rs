use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::shared::indicators::IndicatorValue;

/// Dimension of an aggregate series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    /// Calendar day; the series is contiguous (gaps are zero-filled)
    Day,
    Status,
    Product,
    Geography,
}

/// Statistic computed per group.
///
/// `MeanMargin*` is the mean of per-row margins; `PooledMargin*` is summed profit
/// over summed net revenue. The two are different numbers and are never substituted
/// for one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    OrderCount,
    GrossRevenue,
    ShippingFee,
    OtherFee,
    NetRevenue,
    Quantity,
    TotalCost,
    AdAllocated,
    ProfitBeforeAds,
    ProfitAfterAds,
    MeanMarginBeforeAds,
    MeanMarginAfterAds,
    PooledMarginBeforeAds,
    PooledMarginAfterAds,
}

impl Metric {
    /// Sums used by the daily chart series
    pub fn daily_defaults() -> Vec<Metric> {
        vec![
            Metric::OrderCount,
            Metric::NetRevenue,
            Metric::ProfitAfterAds,
            Metric::TotalCost,
            Metric::ShippingFee,
            Metric::OtherFee,
            Metric::AdAllocated,
        ]
    }

    /// Sums used by the status / product / geography breakdowns
    pub fn breakdown_defaults() -> Vec<Metric> {
        vec![
            Metric::OrderCount,
            Metric::NetRevenue,
            Metric::ProfitAfterAds,
        ]
    }
}

/// One group of an aggregate series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    /// `YYYY-MM-DD` for days, the observed value otherwise (empty when missing)
    pub key: String,
    pub values: BTreeMap<Metric, f64>,
}

impl AggregateRow {
    pub fn value(&self, metric: Metric) -> f64 {
        self.values.get(&metric).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateRequest {
    pub group_key: GroupKey,
    pub metrics: Vec<Metric>,
}

/// Everything the summary screen shows for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitSummaryResponse {
    pub mapping_version: u32,
    pub order_count: usize,
    pub indicators: Vec<IndicatorValue>,
    pub daily: Vec<AggregateRow>,
    pub by_status: Vec<AggregateRow>,
    pub top_products: Vec<AggregateRow>,
    pub top_geographies: Vec<AggregateRow>,
}
