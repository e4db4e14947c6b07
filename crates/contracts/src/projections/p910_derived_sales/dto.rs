use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fully derived profitability figures of one order.
///
/// Every numeric field is always defined: inputs that fail to coerce count as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRow {
    pub date: NaiveDate,
    pub status: Option<String>,
    pub product: Option<String>,
    pub geography: Option<String>,

    /// Informational copies of the revenue variants, when mapped
    pub net_transfer_value: Option<f64>,
    pub transfer_value: Option<f64>,

    pub gross_revenue: f64,
    pub shipping_fee: f64,
    pub other_fee: f64,
    pub net_revenue: f64,
    pub quantity: f64,
    pub unit_cost: f64,
    pub total_cost: f64,
    pub ad_allocated: f64,
    pub profit_before_ads: f64,
    pub profit_after_ads: f64,
    pub margin_before_ads: f64,
    pub margin_after_ads: f64,
}

/// Filtered derived row set for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedRowsResponse {
    pub mapping_version: u32,
    /// Source rows dropped because their date did not parse
    pub excluded_rows: usize,
    pub rows: Vec<DerivedRow>,
}

/// Identity columns the operator wants in the exported file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportOptions {
    #[serde(default)]
    pub include_status: bool,
    #[serde(default)]
    pub include_product: bool,
    #[serde(default)]
    pub include_geography: bool,
}
