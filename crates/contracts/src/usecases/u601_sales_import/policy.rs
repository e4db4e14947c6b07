use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Whether fees reduce the revenue used for profit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeInclusion {
    /// net = gross - (shipping + other)
    SubtractBeforeProfit,
    /// net = gross
    IgnoreInProfit,
}

/// Where the unit cost of a row comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CostSource {
    /// The `UnitCost` role of the mapping
    Column,
    /// One purchase price for every article
    FixedValue { unit_cost: f64 },
    /// Lookup in the session cost table by product
    PerProductTable,
}

/// Per-order fees used when no fee column is mapped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeDefaults {
    pub shipping: f64,
    pub other: f64,
}

impl Default for FeeDefaults {
    fn default() -> Self {
        Self {
            shipping: 0.0,
            other: 0.0,
        }
    }
}

/// Weight used to spread an aggregate ad cost across orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationBasis {
    GrossRevenue,
    /// Every order weighs 1
    Uniform,
}

/// How advertising cost reaches the rows. Exactly one mode is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdSpendMode {
    None,
    /// Read from the `AdSpend` column of each row
    Column,
    /// One amount for the whole filtered period
    LumpSum { amount: f64, basis: AllocationBasis },
    /// The session ad-spend ledger, bucketed by calendar day
    Ledger { basis: AllocationBasis },
}

/// Date range (inclusive) and status multi-select
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowFilter {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Empty means "all statuses"
    #[serde(default)]
    pub statuses: Vec<String>,
}

/// Snapshot of every derivation setting the operator can change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivationPolicy {
    pub fee_inclusion: FeeInclusion,
    pub cost_source: CostSource,
    pub quantity_default: f64,
    pub fee_defaults: FeeDefaults,
    pub ad_spend: AdSpendMode,
    #[serde(default)]
    pub filter: RowFilter,
}

impl Default for DerivationPolicy {
    fn default() -> Self {
        Self {
            fee_inclusion: FeeInclusion::SubtractBeforeProfit,
            cost_source: CostSource::FixedValue { unit_cost: 0.0 },
            quantity_default: 1.0,
            fee_defaults: FeeDefaults::default(),
            ad_spend: AdSpendMode::None,
            filter: RowFilter::default(),
        }
    }
}

/// One line of an external advertising ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdSpendEntry {
    pub date: NaiveDate,
    pub amount: f64,
    pub channel: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_json_roundtrip_defaults() {
        let json = serde_json::to_value(DerivationPolicy::default()).unwrap();
        assert_eq!(json["fee_inclusion"], "subtract_before_profit");
        assert_eq!(json["cost_source"]["kind"], "fixed_value");
        assert_eq!(json["ad_spend"]["kind"], "none");

        let back: DerivationPolicy = serde_json::from_value(json).unwrap();
        assert_eq!(back, DerivationPolicy::default());
    }

    #[test]
    fn test_non_finite_numbers_are_rejected() {
        let base = serde_json::to_string(&DerivationPolicy::default()).unwrap();
        for bad in ["NaN", "Infinity", "1e999"] {
            let json = base.replace("\"quantity_default\":1.0", &format!("\"quantity_default\":{}", bad));
            assert_ne!(json, base);
            assert!(serde_json::from_str::<DerivationPolicy>(&json).is_err(), "{}", bad);

            let json = base.replace("\"shipping\":0.0", &format!("\"shipping\":{}", bad));
            assert_ne!(json, base);
            assert!(serde_json::from_str::<DerivationPolicy>(&json).is_err(), "{}", bad);
        }
    }
}
