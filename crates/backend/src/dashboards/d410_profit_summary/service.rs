use contracts::dashboards::d410_profit_summary::{
    AggregateRequest, AggregateRow, GroupKey, Metric, ProfitSummaryResponse,
};
use contracts::projections::p910_derived_sales::DerivedRow;
use std::cmp::Ordering;

use super::aggregator::aggregate;
use crate::projections::p910_derived_sales::projection_builder::DerivationError;
use crate::projections::p910_derived_sales::service::derive_session;
use crate::shared::indicators::metadata::ids;
use crate::shared::indicators::{IndicatorContext, INDICATOR_REGISTRY};
use crate::system::session::Session;

const TOP_N: usize = 10;

/// Breakdown sorted by net revenue (descending), first `n` groups
fn top_by_net_revenue(rows: &[DerivedRow], key: GroupKey, n: usize) -> Vec<AggregateRow> {
    let mut groups = aggregate(rows, key, &Metric::breakdown_defaults());
    groups.sort_by(|a, b| {
        b.value(Metric::NetRevenue)
            .partial_cmp(&a.value(Metric::NetRevenue))
            .unwrap_or(Ordering::Equal)
    });
    groups.truncate(n);
    groups
}

pub fn build_summary(rows: &[DerivedRow], mapping_version: u32) -> ProfitSummaryResponse {
    let ctx = IndicatorContext { rows };
    let indicators = INDICATOR_REGISTRY.compute(&ids::summary_set(), &ctx);

    ProfitSummaryResponse {
        mapping_version,
        order_count: rows.len(),
        indicators,
        daily: aggregate(rows, GroupKey::Day, &Metric::daily_defaults()),
        by_status: aggregate(rows, GroupKey::Status, &Metric::breakdown_defaults()),
        top_products: top_by_net_revenue(rows, GroupKey::Product, TOP_N),
        top_geographies: top_by_net_revenue(rows, GroupKey::Geography, TOP_N),
    }
}

/// Summary screen of a session, recomputed from its current settings
pub fn get_summary(session: &Session) -> Result<ProfitSummaryResponse, DerivationError> {
    let derivation = derive_session(session)?;
    Ok(build_summary(&derivation.rows, session.mapping.version))
}

/// Arbitrary series over the filtered derived rows
pub fn get_aggregate(
    session: &Session,
    request: &AggregateRequest,
) -> Result<Vec<AggregateRow>, DerivationError> {
    let derivation = derive_session(session)?;
    Ok(aggregate(&derivation.rows, request.group_key, &request.metrics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(day: u32, product: &str, net: f64, ads: f64) -> DerivedRow {
        DerivedRow {
            date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            status: Some("Delivered".to_string()),
            product: Some(product.to_string()),
            geography: None,
            net_transfer_value: None,
            transfer_value: None,
            gross_revenue: net,
            shipping_fee: 0.0,
            other_fee: 0.0,
            net_revenue: net,
            quantity: 1.0,
            unit_cost: 0.0,
            total_cost: 0.0,
            ad_allocated: ads,
            profit_before_ads: net,
            profit_after_ads: net - ads,
            margin_before_ads: 100.0,
            margin_after_ads: 0.0,
        }
    }

    #[test]
    fn test_summary_layout() {
        let mut rows: Vec<DerivedRow> = (0..12)
            .map(|i| row(1, &format!("P{:02}", i), 10.0 + i as f64, 0.0))
            .collect();
        rows.push(row(4, "P00", 100.0, 40.0));

        let summary = build_summary(&rows, 3);

        assert_eq!(summary.mapping_version, 3);
        assert_eq!(summary.order_count, 13);
        assert_eq!(summary.daily.len(), 4);
        assert_eq!(summary.by_status.len(), 1);
        assert_eq!(summary.top_products.len(), TOP_N);
        assert_eq!(summary.top_products[0].key, "P00");
        assert_eq!(summary.top_products[1].key, "P11");
        assert_eq!(summary.top_geographies.len(), 1);
        assert_eq!(summary.top_geographies[0].key, "");
        assert_eq!(summary.indicators.len(), ids::summary_set().len());

        let roas = summary
            .indicators
            .iter()
            .find(|v| v.id == ids::roas())
            .unwrap();
        let total_net: f64 = rows.iter().map(|r| r.net_revenue).sum();
        assert!((roas.value.unwrap() - total_net / 40.0).abs() < 1e-9);
    }
}
