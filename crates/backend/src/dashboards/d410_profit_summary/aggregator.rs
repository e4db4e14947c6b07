use chrono::NaiveDate;
use contracts::dashboards::d410_profit_summary::{AggregateRow, GroupKey, Metric};
use contracts::projections::p910_derived_sales::DerivedRow;
use std::collections::{BTreeMap, HashMap};

use crate::projections::p910_derived_sales::projection_builder::margin;
use crate::shared::coercion::finite_or_zero;

/// Day series longer than this usually means an outlier date in the source
const LONG_DAY_SPAN: i64 = 3660;

/// Group the derived rows and compute `metrics` for every group.
///
/// `Day` yields one entry per calendar day between the first and last order, with
/// zero-valued entries for days without orders. The other keys yield one entry per
/// observed value, sorted by key; rows without a value share the empty key.
pub fn aggregate(rows: &[DerivedRow], group_key: GroupKey, metrics: &[Metric]) -> Vec<AggregateRow> {
    let groups = match group_key {
        GroupKey::Day => group_by_day(rows),
        GroupKey::Status => group_by_text(rows, |r| &r.status),
        GroupKey::Product => group_by_text(rows, |r| &r.product),
        GroupKey::Geography => group_by_text(rows, |r| &r.geography),
    };

    groups
        .into_iter()
        .map(|(key, members)| AggregateRow {
            key,
            values: metrics
                .iter()
                .map(|metric| (*metric, compute(&members, *metric)))
                .collect(),
        })
        .collect()
}

fn group_by_day(rows: &[DerivedRow]) -> Vec<(String, Vec<&DerivedRow>)> {
    let mut by_day: HashMap<NaiveDate, Vec<&DerivedRow>> = HashMap::new();
    for row in rows {
        by_day.entry(row.date).or_default().push(row);
    }

    let (Some(first), Some(last)) = (
        rows.iter().map(|r| r.date).min(),
        rows.iter().map(|r| r.date).max(),
    ) else {
        return Vec::new();
    };

    let span = (last - first).num_days();
    if span > LONG_DAY_SPAN {
        tracing::warn!(
            "Day series spans {} days ({} .. {}), check the source dates",
            span,
            first,
            last
        );
    }

    let mut result = Vec::with_capacity(span as usize + 1);
    let mut day = Some(first);
    while let Some(current) = day.filter(|d| *d <= last) {
        result.push((
            current.format("%Y-%m-%d").to_string(),
            by_day.remove(&current).unwrap_or_default(),
        ));
        day = current.succ_opt();
    }
    result
}

fn group_by_text<F>(rows: &[DerivedRow], field: F) -> Vec<(String, Vec<&DerivedRow>)>
where
    F: Fn(&DerivedRow) -> &Option<String>,
{
    let mut groups: BTreeMap<String, Vec<&DerivedRow>> = BTreeMap::new();
    for row in rows {
        let key = field(row).clone().unwrap_or_default();
        groups.entry(key).or_default().push(row);
    }
    groups.into_iter().collect()
}

fn sum<F: Fn(&DerivedRow) -> f64>(rows: &[&DerivedRow], f: F) -> f64 {
    finite_or_zero(rows.iter().map(|r| f(r)).sum())
}

fn mean<F: Fn(&DerivedRow) -> f64>(rows: &[&DerivedRow], f: F) -> f64 {
    if rows.is_empty() {
        0.0
    } else {
        sum(rows, f) / rows.len() as f64
    }
}

/// One statistic over one group
pub fn compute(rows: &[&DerivedRow], metric: Metric) -> f64 {
    match metric {
        Metric::OrderCount => rows.len() as f64,
        Metric::GrossRevenue => sum(rows, |r| r.gross_revenue),
        Metric::ShippingFee => sum(rows, |r| r.shipping_fee),
        Metric::OtherFee => sum(rows, |r| r.other_fee),
        Metric::NetRevenue => sum(rows, |r| r.net_revenue),
        Metric::Quantity => sum(rows, |r| r.quantity),
        Metric::TotalCost => sum(rows, |r| r.total_cost),
        Metric::AdAllocated => sum(rows, |r| r.ad_allocated),
        Metric::ProfitBeforeAds => sum(rows, |r| r.profit_before_ads),
        Metric::ProfitAfterAds => sum(rows, |r| r.profit_after_ads),
        Metric::MeanMarginBeforeAds => mean(rows, |r| r.margin_before_ads),
        Metric::MeanMarginAfterAds => mean(rows, |r| r.margin_after_ads),
        Metric::PooledMarginBeforeAds => margin(
            sum(rows, |r| r.profit_before_ads),
            sum(rows, |r| r.net_revenue),
        ),
        Metric::PooledMarginAfterAds => margin(
            sum(rows, |r| r.profit_after_ads),
            sum(rows, |r| r.net_revenue),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::coercion::parse_date;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    fn row(date: NaiveDate, status: Option<&str>, net: f64, profit: f64) -> DerivedRow {
        DerivedRow {
            date,
            status: status.map(str::to_string),
            product: None,
            geography: None,
            net_transfer_value: None,
            transfer_value: None,
            gross_revenue: net,
            shipping_fee: 0.0,
            other_fee: 0.0,
            net_revenue: net,
            quantity: 1.0,
            unit_cost: 0.0,
            total_cost: net - profit,
            ad_allocated: 0.0,
            profit_before_ads: profit,
            profit_after_ads: profit,
            margin_before_ads: margin(profit, net),
            margin_after_ads: margin(profit, net),
        }
    }

    #[test]
    fn test_day_series_is_contiguous() {
        let rows = vec![
            row(day(28), None, 10.0, 5.0),
            row(day(26), None, 20.0, 5.0),
            row(day(28), None, 30.0, 5.0),
        ];
        let series = aggregate(
            &rows,
            GroupKey::Day,
            &[Metric::OrderCount, Metric::NetRevenue, Metric::MeanMarginAfterAds],
        );

        let keys: Vec<&str> = series.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["2024-02-26", "2024-02-27", "2024-02-28"]);
        assert_eq!(series[0].value(Metric::NetRevenue), 20.0);
        assert_eq!(series[1].value(Metric::OrderCount), 0.0);
        assert_eq!(series[1].value(Metric::NetRevenue), 0.0);
        assert_eq!(series[1].value(Metric::MeanMarginAfterAds), 0.0);
        assert_eq!(series[2].value(Metric::OrderCount), 2.0);
        assert_eq!(series[2].value(Metric::NetRevenue), 40.0);
    }

    #[test]
    fn test_day_series_crosses_month_end() {
        let rows = vec![row(day(28), None, 1.0, 1.0), row(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(), None, 1.0, 1.0)];
        let series = aggregate(&rows, GroupKey::Day, &[Metric::OrderCount]);
        // 2024 is a leap year
        assert_eq!(series.len(), 4);
        assert_eq!(series[1].key, "2024-02-29");
        assert!(aggregate(&[], GroupKey::Day, &[Metric::OrderCount]).is_empty());
    }

    #[test]
    fn test_short_year_dates_keep_series_small() {
        let rows: Vec<DerivedRow> = ["01/05/24", "2024-01-06"]
            .iter()
            .map(|raw| row(parse_date(raw).unwrap(), None, 1.0, 1.0))
            .collect();
        let series = aggregate(&rows, GroupKey::Day, &[Metric::OrderCount]);
        let keys: Vec<&str> = series.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["2024-01-05", "2024-01-06"]);
    }

    #[test]
    fn test_sums_never_overflow_to_infinity() {
        let rows = vec![row(day(1), None, f64::MAX, 0.0), row(day(1), None, f64::MAX, 0.0)];
        let groups = aggregate(&rows, GroupKey::Status, &[Metric::NetRevenue]);
        assert_eq!(groups[0].value(Metric::NetRevenue), 0.0);
    }

    #[test]
    fn test_group_by_status_without_zero_fill() {
        let rows = vec![
            row(day(1), Some("Returned"), 10.0, -2.0),
            row(day(1), Some("Delivered"), 20.0, 5.0),
            row(day(5), None, 5.0, 1.0),
            row(day(5), Some("Delivered"), 30.0, 6.0),
        ];
        let groups = aggregate(&rows, GroupKey::Status, &[Metric::OrderCount, Metric::ProfitAfterAds]);

        let keys: Vec<&str> = groups.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["", "Delivered", "Returned"]);
        assert_eq!(groups[1].value(Metric::OrderCount), 2.0);
        assert_eq!(groups[1].value(Metric::ProfitAfterAds), 11.0);
    }

    #[test]
    fn test_mean_and_pooled_margins_differ() {
        // margins 50% and 10% → mean 30%; pooled (5 + 10) / (10 + 100) → 13.63..%
        let rows = vec![row(day(1), None, 10.0, 5.0), row(day(1), None, 100.0, 10.0)];
        let groups = aggregate(
            &rows,
            GroupKey::Status,
            &[Metric::MeanMarginBeforeAds, Metric::PooledMarginBeforeAds],
        );
        let mean = groups[0].value(Metric::MeanMarginBeforeAds);
        let pooled = groups[0].value(Metric::PooledMarginBeforeAds);
        assert!((mean - 30.0).abs() < 1e-9);
        assert!((pooled - 15.0 / 110.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_pooled_margin_zero_without_revenue() {
        let rows = vec![row(day(1), None, -5.0, -11.0)];
        let groups = aggregate(&rows, GroupKey::Product, &[Metric::PooledMarginAfterAds]);
        assert_eq!(groups[0].value(Metric::PooledMarginAfterAds), 0.0);
    }
}
