use contracts::projections::p910_derived_sales::DerivedRow;
use contracts::shared::indicators::*;

use super::IndicatorContext;
use crate::shared::indicators::metadata::ids;

// ---------------------------------------------------------------------------
// Internal aggregation
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct ProfitAgg {
    gross_revenue: f64,
    net_revenue: f64,
    profit_before_ads: f64,
    profit_after_ads: f64,
    ad_allocated: f64,
    margin_before_ads: f64,
    margin_after_ads: f64,
    order_count: usize,
}

fn fetch_agg(ctx: &IndicatorContext) -> ProfitAgg {
    ctx.rows.iter().fold(ProfitAgg::default(), |mut agg, row: &DerivedRow| {
        agg.gross_revenue += row.gross_revenue;
        agg.net_revenue += row.net_revenue;
        agg.profit_before_ads += row.profit_before_ads;
        agg.profit_after_ads += row.profit_after_ads;
        agg.ad_allocated += row.ad_allocated;
        agg.margin_before_ads += row.margin_before_ads;
        agg.margin_after_ads += row.margin_after_ads;
        agg.order_count += 1;
        agg
    })
}

fn sign_status(value: f64) -> IndicatorStatus {
    if value > 0.0 {
        IndicatorStatus::Good
    } else if value < 0.0 {
        IndicatorStatus::Bad
    } else {
        IndicatorStatus::Neutral
    }
}

fn value(id: IndicatorId, value: Option<f64>, status: IndicatorStatus) -> IndicatorValue {
    IndicatorValue {
        id,
        value,
        status,
        subtitle: None,
    }
}

fn mean(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

// ---------------------------------------------------------------------------
// Public compute functions
// ---------------------------------------------------------------------------

pub fn compute_gross_revenue(ctx: &IndicatorContext) -> IndicatorValue {
    let agg = fetch_agg(ctx);
    value(ids::gross_revenue(), Some(agg.gross_revenue), IndicatorStatus::Neutral)
}

pub fn compute_net_revenue(ctx: &IndicatorContext) -> IndicatorValue {
    let agg = fetch_agg(ctx);
    let mut v = value(ids::net_revenue(), Some(agg.net_revenue), IndicatorStatus::Neutral);
    if agg.gross_revenue != 0.0 {
        v.subtitle = Some(format!(
            "Fees: {:.2}",
            agg.gross_revenue - agg.net_revenue
        ));
    }
    v
}

pub fn compute_profit_before_ads(ctx: &IndicatorContext) -> IndicatorValue {
    let agg = fetch_agg(ctx);
    value(
        ids::profit_before_ads(),
        Some(agg.profit_before_ads),
        sign_status(agg.profit_before_ads),
    )
}

pub fn compute_profit_after_ads(ctx: &IndicatorContext) -> IndicatorValue {
    let agg = fetch_agg(ctx);
    value(
        ids::profit_after_ads(),
        Some(agg.profit_after_ads),
        sign_status(agg.profit_after_ads),
    )
}

pub fn compute_ads_allocated(ctx: &IndicatorContext) -> IndicatorValue {
    let agg = fetch_agg(ctx);
    value(ids::ads_allocated(), Some(agg.ad_allocated), IndicatorStatus::Neutral)
}

pub fn compute_order_count(ctx: &IndicatorContext) -> IndicatorValue {
    let agg = fetch_agg(ctx);
    value(
        ids::order_count(),
        Some(agg.order_count as f64),
        IndicatorStatus::Neutral,
    )
}

/// Net revenue per unit of ad spend; undefined without ad spend
pub fn compute_roas(ctx: &IndicatorContext) -> IndicatorValue {
    let agg = fetch_agg(ctx);
    if agg.ad_allocated == 0.0 {
        let mut v = value(ids::roas(), None, IndicatorStatus::Neutral);
        v.subtitle = Some("No ad spend".into());
        return v;
    }
    let roas = agg.net_revenue / agg.ad_allocated;
    let status = if roas >= 1.0 {
        IndicatorStatus::Good
    } else {
        IndicatorStatus::Warning
    };
    value(ids::roas(), Some(roas), status)
}

/// Ad spend per order; undefined without orders
pub fn compute_cpo(ctx: &IndicatorContext) -> IndicatorValue {
    let agg = fetch_agg(ctx);
    let cpo = (agg.order_count > 0).then(|| agg.ad_allocated / agg.order_count as f64);
    value(ids::cpo(), cpo, IndicatorStatus::Neutral)
}

pub fn compute_mean_margin_before_ads(ctx: &IndicatorContext) -> IndicatorValue {
    let agg = fetch_agg(ctx);
    let m = mean(agg.margin_before_ads, agg.order_count);
    value(ids::mean_margin_before_ads(), Some(m), sign_status(m))
}

pub fn compute_mean_margin_after_ads(ctx: &IndicatorContext) -> IndicatorValue {
    let agg = fetch_agg(ctx);
    let m = mean(agg.margin_after_ads, agg.order_count);
    value(ids::mean_margin_after_ads(), Some(m), sign_status(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(net: f64, ads: f64, margin: f64) -> DerivedRow {
        DerivedRow {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            status: None,
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
            total_cost: 0.0,
            ad_allocated: ads,
            profit_before_ads: net,
            profit_after_ads: net - ads,
            margin_before_ads: 100.0,
            margin_after_ads: margin,
        }
    }

    #[test]
    fn test_roas_and_cpo() {
        let rows = vec![row(100.0, 20.0, 80.0), row(200.0, 30.0, 85.0)];
        let ctx = IndicatorContext { rows: &rows };

        let roas = compute_roas(&ctx);
        assert!((roas.value.unwrap() - 6.0).abs() < 1e-9);
        assert_eq!(roas.status, IndicatorStatus::Good);

        let cpo = compute_cpo(&ctx);
        assert!((cpo.value.unwrap() - 25.0).abs() < 1e-9);

        let margin = compute_mean_margin_after_ads(&ctx);
        assert!((margin.value.unwrap() - 82.5).abs() < 1e-9);
    }

    #[test]
    fn test_undefined_ratios() {
        let rows = vec![row(100.0, 0.0, 100.0)];
        let ctx = IndicatorContext { rows: &rows };
        assert_eq!(compute_roas(&ctx).value, None);

        let empty = IndicatorContext { rows: &[] };
        assert_eq!(compute_cpo(&empty).value, None);
        assert_eq!(compute_order_count(&empty).value, Some(0.0));
        assert_eq!(compute_mean_margin_before_ads(&empty).value, Some(0.0));
    }
}
