use contracts::shared::indicators::*;

/// Well-known indicator IDs (constants to avoid typos).
pub mod ids {
    use super::*;

    pub fn gross_revenue() -> IndicatorId {
        IndicatorId::new("gross_revenue")
    }
    pub fn net_revenue() -> IndicatorId {
        IndicatorId::new("net_revenue")
    }
    pub fn profit_before_ads() -> IndicatorId {
        IndicatorId::new("profit_before_ads")
    }
    pub fn profit_after_ads() -> IndicatorId {
        IndicatorId::new("profit_after_ads")
    }
    pub fn ads_allocated() -> IndicatorId {
        IndicatorId::new("ads_allocated")
    }
    pub fn order_count() -> IndicatorId {
        IndicatorId::new("order_count")
    }
    pub fn roas() -> IndicatorId {
        IndicatorId::new("roas")
    }
    pub fn cpo() -> IndicatorId {
        IndicatorId::new("cpo")
    }
    pub fn mean_margin_before_ads() -> IndicatorId {
        IndicatorId::new("mean_margin_before_ads")
    }
    pub fn mean_margin_after_ads() -> IndicatorId {
        IndicatorId::new("mean_margin_after_ads")
    }

    /// Indicators shown on the profit summary, in display order
    pub fn summary_set() -> Vec<IndicatorId> {
        vec![
            net_revenue(),
            gross_revenue(),
            profit_before_ads(),
            profit_after_ads(),
            ads_allocated(),
            order_count(),
            roas(),
            cpo(),
            mean_margin_before_ads(),
            mean_margin_after_ads(),
        ]
    }
}

fn meta(id: IndicatorId, label: &str, format: ValueFormat, description: &str) -> IndicatorMeta {
    IndicatorMeta {
        id,
        label: label.into(),
        format,
        description: Some(description.into()),
    }
}

/// Build the full catalogue of indicators.
pub fn build_catalog() -> Vec<IndicatorMeta> {
    vec![
        meta(
            ids::net_revenue(),
            "Net revenue",
            ValueFormat::Money,
            "Gross revenue minus shipping and other fees (per fee policy)",
        ),
        meta(
            ids::gross_revenue(),
            "Gross revenue",
            ValueFormat::Money,
            "Sum of the revenue column",
        ),
        meta(
            ids::profit_before_ads(),
            "Profit before ads",
            ValueFormat::Money,
            "Net revenue minus cost of goods",
        ),
        meta(
            ids::profit_after_ads(),
            "Profit after ads",
            ValueFormat::Money,
            "Profit before ads minus allocated ad spend",
        ),
        meta(
            ids::ads_allocated(),
            "Ad spend",
            ValueFormat::Money,
            "Advertising cost allocated to the filtered orders",
        ),
        meta(
            ids::order_count(),
            "Orders",
            ValueFormat::Integer,
            "Number of derived rows after filters",
        ),
        meta(
            ids::roas(),
            "ROAS",
            ValueFormat::Number { decimals: 2 },
            "Net revenue / ad spend",
        ),
        meta(
            ids::cpo(),
            "CPO",
            ValueFormat::Money,
            "Ad spend / order count",
        ),
        meta(
            ids::mean_margin_before_ads(),
            "Avg. margin before ads",
            ValueFormat::Percent { decimals: 1 },
            "Mean of per-order margins before ads",
        ),
        meta(
            ids::mean_margin_after_ads(),
            "Avg. margin after ads",
            ValueFormat::Percent { decimals: 1 },
            "Mean of per-order margins after ads",
        ),
    ]
}
