use contracts::enums::SemanticRole;
use contracts::projections::p910_derived_sales::DerivedRow;
use contracts::usecases::u601_sales_import::{
    AdSpendMode, ColumnMapping, ColumnSource, CostSource, DerivationPolicy, FeeInclusion,
};
use thiserror::Error;

use super::ad_allocator;
use super::filter;
use crate::shared::coercion::{finite_or_zero, number_or_zero, to_date};
use crate::shared::dataset::{RawDataset, RawRow};
use crate::usecases::u601_sales_import::ad_ledger::AdSpendLedger;
use crate::usecases::u601_sales_import::cost_table::CostTable;

/// Operator-facing configuration error. The pipeline does not run.
#[derive(Debug, Error, PartialEq)]
pub enum DerivationError {
    #[error("No column selected for required role '{0}'")]
    MissingRequiredColumn(SemanticRole),

    #[error("Per-product cost table selected but no product column is mapped")]
    MissingProductColumn,
}

/// Everything one derivation run reads. Taken as a snapshot, never mutated.
pub struct DerivationInput<'a> {
    pub dataset: &'a RawDataset,
    pub mapping: &'a ColumnMapping,
    pub policy: &'a DerivationPolicy,
    pub cost_table: Option<&'a CostTable>,
    pub ledger: Option<&'a AdSpendLedger>,
}

/// Complete derived row set (after the row filter) of one run
#[derive(Debug, Clone)]
pub struct Derivation {
    pub rows: Vec<DerivedRow>,
    /// Rows dropped because their date did not parse
    pub excluded_rows: usize,
}

/// Resolved column names, checked against the dataset before any row is touched
struct Resolved<'a> {
    date: &'a str,
    revenue: &'a str,
    product: Option<&'a str>,
}

fn resolve<'a>(
    dataset: &RawDataset,
    mapping: &'a ColumnMapping,
    policy: &DerivationPolicy,
) -> Result<Resolved<'a>, DerivationError> {
    let date = mapping
        .column(SemanticRole::Date)
        .filter(|c| dataset.has_column(c))
        .ok_or(DerivationError::MissingRequiredColumn(SemanticRole::Date))?;

    let revenue = match mapping.revenue_column() {
        Some((_, column)) if dataset.has_column(column) => column,
        Some((role, _)) => return Err(DerivationError::MissingRequiredColumn(role)),
        None => {
            return Err(DerivationError::MissingRequiredColumn(
                SemanticRole::GrossRevenue,
            ))
        }
    };

    let product = mapping
        .column(SemanticRole::Product)
        .filter(|c| dataset.has_column(c));
    if policy.cost_source == CostSource::PerProductTable && product.is_none() {
        return Err(DerivationError::MissingProductColumn);
    }

    Ok(Resolved {
        date,
        revenue,
        product,
    })
}

/// Value of a numeric role: the coerced cell, the constant, or `fallback` when absent
fn source_value(row: &RawRow, source: &ColumnSource, fallback: f64) -> f64 {
    match source {
        ColumnSource::Column { name } => number_or_zero(row.get(name)),
        ColumnSource::Fixed { value } => *value,
        ColumnSource::Absent => fallback,
    }
}

fn text_of(row: &RawRow, column: Option<&str>) -> Option<String> {
    column.and_then(|c| row.get(c)).and_then(|v| v.as_text())
}

fn informational(row: &RawRow, mapping: &ColumnMapping, role: SemanticRole) -> Option<f64> {
    mapping
        .column(role)
        .map(|column| number_or_zero(row.get(column)))
}

/// `profit / net * 100`, zero when there is no positive revenue
pub fn margin(profit: f64, net_revenue: f64) -> f64 {
    if net_revenue > 0.0 {
        finite_or_zero(profit / net_revenue * 100.0)
    } else {
        0.0
    }
}

/// Steps 1-7 of one row. Ad cost and the figures depending on it are filled in later.
fn derive_row(
    row: &RawRow,
    resolved: &Resolved,
    input: &DerivationInput,
) -> Option<DerivedRow> {
    let mapping = input.mapping;
    let policy = input.policy;

    let date = row.get(resolved.date).and_then(to_date)?;

    // 1. Gross revenue
    let gross_revenue = number_or_zero(row.get(resolved.revenue));

    // 2. Quantity
    let quantity = source_value(
        row,
        mapping.get(SemanticRole::Quantity),
        policy.quantity_default,
    );

    // 3. Unit cost
    let product = text_of(row, resolved.product);
    let unit_cost = match &policy.cost_source {
        CostSource::Column => source_value(row, mapping.get(SemanticRole::UnitCost), 0.0),
        CostSource::FixedValue { unit_cost } => *unit_cost,
        CostSource::PerProductTable => product
            .as_deref()
            .and_then(|p| input.cost_table.and_then(|t| t.unit_cost(p)))
            .unwrap_or(0.0),
    };

    // 4. Fees
    let shipping_fee = source_value(
        row,
        mapping.get(SemanticRole::ShippingFee),
        policy.fee_defaults.shipping,
    );
    let other_fee = source_value(
        row,
        mapping.get(SemanticRole::OtherFee),
        policy.fee_defaults.other,
    );

    // 5. Net revenue
    let net_revenue = match policy.fee_inclusion {
        FeeInclusion::SubtractBeforeProfit => {
            finite_or_zero(gross_revenue - (shipping_fee + other_fee))
        }
        FeeInclusion::IgnoreInProfit => gross_revenue,
    };

    // 6. Total cost
    let total_cost = finite_or_zero(unit_cost * quantity);

    // 7. Profit before ads
    let profit_before_ads = finite_or_zero(net_revenue - total_cost);

    Some(DerivedRow {
        date,
        status: text_of(row, mapping.column(SemanticRole::Status)),
        product,
        geography: text_of(row, mapping.column(SemanticRole::Geography)),
        net_transfer_value: informational(row, mapping, SemanticRole::NetRevenue),
        transfer_value: informational(row, mapping, SemanticRole::TransferRevenue),
        gross_revenue,
        shipping_fee,
        other_fee,
        net_revenue,
        quantity,
        unit_cost,
        total_cost,
        ad_allocated: 0.0,
        profit_before_ads,
        profit_after_ads: profit_before_ads,
        margin_before_ads: margin(profit_before_ads, net_revenue),
        margin_after_ads: margin(profit_before_ads, net_revenue),
    })
}

/// Full recomputation of the derived row set from raw rows and the current settings.
///
/// Rows with an unparseable date are excluded; every other coercion failure counts as
/// zero. The row filter applies before ad allocation so that aggregate spend is spread
/// over the filtered period only.
pub fn derive(input: &DerivationInput) -> Result<Derivation, DerivationError> {
    let resolved = resolve(input.dataset, input.mapping, input.policy)?;

    let ad_source = input.mapping.get(SemanticRole::AdSpend);
    let mut rows = Vec::with_capacity(input.dataset.rows.len());
    let mut column_spend = Vec::with_capacity(input.dataset.rows.len());
    let mut excluded_rows = 0;

    for raw in &input.dataset.rows {
        let Some(row) = derive_row(raw, &resolved, input) else {
            excluded_rows += 1;
            continue;
        };
        if !filter::matches(&row, &input.policy.filter) {
            continue;
        }
        if input.policy.ad_spend == AdSpendMode::Column {
            column_spend.push(source_value(raw, ad_source, 0.0));
        }
        rows.push(row);
    }
    if column_spend.len() != rows.len() {
        column_spend = vec![0.0; rows.len()];
    }

    // 8. Ad cost
    let allocated = ad_allocator::allocate(
        &rows,
        &input.policy.ad_spend,
        &column_spend,
        input.ledger,
    );

    for (row, ad) in rows.iter_mut().zip(allocated) {
        let ad = finite_or_zero(ad);
        row.ad_allocated = ad;
        // 9. Profit after ads
        row.profit_after_ads = finite_or_zero(row.profit_before_ads - ad);
        // 10-11. Margins
        row.margin_before_ads = margin(row.profit_before_ads, row.net_revenue);
        row.margin_after_ads = margin(row.profit_after_ads, row.net_revenue);
    }

    tracing::info!(
        "Derived {} rows ({} excluded: unparseable date), revenue column '{}'",
        rows.len(),
        excluded_rows,
        resolved.revenue
    );

    Ok(Derivation {
        rows,
        excluded_rows,
    })
}
