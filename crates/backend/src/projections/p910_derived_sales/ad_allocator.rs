use chrono::NaiveDate;
use contracts::projections::p910_derived_sales::DerivedRow;
use contracts::usecases::u601_sales_import::{AdSpendMode, AllocationBasis};
use std::collections::BTreeMap;

use crate::usecases::u601_sales_import::ad_ledger::AdSpendLedger;

/// Weight of one row for proportional allocation. Negative revenue weighs nothing.
fn basis_weight(row: &DerivedRow, basis: AllocationBasis) -> f64 {
    match basis {
        AllocationBasis::GrossRevenue => row.gross_revenue.max(0.0),
        AllocationBasis::Uniform => 1.0,
    }
}

/// Spread `amount` over the rows at `indices`, writing into `out`.
///
/// `amount * weight / sum(weights)`; a zero weight sum allocates nothing and the
/// amount is dropped.
fn allocate_bucket(
    rows: &[DerivedRow],
    indices: &[usize],
    amount: f64,
    basis: AllocationBasis,
    out: &mut [f64],
) {
    let total: f64 = indices.iter().map(|&i| basis_weight(&rows[i], basis)).sum();
    if total <= 0.0 {
        return;
    }
    for &i in indices {
        out[i] += amount * basis_weight(&rows[i], basis) / total;
    }
}

/// One lump sum over the whole (filtered) row set
pub fn allocate_lump_sum(rows: &[DerivedRow], amount: f64, basis: AllocationBasis) -> Vec<f64> {
    let mut out = vec![0.0; rows.len()];
    if amount > 0.0 && amount.is_finite() {
        let indices: Vec<usize> = (0..rows.len()).collect();
        allocate_bucket(rows, &indices, amount, basis, &mut out);
    }
    out
}

/// Ledger spend bucketed by calendar day.
///
/// Each day's spend goes to the rows of that day only. Spend on days outside the row
/// set's date range, or on days without orders, is dropped.
pub fn allocate_ledger(
    rows: &[DerivedRow],
    ledger: &AdSpendLedger,
    basis: AllocationBasis,
) -> Vec<f64> {
    let mut out = vec![0.0; rows.len()];

    let mut buckets: BTreeMap<NaiveDate, Vec<usize>> = BTreeMap::new();
    for (i, row) in rows.iter().enumerate() {
        buckets.entry(row.date).or_default().push(i);
    }

    let mut dropped = 0.0;
    for (day, amount) in ledger.total_by_day() {
        match buckets.get(&day) {
            Some(indices) => allocate_bucket(rows, indices, amount, basis, &mut out),
            None => dropped += amount,
        }
    }

    if dropped != 0.0 {
        tracing::debug!("Ad ledger: {:.2} not allocated (no orders on those days)", dropped);
    }

    out
}

/// Ad cost of every row under the active mode.
///
/// `column_spend` holds the coerced per-row ad-spend column values (zeros when unmapped)
/// and is only read in `Column` mode; the ledger is only read in `Ledger` mode.
pub fn allocate(
    rows: &[DerivedRow],
    mode: &AdSpendMode,
    column_spend: &[f64],
    ledger: Option<&AdSpendLedger>,
) -> Vec<f64> {
    match mode {
        AdSpendMode::None => vec![0.0; rows.len()],
        AdSpendMode::Column => column_spend.to_vec(),
        AdSpendMode::LumpSum { amount, basis } => allocate_lump_sum(rows, *amount, *basis),
        AdSpendMode::Ledger { basis } => match ledger {
            Some(ledger) => allocate_ledger(rows, ledger, *basis),
            None => {
                tracing::warn!("Ledger ad mode selected but no ledger loaded, allocating zero");
                vec![0.0; rows.len()]
            }
        },
    }
}
