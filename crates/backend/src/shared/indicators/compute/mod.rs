pub mod profit;

use contracts::projections::p910_derived_sales::DerivedRow;

/// Rows an indicator batch is computed over (already filtered)
pub struct IndicatorContext<'a> {
    pub rows: &'a [DerivedRow],
}
