use contracts::enums::SemanticRole;
use contracts::projections::p910_derived_sales::DerivedRow;
use contracts::usecases::u601_sales_import::{ColumnMapping, RowFilter};
use std::collections::BTreeSet;

use crate::shared::dataset::RawDataset;

/// Date range (inclusive) and status selection. Rows without a status only pass an
/// empty selection or one that lists the empty value.
pub fn matches(row: &DerivedRow, filter: &RowFilter) -> bool {
    if let Some(from) = filter.date_from {
        if row.date < from {
            return false;
        }
    }
    if let Some(to) = filter.date_to {
        if row.date > to {
            return false;
        }
    }
    if filter.statuses.is_empty() {
        return true;
    }
    let status = row.status.as_deref().unwrap_or("");
    filter.statuses.iter().any(|s| s.trim() == status)
}

/// Distinct observed values of the mapped status column, sorted
pub fn distinct_statuses(dataset: &RawDataset, mapping: &ColumnMapping) -> Vec<String> {
    let Some(column) = mapping.column(SemanticRole::Status) else {
        return Vec::new();
    };

    dataset
        .rows
        .iter()
        .filter_map(|row| row.get(column).and_then(|v| v.as_text()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
