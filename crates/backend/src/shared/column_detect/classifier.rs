use contracts::enums::SemanticRole;
use contracts::usecases::u601_sales_import::{ColumnMapping, ColumnSource, DetectedColumn};

use super::alias_table::AliasTable;
use super::normalizer::normalize;

/// Best matching column for `role`, or `None`.
///
/// Aliases are tried in table order; for each alias the columns are scanned in their
/// original order and the first column whose normalized name contains the normalized
/// alias wins. Alias priority dominates column order. Substring matching is deliberate
/// and accepts coincidental matches. Aliases that normalize to nothing are skipped.
pub fn detect(columns: &[String], role: SemanticRole, table: &AliasTable) -> Option<String> {
    detect_by_aliases(columns, table.aliases(role))
}

/// Same matching rule over an ad-hoc alias list (auxiliary files)
pub fn detect_by_aliases<S: AsRef<str>>(columns: &[String], aliases: &[S]) -> Option<String> {
    let normalized: Vec<String> = columns.iter().map(|c| normalize(c)).collect();
    first_match(columns, &normalized, aliases)
}

fn first_match<S: AsRef<str>>(
    columns: &[String],
    normalized: &[String],
    aliases: &[S],
) -> Option<String> {
    for alias in aliases {
        let token = normalize(alias.as_ref());
        if token.is_empty() {
            continue;
        }
        if let Some(idx) = normalized.iter().position(|col| col.contains(&token)) {
            return Some(columns[idx].clone());
        }
    }
    None
}

/// Detection result for every role of the table, in `SemanticRole::all()` order
pub fn detect_all(columns: &[String], table: &AliasTable) -> Vec<DetectedColumn> {
    let normalized: Vec<String> = columns.iter().map(|c| normalize(c)).collect();

    SemanticRole::all()
        .into_iter()
        .map(|role| {
            let column = first_match(columns, &normalized, table.aliases(role));
            tracing::debug!("Auto-detect {}: {:?}", role, column);
            DetectedColumn {
                role,
                display_name: role.display_name().to_string(),
                column,
            }
        })
        .collect()
}

/// Initial session mapping built from detection results (version 0).
///
/// The revenue source is pre-selected from the Net → Transfer → Gross priority.
pub fn detected_mapping(detected: &[DetectedColumn]) -> ColumnMapping {
    let mut mapping = ColumnMapping::empty();
    for d in detected {
        if let Some(column) = &d.column {
            mapping.roles.insert(d.role, ColumnSource::column(column));
        }
    }
    let revenue_role = mapping.revenue_column().map(|(role, _)| role);
    mapping.revenue_role = revenue_role;
    mapping
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_alias_priority_beats_column_order() {
        let mut table = AliasTable::empty();
        table.set(
            SemanticRole::GrossRevenue,
            vec!["transfer value".to_string(), "total".to_string()],
        );
        let columns = cols(&["Total", "Transfer Value"]);

        assert_eq!(
            detect(&columns, SemanticRole::GrossRevenue, &table),
            Some("Transfer Value".to_string())
        );
    }

    #[test]
    fn test_first_matching_column_for_same_alias() {
        let table = AliasTable::default();
        let columns = cols(&["Order ID", "Created Date", "Order Date"]);
        assert_eq!(
            detect(&columns, SemanticRole::Date, &table),
            Some("Created Date".to_string())
        );
    }

    #[test]
    fn test_absent_when_nothing_matches() {
        let table = AliasTable::default();
        let columns = cols(&["Foo", "Bar", ""]);
        for role in SemanticRole::all() {
            assert_eq!(detect(&columns, role, &table), None, "role {}", role);
        }
        assert_eq!(detect(&[], SemanticRole::Date, &table), None);
    }

    #[test]
    fn test_substring_match_accepts_partial_headers() {
        let table = AliasTable::default();
        let columns = cols(&["Order No", "Shipping Fees (MAD)", "COD Fees", "Ville"]);
        assert_eq!(
            detect(&columns, SemanticRole::ShippingFee, &table),
            Some("Shipping Fees (MAD)".to_string())
        );
        assert_eq!(
            detect(&columns, SemanticRole::OtherFee, &table),
            Some("COD Fees".to_string())
        );
        assert_eq!(
            detect(&columns, SemanticRole::Geography, &table),
            Some("Ville".to_string())
        );
    }

    #[test]
    fn test_same_column_may_serve_two_roles() {
        let table = AliasTable::default();
        let columns = cols(&["Net Transfer Value", "Created Time"]);
        assert_eq!(
            detect(&columns, SemanticRole::NetRevenue, &table),
            Some("Net Transfer Value".to_string())
        );
        assert_eq!(
            detect(&columns, SemanticRole::TransferRevenue, &table),
            Some("Net Transfer Value".to_string())
        );
    }

    #[test]
    fn test_empty_alias_is_ignored() {
        let mut table = AliasTable::empty();
        table.set(SemanticRole::Status, vec!["--".to_string(), "statut".to_string()]);
        let columns = cols(&["Client", "Statut"]);
        assert_eq!(
            detect(&columns, SemanticRole::Status, &table),
            Some("Statut".to_string())
        );
    }

    #[test]
    fn test_detect_is_idempotent() {
        let table = AliasTable::default();
        let columns = cols(&["Date", "Product Name", "Qty", "Price", "City", "Status"]);
        let first = detect_all(&columns, &table);
        let second = detect_all(&columns, &table);
        let a: Vec<_> = first.iter().map(|d| d.column.clone()).collect();
        let b: Vec<_> = second.iter().map(|d| d.column.clone()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_detected_mapping() {
        let table = AliasTable::default();
        let columns = cols(&["Date", "Product Name", "Qty", "Price", "City", "Status"]);
        let mapping = detected_mapping(&detect_all(&columns, &table));

        assert_eq!(mapping.version, 0);
        assert_eq!(mapping.column(SemanticRole::Date), Some("Date"));
        assert_eq!(mapping.column(SemanticRole::Product), Some("Product Name"));
        assert_eq!(mapping.column(SemanticRole::Quantity), Some("Qty"));
        assert_eq!(mapping.column(SemanticRole::GrossRevenue), Some("Price"));
        assert_eq!(mapping.column(SemanticRole::Geography), Some("City"));
        assert_eq!(mapping.column(SemanticRole::Status), Some("Status"));
        assert_eq!(mapping.get(SemanticRole::AdSpend), &ColumnSource::Absent);
        assert_eq!(
            mapping.revenue_column(),
            Some((SemanticRole::GrossRevenue, "Price"))
        );
        assert_eq!(mapping.revenue_role, Some(SemanticRole::GrossRevenue));
    }

    #[test]
    fn test_detected_mapping_preselects_net_revenue() {
        let table = AliasTable::default();
        let columns = cols(&["Order Date", "Net Weight (kg)", "Price"]);
        let mapping = detected_mapping(&detect_all(&columns, &table));

        assert_eq!(mapping.column(SemanticRole::GrossRevenue), Some("Price"));
        assert_eq!(mapping.revenue_role, Some(SemanticRole::NetRevenue));
    }
}
