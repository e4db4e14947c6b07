use anyhow::Result;
use contracts::enums::SemanticRole;
use std::collections::HashSet;
use contracts::projections::p910_derived_sales::{DerivedRow, ExportOptions};
use contracts::usecases::u601_sales_import::ColumnMapping;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const DERIVED_HEADERS: &[&str] = &[
    "gross_revenue",
    "shipping_fee",
    "other_fee",
    "net_revenue",
    "quantity",
    "unit_cost",
    "total_cost",
    "ad_allocated",
    "profit_before_ads",
    "profit_after_ads",
    "margin_before_ads",
    "margin_after_ads",
];

#[derive(Clone, Copy)]
enum IdentityField {
    Geography,
    Product,
    Status,
}

impl IdentityField {
    fn value(self, row: &DerivedRow) -> &str {
        let value = match self {
            IdentityField::Geography => &row.geography,
            IdentityField::Product => &row.product,
            IdentityField::Status => &row.status,
        };
        value.as_deref().unwrap_or("")
    }
}

/// Source header name, prefixed with the role code (then numbered) when it would
/// repeat a header already in the file. Compared case-insensitively.
fn unique_header(name: &str, role: SemanticRole, taken: &mut HashSet<String>) -> String {
    let mut candidate = name.to_string();
    if taken.contains(&candidate.to_lowercase()) {
        candidate = format!("{}_{}", role.code(), name);
    }
    let base = candidate.clone();
    let mut n = 2;
    while taken.contains(&candidate.to_lowercase()) {
        candidate = format!("{}_{}", base, n);
        n += 1;
    }
    taken.insert(candidate.to_lowercase());
    candidate
}

fn derived_values(row: &DerivedRow) -> [f64; 12] {
    [
        row.gross_revenue,
        row.shipping_fee,
        row.other_fee,
        row.net_revenue,
        row.quantity,
        row.unit_cost,
        row.total_cost,
        row.ad_allocated,
        row.profit_before_ads,
        row.profit_after_ads,
        row.margin_before_ads,
        row.margin_after_ads,
    ]
}

/// Flat comma-delimited table of the derived rows, UTF-8 with BOM.
///
/// Identity columns are written under their source header name, and only when the
/// operator asked for them and the role is mapped. A name that clashes with another
/// header gets the role code as prefix.
pub fn to_csv(
    rows: &[DerivedRow],
    mapping: &ColumnMapping,
    options: &ExportOptions,
) -> Result<Vec<u8>> {
    let mut taken: HashSet<String> = ["date", "net_transfer_value", "transfer_value"]
        .iter()
        .chain(DERIVED_HEADERS)
        .map(|h| h.to_string())
        .collect();
    let mut identity: Vec<(String, IdentityField)> = Vec::new();
    let wanted = [
        (options.include_geography, SemanticRole::Geography, IdentityField::Geography),
        (options.include_product, SemanticRole::Product, IdentityField::Product),
        (options.include_status, SemanticRole::Status, IdentityField::Status),
    ];
    for (include, role, field) in wanted {
        if let (true, Some(column)) = (include, mapping.column(role)) {
            identity.push((unique_header(column, role, &mut taken), field));
        }
    }

    let with_net_transfer = mapping.column(SemanticRole::NetRevenue).is_some();
    let with_transfer = mapping.column(SemanticRole::TransferRevenue).is_some();

    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());

    let mut header: Vec<String> = vec!["date".to_string()];
    header.extend(identity.iter().map(|(name, _)| name.clone()));
    if with_net_transfer {
        header.push("net_transfer_value".to_string());
    }
    if with_transfer {
        header.push("transfer_value".to_string());
    }
    header.extend(DERIVED_HEADERS.iter().map(|h| h.to_string()));
    writer.write_record(&header)?;

    for row in rows {
        let mut record: Vec<String> = Vec::with_capacity(header.len());
        record.push(row.date.format("%Y-%m-%d").to_string());
        for (_, field) in &identity {
            record.push(field.value(row).to_string());
        }
        if with_net_transfer {
            record.push(row.net_transfer_value.unwrap_or(0.0).to_string());
        }
        if with_transfer {
            record.push(row.transfer_value.unwrap_or(0.0).to_string());
        }
        record.extend(derived_values(row).iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV export: {}", e))?;

    tracing::info!("Exported {} rows ({} bytes)", rows.len(), bytes.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::usecases::u601_sales_import::ColumnSource;

    fn sample_row() -> DerivedRow {
        DerivedRow {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            status: Some("Delivered".to_string()),
            product: Some("Serum, 30ml".to_string()),
            geography: None,
            net_transfer_value: None,
            transfer_value: Some(100.0),
            gross_revenue: 100.0,
            shipping_fee: 5.0,
            other_fee: 0.0,
            net_revenue: 95.0,
            quantity: 1.0,
            unit_cost: 2.0,
            total_cost: 2.0,
            ad_allocated: 30.0,
            profit_before_ads: 93.0,
            profit_after_ads: 63.0,
            margin_before_ads: 50.0,
            margin_after_ads: 25.5,
        }
    }

    #[test]
    fn test_export_layout() {
        let mut mapping = ColumnMapping::empty();
        mapping.set(SemanticRole::Product, ColumnSource::column("Product Name"));
        mapping.set(SemanticRole::Status, ColumnSource::column("Statut"));
        mapping.set(SemanticRole::TransferRevenue, ColumnSource::column("Transfer Value"));
        let options = ExportOptions {
            include_status: true,
            include_product: true,
            include_geography: true,
        };

        let bytes = to_csv(&[sample_row()], &mapping, &options).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));

        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "date,Product Name,Statut,transfer_value,gross_revenue,shipping_fee,other_fee,\
             net_revenue,quantity,unit_cost,total_cost,ad_allocated,profit_before_ads,\
             profit_after_ads,margin_before_ads,margin_after_ads"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2024-05-01,\"Serum, 30ml\",Delivered,100,100,5,0,95,1,2,2,30,93,63,50,25.5"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_identity_columns_are_opt_in() {
        let mut mapping = ColumnMapping::empty();
        mapping.set(SemanticRole::Product, ColumnSource::column("Product"));

        let bytes = to_csv(&[], &mapping, &ExportOptions::default()).unwrap();
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert!(text.starts_with("date,gross_revenue,"));
    }

    #[test]
    fn test_clashing_source_headers_are_prefixed() {
        let mut mapping = ColumnMapping::empty();
        mapping.set(SemanticRole::Geography, ColumnSource::column("Date"));
        mapping.set(SemanticRole::Product, ColumnSource::column("net_revenue"));
        mapping.set(SemanticRole::Status, ColumnSource::column("geography_Date"));
        let options = ExportOptions {
            include_status: true,
            include_product: true,
            include_geography: true,
        };

        let bytes = to_csv(&[sample_row()], &mapping, &options).unwrap();
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let header: Vec<&str> = text.lines().next().unwrap().split(',').collect();
        assert_eq!(
            &header[..4],
            &["date", "geography_Date", "product_net_revenue", "status_geography_Date"]
        );

        let unique: HashSet<String> = header.iter().map(|h| h.to_lowercase()).collect();
        assert_eq!(unique.len(), header.len());
    }
}
