use contracts::enums::SemanticRole;
use contracts::usecases::u601_sales_import::CostTableEntry;
use std::collections::HashMap;

use super::loader::ImportError;
use crate::shared::coercion::to_number;
use crate::shared::column_detect::{detect, AliasTable};
use crate::shared::dataset::RawDataset;

/// Purchase price per product, keyed by the case-normalized product identifier
#[derive(Debug, Clone, Default)]
pub struct CostTable {
    prices: HashMap<String, f64>,
}

/// Product identifier as used for cost lookups
pub fn product_key(product: &str) -> String {
    product.trim().to_lowercase()
}

impl CostTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins on duplicate products
    pub fn insert(&mut self, product: &str, unit_cost: f64) {
        self.prices.insert(product_key(product), unit_cost);
    }

    pub fn unit_cost(&self, product: &str) -> Option<f64> {
        self.prices.get(&product_key(product)).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Manual entry; blank product names are skipped. Returns (table, skipped).
    pub fn from_entries(entries: &[CostTableEntry]) -> (Self, usize) {
        let mut table = Self::new();
        let mut skipped = 0;
        for entry in entries {
            if entry.product.trim().is_empty() || !entry.unit_cost.is_finite() {
                skipped += 1;
                continue;
            }
            table.insert(&entry.product, entry.unit_cost);
        }
        (table, skipped)
    }

    /// Build from an auxiliary two-column file (product id, unit cost).
    ///
    /// Columns are auto-detected; without a match the first two columns are used.
    /// Rows without a product or with a non-numeric cost are skipped.
    pub fn from_dataset(
        dataset: &RawDataset,
        aliases: &AliasTable,
    ) -> Result<(Self, usize), ImportError> {
        let product_col = detect(&dataset.headers, SemanticRole::Product, aliases)
            .or_else(|| dataset.headers.first().cloned())
            .ok_or_else(|| ImportError::MissingColumn("product".to_string()))?;
        let cost_col = detect(&dataset.headers, SemanticRole::UnitCost, aliases)
            .filter(|c| c != &product_col)
            .or_else(|| {
                dataset
                    .headers
                    .iter()
                    .find(|h| **h != product_col)
                    .cloned()
            })
            .ok_or_else(|| ImportError::MissingColumn("unit cost".to_string()))?;

        tracing::info!(
            "Cost table columns: product='{}', unit_cost='{}'",
            product_col,
            cost_col
        );

        let mut table = Self::new();
        let mut skipped = 0;
        for row in &dataset.rows {
            let product = row.get(&product_col).and_then(|v| v.as_text());
            let cost = row.get(&cost_col).and_then(to_number);
            match (product, cost) {
                (Some(product), Some(cost)) => table.insert(&product, cost),
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::warn!("Cost table: {} rows skipped (missing product or cost)", skipped);
        }

        Ok((table, skipped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::CellValue;

    #[test]
    fn test_case_normalized_last_write_wins() {
        let mut table = CostTable::new();
        table.insert("Serum A", 10.0);
        table.insert("  serum a ", 12.0);

        assert_eq!(table.len(), 1);
        assert_eq!(table.unit_cost("SERUM A"), Some(12.0));
        assert_eq!(table.unit_cost("Serum B"), None);
    }

    #[test]
    fn test_from_dataset_detects_columns() {
        let dataset = RawDataset::from_grid(
            vec!["SKU".to_string(), "Note".to_string(), "Cost Price".to_string()],
            vec![
                vec![CellValue::from("A-1"), CellValue::Null, CellValue::from("4,50")],
                vec![CellValue::from("B-2"), CellValue::Null, CellValue::from("n/a")],
                vec![CellValue::Null, CellValue::from("x"), CellValue::Number(3.0)],
            ],
        );

        let (table, skipped) = CostTable::from_dataset(&dataset, &AliasTable::default()).unwrap();
        assert_eq!(table.unit_cost("a-1"), Some(4.5));
        assert_eq!(table.len(), 1);
        assert_eq!(skipped, 2);
    }

    #[test]
    fn test_from_dataset_falls_back_to_first_two_columns() {
        let dataset = RawDataset::from_grid(
            vec!["Ref".to_string(), "PA".to_string()],
            vec![vec![CellValue::from("X"), CellValue::Integer(7)]],
        );

        let (table, skipped) = CostTable::from_dataset(&dataset, &AliasTable::default()).unwrap();
        assert_eq!(table.unit_cost("x"), Some(7.0));
        assert_eq!(skipped, 0);
    }

    #[test]
    fn test_from_entries() {
        let entries = vec![
            CostTableEntry {
                product: "A".to_string(),
                unit_cost: 1.0,
            },
            CostTableEntry {
                product: " ".to_string(),
                unit_cost: 2.0,
            },
        ];
        let (table, skipped) = CostTable::from_entries(&entries);
        assert_eq!(table.unit_cost("a"), Some(1.0));
        assert_eq!(skipped, 1);
    }
}
