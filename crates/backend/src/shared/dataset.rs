use contracts::shared::CellValue;
use std::collections::HashMap;

/// One record of the imported sheet
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    /// Cell values by header
    pub values: HashMap<String, CellValue>,
}

impl RawRow {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.values.get(column)
    }
}

impl From<HashMap<String, CellValue>> for RawRow {
    fn from(values: HashMap<String, CellValue>) -> Self {
        Self { values }
    }
}

/// Rows of one sheet with a fixed column set
#[derive(Debug, Clone, Default)]
pub struct RawDataset {
    pub file_name: String,
    /// Sheet that was read (`None` for CSV)
    pub sheet_name: Option<String>,
    pub sheet_names: Vec<String>,
    /// Headers in their original order
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawDataset {
    /// Build from a header row and value rows; blank rows are dropped and short rows
    /// are padded with empty cells.
    pub fn from_grid(headers: Vec<String>, grid: Vec<Vec<CellValue>>) -> Self {
        let rows = grid
            .into_iter()
            .filter(|cells| cells.iter().any(|c| !c.is_empty()))
            .map(|cells| {
                let mut values = HashMap::with_capacity(headers.len());
                for (idx, header) in headers.iter().enumerate() {
                    let cell = cells.get(idx).cloned().unwrap_or(CellValue::Null);
                    values.insert(header.clone(), cell);
                }
                RawRow { values }
            })
            .collect();

        Self {
            headers,
            rows,
            ..Self::default()
        }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_grid() {
        let headers = vec!["Date".to_string(), "Total".to_string()];
        let grid = vec![
            vec![CellValue::from("2024-01-01"), CellValue::Number(10.0)],
            vec![CellValue::Null, CellValue::from("  ")],
            vec![CellValue::from("2024-01-02")],
        ];

        let dataset = RawDataset::from_grid(headers, grid);
        assert_eq!(dataset.rows.len(), 2);
        assert_eq!(dataset.rows[1].get("Total"), Some(&CellValue::Null));
        assert!(dataset.has_column("Date"));
        assert!(!dataset.has_column("date"));
    }
}
