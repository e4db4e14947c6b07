use calamine::{open_workbook_auto_from_rs, Data, Reader};
use contracts::shared::CellValue;
use std::io::Cursor;
use thiserror::Error;

use crate::shared::dataset::RawDataset;

/// Failure to read an uploaded table. Raised before any mapping or derivation runs.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("File is empty")]
    EmptyFile,

    #[error("No header row found")]
    NoHeader,

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Required column not found: {0}")]
    MissingColumn(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableFormat {
    Csv,
    Workbook,
}

fn format_of(file_name: &str) -> Result<TableFormat, ImportError> {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "csv" | "txt" | "tsv" => Ok(TableFormat::Csv),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(TableFormat::Workbook),
        _ => Err(ImportError::UnsupportedFormat(file_name.to_string())),
    }
}

/// Read an uploaded table. `sheet` selects a worksheet of a workbook (first sheet
/// when `None`) and is ignored for CSV.
pub fn load_table(
    file_name: &str,
    bytes: &[u8],
    sheet: Option<&str>,
) -> Result<RawDataset, ImportError> {
    if bytes.is_empty() {
        return Err(ImportError::EmptyFile);
    }

    let mut dataset = match format_of(file_name)? {
        TableFormat::Csv => load_csv(bytes)?,
        TableFormat::Workbook => load_workbook(bytes, sheet)?,
    };
    dataset.file_name = file_name.to_string();

    tracing::info!(
        "Loaded '{}' (sheet {:?}): {} columns, {} rows",
        dataset.file_name,
        dataset.sheet_name,
        dataset.headers.len(),
        dataset.rows.len()
    );

    Ok(dataset)
}

fn load_csv(bytes: &[u8]) -> Result<RawDataset, ImportError> {
    let text = String::from_utf8_lossy(bytes);
    // Strip UTF-8 BOM if present
    let text = text.trim_start_matches('\u{FEFF}');
    if text.trim().is_empty() {
        return Err(ImportError::EmptyFile);
    }

    let first_line = text.lines().next().unwrap_or_default();
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(ImportError::NoHeader);
    }

    let mut grid = Vec::new();
    for result in reader.records() {
        let record = result?;
        grid.push(
            record
                .iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        CellValue::Null
                    } else {
                        CellValue::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(RawDataset::from_grid(dedupe_headers(headers), grid))
}

fn load_workbook(bytes: &[u8], sheet: Option<&str>) -> Result<RawDataset, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| ImportError::Spreadsheet(e.to_string()))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let sheet_name = match sheet {
        Some(name) => {
            if !sheet_names.iter().any(|s| s == name) {
                return Err(ImportError::SheetNotFound(name.to_string()));
            }
            name.to_string()
        }
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::SheetNotFound("<first>".to_string()))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ImportError::Spreadsheet(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or(ImportError::NoHeader)?
        .iter()
        .map(|cell| match cell {
            Data::String(s) => s.trim().to_string(),
            Data::Empty => String::new(),
            other => other.to_string(),
        })
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(ImportError::NoHeader);
    }

    let grid = rows
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();

    let mut dataset = RawDataset::from_grid(dedupe_headers(headers), grid);
    dataset.sheet_name = Some(sheet_name);
    dataset.sheet_names = sheet_names;
    Ok(dataset)
}

fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => CellValue::DateTime(value),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Null,
    }
}

/// Detect the most likely delimiter from the first line.
fn detect_delimiter(first_line: &str) -> u8 {
    let counts = [
        (b',', first_line.matches(',').count()),
        (b';', first_line.matches(';').count()),
        (b'\t', first_line.matches('\t').count()),
    ];

    counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map(|(delim, count)| if count > 0 { delim } else { b',' })
        .unwrap_or(b',')
}

/// Trim headers, name blank ones and make duplicates unique ("Price", "Price.1").
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut result: Vec<String> = Vec::with_capacity(headers.len());
    for (idx, header) in headers.into_iter().enumerate() {
        let base = match header.trim() {
            "" => format!("Unnamed: {}", idx),
            trimmed => trimmed.to_string(),
        };
        let mut candidate = base.clone();
        let mut n = 1;
        while result.contains(&candidate) {
            candidate = format!("{}.{}", base, n);
            n += 1;
        }
        result.push(candidate);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_csv_with_bom_and_semicolons() {
        let text = "\u{FEFF}Date;Total;City\n2024-01-01;100,50;Rabat\n;;\n2024-01-02;;Fes\n";
        let dataset = load_table("orders.csv", text.as_bytes(), None).unwrap();

        assert_eq!(dataset.file_name, "orders.csv");
        assert_eq!(dataset.sheet_name, None);
        assert_eq!(dataset.headers, vec!["Date", "Total", "City"]);
        assert_eq!(dataset.rows.len(), 2);
        assert_eq!(
            dataset.rows[0].get("Total"),
            Some(&CellValue::Text("100,50".to_string()))
        );
        assert_eq!(dataset.rows[1].get("Total"), Some(&CellValue::Null));
    }

    #[test]
    fn test_duplicate_and_blank_headers() {
        let text = "Price,Price,,Qty\n1,2,3,4\n";
        let dataset = load_table("x.csv", text.as_bytes(), None).unwrap();
        assert_eq!(dataset.headers, vec!["Price", "Price.1", "Unnamed: 2", "Qty"]);
        assert_eq!(
            dataset.rows[0].get("Price.1"),
            Some(&CellValue::Text("2".to_string()))
        );
    }

    #[test]
    fn test_import_errors() {
        assert!(matches!(
            load_table("x.csv", b"", None),
            Err(ImportError::EmptyFile)
        ));
        assert!(matches!(
            load_table("x.pdf", b"abc", None),
            Err(ImportError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            load_table("x.xlsx", b"not a zip archive", None),
            Err(ImportError::Spreadsheet(_))
        ));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a,b,c"), b',');
        assert_eq!(detect_delimiter("a;b;c"), b';');
        assert_eq!(detect_delimiter("a\tb"), b'\t');
        assert_eq!(detect_delimiter("single"), b',');
    }
}
