use contracts::projections::p910_derived_sales::{DerivedRowsResponse, ExportOptions};
use thiserror::Error;

use super::export;
use super::filter;
use super::projection_builder::{derive, Derivation, DerivationError, DerivationInput};
use crate::system::session::Session;

/// Recompute the full derived row set from the session snapshot
pub fn derive_session(session: &Session) -> Result<Derivation, DerivationError> {
    derive(&DerivationInput {
        dataset: &session.dataset,
        mapping: &session.mapping,
        policy: &session.policy,
        cost_table: session.cost_table.as_deref(),
        ledger: session.ledger.as_deref(),
    })
}

pub fn list_rows(session: &Session) -> Result<DerivedRowsResponse, DerivationError> {
    let derivation = derive_session(session)?;
    Ok(DerivedRowsResponse {
        mapping_version: session.mapping.version,
        excluded_rows: derivation.excluded_rows,
        rows: derivation.rows,
    })
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Configuration(#[from] DerivationError),

    #[error(transparent)]
    Write(#[from] anyhow::Error),
}

/// CSV bytes of the filtered rows
pub fn export_rows(session: &Session, options: &ExportOptions) -> Result<Vec<u8>, ExportError> {
    let derivation = derive_session(session)?;
    let bytes = export::to_csv(&derivation.rows, &session.mapping, options)?;
    Ok(bytes)
}

pub fn statuses(session: &Session) -> Vec<String> {
    filter::distinct_statuses(&session.dataset, &session.mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::enums::SemanticRole;
    use contracts::shared::CellValue;
    use contracts::usecases::u601_sales_import::{
        AdSpendEntry, AdSpendMode, AllocationBasis, ColumnMapping, ColumnSource,
        DerivationPolicy,
    };
    use std::sync::Arc;

    use crate::shared::dataset::RawDataset;
    use crate::usecases::u601_sales_import::ad_ledger::AdSpendLedger;

    fn session() -> Session {
        let dataset = RawDataset::from_grid(
            vec!["Date".to_string(), "Total".to_string(), "Status".to_string()],
            vec![
                vec![
                    CellValue::from("2024-05-01"),
                    CellValue::from("100"),
                    CellValue::from("Delivered"),
                ],
                vec![
                    CellValue::from("2024-05-01"),
                    CellValue::from("300"),
                    CellValue::from("Returned"),
                ],
                vec![
                    CellValue::from("bad"),
                    CellValue::from("50"),
                    CellValue::from("Delivered"),
                ],
            ],
        );
        let mut mapping = ColumnMapping::empty();
        mapping.set(SemanticRole::Date, ColumnSource::column("Date"));
        mapping.set(SemanticRole::GrossRevenue, ColumnSource::column("Total"));
        mapping.set(SemanticRole::Status, ColumnSource::column("Status"));
        Session::new(dataset, mapping, DerivationPolicy::default())
    }

    #[test]
    fn test_list_rows_uses_session_ledger() {
        let mut session = session();
        session.policy.ad_spend = AdSpendMode::Ledger {
            basis: AllocationBasis::GrossRevenue,
        };
        session.ledger = Some(Arc::new(AdSpendLedger::new(vec![AdSpendEntry {
            date: chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            amount: 40.0,
            channel: Some("facebook".to_string()),
        }])));

        let response = list_rows(&session).unwrap();
        assert_eq!(response.mapping_version, 3);
        assert_eq!(response.excluded_rows, 1);
        assert_eq!(response.rows.len(), 2);
        assert!((response.rows[0].ad_allocated - 10.0).abs() < 1e-9);
        assert!((response.rows[1].ad_allocated - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_statuses_and_export() {
        let session = session();
        assert_eq!(statuses(&session), vec!["Delivered", "Returned"]);

        let options = ExportOptions {
            include_status: true,
            ..ExportOptions::default()
        };
        let bytes = export_rows(&session, &options).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("Returned"));
    }

    #[test]
    fn test_configuration_error_surfaces() {
        let mut session = session();
        session.mapping.set(SemanticRole::Date, ColumnSource::Absent);
        assert!(matches!(
            list_rows(&session),
            Err(DerivationError::MissingRequiredColumn(SemanticRole::Date))
        ));
        assert!(matches!(
            export_rows(&session, &ExportOptions::default()),
            Err(ExportError::Configuration(
                DerivationError::MissingRequiredColumn(SemanticRole::Date)
            ))
        ));
    }
}
