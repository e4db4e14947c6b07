use axum::{
    extract::{Path, Query},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use contracts::projections::p910_derived_sales::{DerivedRowsResponse, ExportOptions};

use super::{configuration_error, load_session, ApiError};
use crate::projections::p910_derived_sales::service::{self, ExportError};

/// GET /api/p910/:session_id/rows
pub async fn list_rows(
    Path(session_id): Path<String>,
) -> Result<Json<DerivedRowsResponse>, ApiError> {
    let session = load_session(&session_id)?;
    match service::list_rows(&session) {
        Ok(response) => {
            tracing::info!(
                "P910: session {} returning {} rows (mapping v{})",
                session_id,
                response.rows.len(),
                response.mapping_version
            );
            Ok(Json(response))
        }
        Err(e) => Err(configuration_error(&session_id, e)),
    }
}

/// GET /api/p910/:session_id/export?include_status=true&include_product=true
pub async fn export(
    Path(session_id): Path<String>,
    Query(options): Query<ExportOptions>,
) -> Result<impl IntoResponse, ApiError> {
    let session = load_session(&session_id)?;
    let bytes = service::export_rows(&session, &options).map_err(|e| match e {
        ExportError::Configuration(e) => configuration_error(&session_id, e),
        ExportError::Write(e) => {
            tracing::error!("P910: export failed for session {}: {}", session_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"profit_report.csv\"",
            ),
        ],
        bytes,
    ))
}
