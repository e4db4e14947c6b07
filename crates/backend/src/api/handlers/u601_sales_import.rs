use axum::{
    extract::{Multipart, Path},
    Json,
};
use contracts::usecases::u601_sales_import::{
    AuxImportResponse, CostTableRequest, ImportResponse, SessionSettings,
};
use once_cell::sync::Lazy;
use std::sync::Arc;

use super::{bad_request, load_session, session_not_found, ApiError};
use crate::projections::p910_derived_sales::service as p910_service;
use crate::shared::config::app_config;
use crate::system::session::SESSIONS;
use crate::usecases::u601_sales_import::{ImportError, ImportExecutor};

// ============================================================================
// UseCase u601: Sales export import
// ============================================================================

static IMPORT_EXECUTOR: Lazy<Arc<ImportExecutor>> =
    Lazy::new(|| Arc::new(ImportExecutor::from_config(SESSIONS.clone(), app_config())));

/// Uploaded file from a multipart form (`file`, optional `sheet`)
struct Upload {
    file_name: String,
    bytes: Vec<u8>,
    sheet: Option<String>,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut sheet = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload.csv").to_string();
                let bytes = field.bytes().await.map_err(bad_request)?;
                file = Some((file_name, bytes.to_vec()));
            }
            "sheet" => {
                let text = field.text().await.map_err(bad_request)?;
                let text = text.trim();
                if !text.is_empty() {
                    sheet = Some(text.to_string());
                }
            }
            _ => {}
        }
    }

    let (file_name, bytes) = file.ok_or_else(|| bad_request("Missing 'file' field"))?;
    Ok(Upload {
        file_name,
        bytes,
        sheet,
    })
}

fn import_error(e: ImportError) -> ApiError {
    tracing::error!("Import failed: {}", e);
    bad_request(e)
}

/// POST /api/u601/import
pub async fn import(multipart: Multipart) -> Result<Json<ImportResponse>, ApiError> {
    let upload = read_upload(multipart).await?;
    tracing::info!(
        "U601: importing '{}' ({} bytes, sheet {:?})",
        upload.file_name,
        upload.bytes.len(),
        upload.sheet
    );

    IMPORT_EXECUTOR
        .import(&upload.file_name, &upload.bytes, upload.sheet.as_deref())
        .map(Json)
        .map_err(import_error)
}

/// POST /api/u601/:session_id/cost-table
pub async fn upload_cost_table(
    Path(session_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<AuxImportResponse>, ApiError> {
    let upload = read_upload(multipart).await?;
    match IMPORT_EXECUTOR.load_cost_table(&session_id, &upload.file_name, &upload.bytes) {
        Ok(Some(response)) => Ok(Json(response)),
        Ok(None) => Err(session_not_found(&session_id)),
        Err(e) => Err(import_error(e)),
    }
}

/// PUT /api/u601/:session_id/cost-table
pub async fn put_cost_table(
    Path(session_id): Path<String>,
    Json(request): Json<CostTableRequest>,
) -> Result<Json<AuxImportResponse>, ApiError> {
    IMPORT_EXECUTOR
        .set_cost_entries(&session_id, &request)
        .map(Json)
        .ok_or_else(|| session_not_found(&session_id))
}

/// POST /api/u601/:session_id/ad-ledger
pub async fn upload_ad_ledger(
    Path(session_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<AuxImportResponse>, ApiError> {
    let upload = read_upload(multipart).await?;
    match IMPORT_EXECUTOR.load_ad_ledger(&session_id, &upload.file_name, &upload.bytes) {
        Ok(Some(response)) => Ok(Json(response)),
        Ok(None) => Err(session_not_found(&session_id)),
        Err(e) => Err(import_error(e)),
    }
}

/// GET /api/u601/:session_id/settings
pub async fn get_settings(
    Path(session_id): Path<String>,
) -> Result<Json<SessionSettings>, ApiError> {
    IMPORT_EXECUTOR
        .get_settings(&session_id)
        .map(Json)
        .ok_or_else(|| session_not_found(&session_id))
}

/// PUT /api/u601/:session_id/settings
pub async fn put_settings(
    Path(session_id): Path<String>,
    Json(settings): Json<SessionSettings>,
) -> Result<Json<SessionSettings>, ApiError> {
    IMPORT_EXECUTOR
        .update_settings(&session_id, settings)
        .map(Json)
        .ok_or_else(|| session_not_found(&session_id))
}

/// GET /api/u601/:session_id/statuses
pub async fn get_statuses(Path(session_id): Path<String>) -> Result<Json<Vec<String>>, ApiError> {
    let session = load_session(&session_id)?;
    Ok(Json(p910_service::statuses(&session)))
}
