// Projection handlers
pub mod p910_derived_sales;

// Dashboard handlers
pub mod d410_profit_summary;

// UseCase handlers
pub mod u601_sales_import;

use axum::http::StatusCode;

use crate::projections::p910_derived_sales::projection_builder::DerivationError;
use crate::system::session::{Session, SESSIONS};

/// Ошибка API: код + сообщение для оператора
pub type ApiError = (StatusCode, String);

pub(crate) fn bad_request<E: std::fmt::Display>(e: E) -> ApiError {
    (StatusCode::BAD_REQUEST, e.to_string())
}

pub(crate) fn session_not_found(session_id: &str) -> ApiError {
    tracing::warn!("Session not found: {}", session_id);
    (
        StatusCode::NOT_FOUND,
        format!("Session not found: {}", session_id),
    )
}

/// Configuration errors block the pipeline until the operator fixes the settings
pub(crate) fn configuration_error(session_id: &str, e: DerivationError) -> ApiError {
    tracing::warn!("Session {}: {}", session_id, e);
    (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
}

pub(crate) fn load_session(session_id: &str) -> Result<Session, ApiError> {
    SESSIONS
        .get(session_id)
        .ok_or_else(|| session_not_found(session_id))
}
