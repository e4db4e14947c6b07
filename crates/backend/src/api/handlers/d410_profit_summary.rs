use axum::{extract::Path, Json};
use contracts::dashboards::d410_profit_summary::{
    AggregateRequest, AggregateRow, ProfitSummaryResponse,
};
use contracts::shared::indicators::IndicatorMeta;

use super::{configuration_error, load_session, ApiError};
use crate::dashboards::d410_profit_summary::service;
use crate::shared::indicators::metadata;

/// GET /api/d410/:session_id/summary
pub async fn get_summary(
    Path(session_id): Path<String>,
) -> Result<Json<ProfitSummaryResponse>, ApiError> {
    let session = load_session(&session_id)?;
    match service::get_summary(&session) {
        Ok(response) => {
            tracing::info!(
                "D410 Dashboard: session {} summary over {} orders, {} days",
                session_id,
                response.order_count,
                response.daily.len()
            );
            Ok(Json(response))
        }
        Err(e) => Err(configuration_error(&session_id, e)),
    }
}

/// POST /api/d410/:session_id/aggregate
pub async fn post_aggregate(
    Path(session_id): Path<String>,
    Json(request): Json<AggregateRequest>,
) -> Result<Json<Vec<AggregateRow>>, ApiError> {
    let session = load_session(&session_id)?;
    service::get_aggregate(&session, &request)
        .map(Json)
        .map_err(|e| configuration_error(&session_id, e))
}

/// GET /api/d410/indicators
pub async fn get_indicator_catalog() -> Json<Vec<IndicatorMeta>> {
    Json(metadata::build_catalog())
}
