use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // U601 Sales import
        // ========================================
        .route("/api/u601/import", post(handlers::u601_sales_import::import))
        .route(
            "/api/u601/:session_id/cost-table",
            post(handlers::u601_sales_import::upload_cost_table)
                .put(handlers::u601_sales_import::put_cost_table),
        )
        .route(
            "/api/u601/:session_id/ad-ledger",
            post(handlers::u601_sales_import::upload_ad_ledger),
        )
        .route(
            "/api/u601/:session_id/settings",
            get(handlers::u601_sales_import::get_settings)
                .put(handlers::u601_sales_import::put_settings),
        )
        .route(
            "/api/u601/:session_id/statuses",
            get(handlers::u601_sales_import::get_statuses),
        )
        // ========================================
        // P910 Derived sales
        // ========================================
        .route(
            "/api/p910/:session_id/rows",
            get(handlers::p910_derived_sales::list_rows),
        )
        .route(
            "/api/p910/:session_id/export",
            get(handlers::p910_derived_sales::export),
        )
        // ========================================
        // D410 Profit summary
        // ========================================
        .route(
            "/api/d410/indicators",
            get(handlers::d410_profit_summary::get_indicator_catalog),
        )
        .route(
            "/api/d410/:session_id/summary",
            get(handlers::d410_profit_summary::get_summary),
        )
        .route(
            "/api/d410/:session_id/aggregate",
            post(handlers::d410_profit_summary::post_aggregate),
        )
}
