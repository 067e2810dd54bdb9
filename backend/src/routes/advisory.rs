use crate::commands::advisory;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

/// Largest accepted diagnosis upload.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/crop-recommendation",
            post(advisory::crop_recommendation_axum),
        )
        .route(
            "/api/disease-detection",
            post(advisory::disease_diagnosis_axum).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/market-prices", get(advisory::market_prices_axum))
        .route(
            "/api/irrigation-calculator",
            post(advisory::irrigation_plan_axum),
        )
        .route(
            "/api/fertilizer-recommendation",
            post(advisory::fertilizer_plan_axum),
        )
        .route("/api/weather-analysis", get(advisory::weather_summary_axum))
        .route(
            "/api/soil-health-analysis",
            post(advisory::soil_analysis_axum),
        )
        .route("/api/agricultural-news", get(advisory::news_digest_axum))
        .route(
            "/api/government-schemes",
            get(advisory::government_schemes_axum),
        )
        .route(
            "/api/crop-yield-prediction",
            post(advisory::yield_prediction_axum),
        )
        .route(
            "/api/farming-calculator",
            post(advisory::farming_calculator_axum),
        )
        .route("/api/farm-analytics", post(advisory::farm_analytics_axum))
        .route(
            "/api/task-optimization",
            post(advisory::task_optimization_axum),
        )
}
