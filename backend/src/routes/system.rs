use crate::commands;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(commands::system::root))
        .route("/api/health", get(commands::system::health_axum))
        .route("/api/ai/status", get(commands::system::ai_status_axum))
}
