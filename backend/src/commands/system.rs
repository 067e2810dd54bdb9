use crate::advisory::{Advisor, Operation};
use crate::error::FarmResult;
use crate::state::AppState;
use axum::{extract::State as AxumState, Json};
use serde::Serialize;
use std::sync::Arc;

const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: bool,
    pub ai_configured: bool,
}

#[derive(Serialize, Debug)]
pub struct AiStatusResponse {
    pub configured: bool,
    pub model: Option<String>,
    pub operations: Vec<&'static str>,
}

pub async fn health_axum(AxumState(state): AxumState<AppState>) -> FarmResult<Json<HealthResponse>> {
    let database = match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => true,
        Err(e) => {
            tracing::error!("Health check could not reach the database: {}", e);
            false
        }
    };

    Ok(Json(HealthResponse {
        status: if database { "ok" } else { "degraded" },
        version: CURRENT_VERSION,
        database,
        ai_configured: state.advisor.is_live(),
    }))
}

pub async fn ai_status_axum(AxumState(advisor): AxumState<Arc<Advisor>>) -> Json<AiStatusResponse> {
    Json(AiStatusResponse {
        configured: advisor.is_live(),
        model: advisor.model_name().map(str::to_string),
        operations: Operation::ALL.iter().map(|op| op.id()).collect(),
    })
}

pub async fn root() -> &'static str {
    "Farm assistant is running!"
}
