use crate::commands::utils::{optional_text, required_text};
use crate::db::{DbPool, Worker};
use crate::error::{FarmError, FarmResult};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State as AxumState},
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct WorkerInput {
    pub full_name: String,
    pub phone: Option<String>,
    pub daily_wage: i64,
    pub skills: Option<String>,
}

const WORKER_COLUMNS: &str = "worker_id, full_name, phone, daily_wage, skills";

fn validate(input: WorkerInput) -> FarmResult<WorkerInput> {
    if input.daily_wage < 0 {
        return Err(FarmError::Validation(
            "Daily wage cannot be negative".to_string(),
        ));
    }
    Ok(WorkerInput {
        full_name: required_text(&input.full_name, "Worker name")?,
        phone: optional_text(input.phone),
        daily_wage: input.daily_wage,
        skills: optional_text(input.skills),
    })
}

pub async fn list_workers_internal(pool: &DbPool) -> FarmResult<Vec<Worker>> {
    Ok(sqlx::query_as::<_, Worker>(&format!(
        "SELECT {} FROM workers ORDER BY full_name ASC",
        WORKER_COLUMNS
    ))
    .fetch_all(pool)
    .await?)
}

pub async fn get_worker_internal(pool: &DbPool, worker_id: i64) -> FarmResult<Worker> {
    sqlx::query_as::<_, Worker>(&format!(
        "SELECT {} FROM workers WHERE worker_id = $1",
        WORKER_COLUMNS
    ))
    .bind(worker_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| FarmError::NotFound(format!("Worker {} not found", worker_id)))
}

/// A phone number already on file is rejected by the unique index (409).
pub async fn create_worker_internal(pool: &DbPool, input: WorkerInput) -> FarmResult<Worker> {
    let w = validate(input)?;
    let worker = sqlx::query_as::<_, Worker>(&format!(
        "INSERT INTO workers (full_name, phone, daily_wage, skills)
         VALUES ($1, $2, $3, $4)
         RETURNING {}",
        WORKER_COLUMNS
    ))
    .bind(w.full_name)
    .bind(w.phone)
    .bind(w.daily_wage)
    .bind(w.skills)
    .fetch_one(pool)
    .await?;

    tracing::info!("Worker {} registered: {}", worker.worker_id, worker.full_name);
    Ok(worker)
}

pub async fn update_worker_internal(
    pool: &DbPool,
    worker_id: i64,
    input: WorkerInput,
) -> FarmResult<Worker> {
    let w = validate(input)?;
    sqlx::query_as::<_, Worker>(&format!(
        "UPDATE workers
         SET full_name = $1, phone = $2, daily_wage = $3, skills = $4
         WHERE worker_id = $5
         RETURNING {}",
        WORKER_COLUMNS
    ))
    .bind(w.full_name)
    .bind(w.phone)
    .bind(w.daily_wage)
    .bind(w.skills)
    .bind(worker_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| FarmError::NotFound(format!("Worker {} not found", worker_id)))
}

/// Tasks assigned to the worker stay, unassigned.
pub async fn delete_worker_internal(pool: &DbPool, worker_id: i64) -> FarmResult<()> {
    let result = sqlx::query("DELETE FROM workers WHERE worker_id = $1")
        .bind(worker_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(FarmError::NotFound(format!("Worker {} not found", worker_id)));
    }
    Ok(())
}

pub async fn list_workers_axum(
    AxumState(state): AxumState<AppState>,
) -> FarmResult<Json<Vec<Worker>>> {
    Ok(Json(list_workers_internal(&state.pool).await?))
}

pub async fn get_worker_axum(
    AxumState(state): AxumState<AppState>,
    Path(worker_id): Path<i64>,
) -> FarmResult<Json<Worker>> {
    Ok(Json(get_worker_internal(&state.pool, worker_id).await?))
}

pub async fn create_worker_axum(
    AxumState(state): AxumState<AppState>,
    payload: Result<Json<WorkerInput>, JsonRejection>,
) -> FarmResult<Json<Worker>> {
    let Json(input) = payload?;
    Ok(Json(create_worker_internal(&state.pool, input).await?))
}

pub async fn update_worker_axum(
    AxumState(state): AxumState<AppState>,
    Path(worker_id): Path<i64>,
    payload: Result<Json<WorkerInput>, JsonRejection>,
) -> FarmResult<Json<Worker>> {
    let Json(input) = payload?;
    Ok(Json(update_worker_internal(&state.pool, worker_id, input).await?))
}

pub async fn delete_worker_axum(
    AxumState(state): AxumState<AppState>,
    Path(worker_id): Path<i64>,
) -> FarmResult<Json<()>> {
    delete_worker_internal(&state.pool, worker_id).await?;
    Ok(Json(()))
}
