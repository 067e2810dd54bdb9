use crate::commands::utils::{optional_text, required_text};
use crate::db::{DbPool, Task};
use crate::error::{FarmError, FarmResult};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State as AxumState},
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TaskInput {
    pub name: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub field_id: i64,
    pub worker_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TaskFilter {
    pub field_id: Option<i64>,
    pub worker_id: Option<i64>,
    pub status: Option<String>,
}

// Status is free text; these are only the defaults.
const DEFAULT_PRIORITY: &str = "Medium";
const DEFAULT_STATUS: &str = "Pending";

const TASK_SELECT: &str = "SELECT t.task_id, t.name, t.description, t.priority, t.status,
        t.field_id, t.worker_id, f.name AS field_name, w.full_name AS worker_name
    FROM tasks t
    JOIN fields f ON f.field_id = t.field_id
    LEFT JOIN workers w ON w.worker_id = t.worker_id";

struct ValidTask {
    name: String,
    description: Option<String>,
    priority: String,
    status: String,
    field_id: i64,
    worker_id: Option<i64>,
}

async fn validate(pool: &DbPool, input: TaskInput) -> FarmResult<ValidTask> {
    let name = required_text(&input.name, "Task name")?;

    let field_exists: Option<(i64,)> =
        sqlx::query_as("SELECT field_id FROM fields WHERE field_id = $1")
            .bind(input.field_id)
            .fetch_optional(pool)
            .await?;
    if field_exists.is_none() {
        return Err(FarmError::Validation(format!(
            "Field {} does not exist",
            input.field_id
        )));
    }

    if let Some(worker_id) = input.worker_id {
        let worker_exists: Option<(i64,)> =
            sqlx::query_as("SELECT worker_id FROM workers WHERE worker_id = $1")
                .bind(worker_id)
                .fetch_optional(pool)
                .await?;
        if worker_exists.is_none() {
            return Err(FarmError::Validation(format!(
                "Worker {} does not exist",
                worker_id
            )));
        }
    }

    Ok(ValidTask {
        name,
        description: optional_text(input.description),
        priority: optional_text(input.priority).unwrap_or_else(|| DEFAULT_PRIORITY.to_string()),
        status: optional_text(input.status).unwrap_or_else(|| DEFAULT_STATUS.to_string()),
        field_id: input.field_id,
        worker_id: input.worker_id,
    })
}

pub async fn list_tasks_internal(pool: &DbPool, filter: TaskFilter) -> FarmResult<Vec<Task>> {
    let sql = format!(
        "{}
         WHERE ($1 IS NULL OR t.field_id = $1)
           AND ($2 IS NULL OR t.worker_id = $2)
           AND ($3 IS NULL OR t.status = $3)
         ORDER BY t.task_id DESC",
        TASK_SELECT
    );
    Ok(sqlx::query_as::<_, Task>(&sql)
        .bind(filter.field_id)
        .bind(filter.worker_id)
        .bind(optional_text(filter.status))
        .fetch_all(pool)
        .await?)
}

pub async fn get_task_internal(pool: &DbPool, task_id: i64) -> FarmResult<Task> {
    sqlx::query_as::<_, Task>(&format!("{} WHERE t.task_id = $1", TASK_SELECT))
        .bind(task_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| FarmError::NotFound(format!("Task {} not found", task_id)))
}

pub async fn create_task_internal(pool: &DbPool, input: TaskInput) -> FarmResult<Task> {
    let t = validate(pool, input).await?;
    let (task_id,): (i64,) = sqlx::query_as(
        "INSERT INTO tasks (name, description, priority, status, field_id, worker_id)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING task_id",
    )
    .bind(t.name)
    .bind(t.description)
    .bind(t.priority)
    .bind(t.status)
    .bind(t.field_id)
    .bind(t.worker_id)
    .fetch_one(pool)
    .await?;

    tracing::info!("Task {} created on field {}", task_id, t.field_id);
    get_task_internal(pool, task_id).await
}

pub async fn update_task_internal(
    pool: &DbPool,
    task_id: i64,
    input: TaskInput,
) -> FarmResult<Task> {
    let t = validate(pool, input).await?;
    let result = sqlx::query(
        "UPDATE tasks
         SET name = $1, description = $2, priority = $3, status = $4, field_id = $5, worker_id = $6
         WHERE task_id = $7",
    )
    .bind(t.name)
    .bind(t.description)
    .bind(t.priority)
    .bind(t.status)
    .bind(t.field_id)
    .bind(t.worker_id)
    .bind(task_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(FarmError::NotFound(format!("Task {} not found", task_id)));
    }
    get_task_internal(pool, task_id).await
}

pub async fn delete_task_internal(pool: &DbPool, task_id: i64) -> FarmResult<()> {
    let result = sqlx::query("DELETE FROM tasks WHERE task_id = $1")
        .bind(task_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(FarmError::NotFound(format!("Task {} not found", task_id)));
    }
    Ok(())
}

pub async fn list_tasks_axum(
    AxumState(state): AxumState<AppState>,
    Query(filter): Query<TaskFilter>,
) -> FarmResult<Json<Vec<Task>>> {
    Ok(Json(list_tasks_internal(&state.pool, filter).await?))
}

pub async fn get_task_axum(
    AxumState(state): AxumState<AppState>,
    Path(task_id): Path<i64>,
) -> FarmResult<Json<Task>> {
    Ok(Json(get_task_internal(&state.pool, task_id).await?))
}

pub async fn create_task_axum(
    AxumState(state): AxumState<AppState>,
    payload: Result<Json<TaskInput>, JsonRejection>,
) -> FarmResult<Json<Task>> {
    let Json(input) = payload?;
    Ok(Json(create_task_internal(&state.pool, input).await?))
}

pub async fn update_task_axum(
    AxumState(state): AxumState<AppState>,
    Path(task_id): Path<i64>,
    payload: Result<Json<TaskInput>, JsonRejection>,
) -> FarmResult<Json<Task>> {
    let Json(input) = payload?;
    Ok(Json(update_task_internal(&state.pool, task_id, input).await?))
}

pub async fn delete_task_axum(
    AxumState(state): AxumState<AppState>,
    Path(task_id): Path<i64>,
) -> FarmResult<Json<()>> {
    delete_task_internal(&state.pool, task_id).await?;
    Ok(Json(()))
}
