use crate::commands::utils::{optional_text, positive_number, required_text};
use crate::db::{DbPool, Field};
use crate::error::{FarmError, FarmResult};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State as AxumState},
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct FieldInput {
    pub name: String,
    pub area: f64,
    pub soil_type: Option<String>,
    pub irrigation_type: Option<String>,
    pub status: Option<String>,
}

const FIELD_COLUMNS: &str = "field_id, name, area, soil_type, irrigation_type, status";

struct ValidField {
    name: String,
    area: f64,
    soil_type: Option<String>,
    irrigation_type: Option<String>,
    status: String,
}

fn validate(input: FieldInput) -> FarmResult<ValidField> {
    Ok(ValidField {
        name: required_text(&input.name, "Field name")?,
        area: positive_number(input.area, "Area")?,
        soil_type: optional_text(input.soil_type),
        irrigation_type: optional_text(input.irrigation_type),
        status: optional_text(input.status).unwrap_or_else(|| "Active".to_string()),
    })
}

pub async fn list_fields_internal(pool: &DbPool) -> FarmResult<Vec<Field>> {
    Ok(sqlx::query_as::<_, Field>(&format!(
        "SELECT {} FROM fields ORDER BY field_id DESC",
        FIELD_COLUMNS
    ))
    .fetch_all(pool)
    .await?)
}

pub async fn get_field_internal(pool: &DbPool, field_id: i64) -> FarmResult<Field> {
    sqlx::query_as::<_, Field>(&format!(
        "SELECT {} FROM fields WHERE field_id = $1",
        FIELD_COLUMNS
    ))
    .bind(field_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| FarmError::NotFound(format!("Field {} not found", field_id)))
}

pub async fn create_field_internal(pool: &DbPool, input: FieldInput) -> FarmResult<Field> {
    let f = validate(input)?;
    let field = sqlx::query_as::<_, Field>(&format!(
        "INSERT INTO fields (name, area, soil_type, irrigation_type, status)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {}",
        FIELD_COLUMNS
    ))
    .bind(f.name)
    .bind(f.area)
    .bind(f.soil_type)
    .bind(f.irrigation_type)
    .bind(f.status)
    .fetch_one(pool)
    .await?;

    tracing::info!("Field {} created: {}", field.field_id, field.name);
    Ok(field)
}

pub async fn update_field_internal(
    pool: &DbPool,
    field_id: i64,
    input: FieldInput,
) -> FarmResult<Field> {
    let f = validate(input)?;
    sqlx::query_as::<_, Field>(&format!(
        "UPDATE fields
         SET name = $1, area = $2, soil_type = $3, irrigation_type = $4, status = $5
         WHERE field_id = $6
         RETURNING {}",
        FIELD_COLUMNS
    ))
    .bind(f.name)
    .bind(f.area)
    .bind(f.soil_type)
    .bind(f.irrigation_type)
    .bind(f.status)
    .bind(field_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| FarmError::NotFound(format!("Field {} not found", field_id)))
}

/// Tasks on the field go with it.
pub async fn delete_field_internal(pool: &DbPool, field_id: i64) -> FarmResult<()> {
    let result = sqlx::query("DELETE FROM fields WHERE field_id = $1")
        .bind(field_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(FarmError::NotFound(format!("Field {} not found", field_id)));
    }
    Ok(())
}

pub async fn list_fields_axum(
    AxumState(state): AxumState<AppState>,
) -> FarmResult<Json<Vec<Field>>> {
    Ok(Json(list_fields_internal(&state.pool).await?))
}

pub async fn get_field_axum(
    AxumState(state): AxumState<AppState>,
    Path(field_id): Path<i64>,
) -> FarmResult<Json<Field>> {
    Ok(Json(get_field_internal(&state.pool, field_id).await?))
}

pub async fn create_field_axum(
    AxumState(state): AxumState<AppState>,
    payload: Result<Json<FieldInput>, JsonRejection>,
) -> FarmResult<Json<Field>> {
    let Json(input) = payload?;
    Ok(Json(create_field_internal(&state.pool, input).await?))
}

pub async fn update_field_axum(
    AxumState(state): AxumState<AppState>,
    Path(field_id): Path<i64>,
    payload: Result<Json<FieldInput>, JsonRejection>,
) -> FarmResult<Json<Field>> {
    let Json(input) = payload?;
    Ok(Json(update_field_internal(&state.pool, field_id, input).await?))
}

pub async fn delete_field_axum(
    AxumState(state): AxumState<AppState>,
    Path(field_id): Path<i64>,
) -> FarmResult<Json<()>> {
    delete_field_internal(&state.pool, field_id).await?;
    Ok(Json(()))
}
