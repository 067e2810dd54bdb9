use crate::commands::utils::{non_negative_number, optional_text, required_text};
use crate::db::{DbPool, InventoryItem};
use crate::error::{FarmError, FarmResult};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State as AxumState},
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct InventoryInput {
    pub name: String,
    pub category: Option<String>,
    #[serde(default)]
    pub stock: f64,
    pub unit: Option<String>,
    pub alert_threshold: Option<f64>,
}

const ITEM_COLUMNS: &str = "item_id, name, category, stock, unit, alert_threshold";

fn validate(input: InventoryInput) -> FarmResult<InventoryInput> {
    let alert_threshold = match input.alert_threshold {
        Some(t) => Some(non_negative_number(t, "Alert threshold")?),
        None => None,
    };
    Ok(InventoryInput {
        name: required_text(&input.name, "Item name")?,
        category: optional_text(input.category),
        stock: non_negative_number(input.stock, "Stock")?,
        unit: optional_text(input.unit),
        alert_threshold,
    })
}

pub async fn list_items_internal(pool: &DbPool) -> FarmResult<Vec<InventoryItem>> {
    Ok(sqlx::query_as::<_, InventoryItem>(&format!(
        "SELECT {} FROM inventory_items ORDER BY category, name",
        ITEM_COLUMNS
    ))
    .fetch_all(pool)
    .await?)
}

/// Items at or below their alert threshold. The threshold only drives this
/// listing; nothing blocks stock from going lower.
pub async fn list_low_stock_internal(pool: &DbPool) -> FarmResult<Vec<InventoryItem>> {
    Ok(sqlx::query_as::<_, InventoryItem>(&format!(
        "SELECT {} FROM inventory_items
         WHERE alert_threshold IS NOT NULL AND stock <= alert_threshold
         ORDER BY stock ASC",
        ITEM_COLUMNS
    ))
    .fetch_all(pool)
    .await?)
}

pub async fn get_item_internal(pool: &DbPool, item_id: i64) -> FarmResult<InventoryItem> {
    sqlx::query_as::<_, InventoryItem>(&format!(
        "SELECT {} FROM inventory_items WHERE item_id = $1",
        ITEM_COLUMNS
    ))
    .bind(item_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| FarmError::NotFound(format!("Inventory item {} not found", item_id)))
}

pub async fn create_item_internal(
    pool: &DbPool,
    input: InventoryInput,
) -> FarmResult<InventoryItem> {
    let i = validate(input)?;
    Ok(sqlx::query_as::<_, InventoryItem>(&format!(
        "INSERT INTO inventory_items (name, category, stock, unit, alert_threshold)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {}",
        ITEM_COLUMNS
    ))
    .bind(i.name)
    .bind(i.category)
    .bind(i.stock)
    .bind(i.unit)
    .bind(i.alert_threshold)
    .fetch_one(pool)
    .await?)
}

pub async fn update_item_internal(
    pool: &DbPool,
    item_id: i64,
    input: InventoryInput,
) -> FarmResult<InventoryItem> {
    let i = validate(input)?;
    sqlx::query_as::<_, InventoryItem>(&format!(
        "UPDATE inventory_items
         SET name = $1, category = $2, stock = $3, unit = $4, alert_threshold = $5
         WHERE item_id = $6
         RETURNING {}",
        ITEM_COLUMNS
    ))
    .bind(i.name)
    .bind(i.category)
    .bind(i.stock)
    .bind(i.unit)
    .bind(i.alert_threshold)
    .bind(item_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| FarmError::NotFound(format!("Inventory item {} not found", item_id)))
}

pub async fn delete_item_internal(pool: &DbPool, item_id: i64) -> FarmResult<()> {
    let result = sqlx::query("DELETE FROM inventory_items WHERE item_id = $1")
        .bind(item_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(FarmError::NotFound(format!(
            "Inventory item {} not found",
            item_id
        )));
    }
    Ok(())
}

pub async fn list_items_axum(
    AxumState(state): AxumState<AppState>,
) -> FarmResult<Json<Vec<InventoryItem>>> {
    Ok(Json(list_items_internal(&state.pool).await?))
}

pub async fn list_low_stock_axum(
    AxumState(state): AxumState<AppState>,
) -> FarmResult<Json<Vec<InventoryItem>>> {
    Ok(Json(list_low_stock_internal(&state.pool).await?))
}

pub async fn get_item_axum(
    AxumState(state): AxumState<AppState>,
    Path(item_id): Path<i64>,
) -> FarmResult<Json<InventoryItem>> {
    Ok(Json(get_item_internal(&state.pool, item_id).await?))
}

pub async fn create_item_axum(
    AxumState(state): AxumState<AppState>,
    payload: Result<Json<InventoryInput>, JsonRejection>,
) -> FarmResult<Json<InventoryItem>> {
    let Json(input) = payload?;
    Ok(Json(create_item_internal(&state.pool, input).await?))
}

pub async fn update_item_axum(
    AxumState(state): AxumState<AppState>,
    Path(item_id): Path<i64>,
    payload: Result<Json<InventoryInput>, JsonRejection>,
) -> FarmResult<Json<InventoryItem>> {
    let Json(input) = payload?;
    Ok(Json(update_item_internal(&state.pool, item_id, input).await?))
}

pub async fn delete_item_axum(
    AxumState(state): AxumState<AppState>,
    Path(item_id): Path<i64>,
) -> FarmResult<Json<()>> {
    delete_item_internal(&state.pool, item_id).await?;
    Ok(Json(()))
}
