use crate::commands::utils::{optional_text, parse_optional_date, positive_number, required_text};
use crate::db::{DbPool, ProduceListing};
use crate::error::{FarmError, FarmResult};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State as AxumState},
    Json,
};
use chrono::Local;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListingInput {
    pub farmer_name: String,
    pub location: String,
    pub crop_type: String,
    pub quantity: f64,
    pub expected_price: f64,
    pub harvest_date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListingSearch {
    pub crop: Option<String>,
    pub location: Option<String>,
    /// Kept as text so an empty form value means "no ceiling".
    pub max_price: Option<String>,
}

const LISTING_COLUMNS: &str = "listing_id, farmer_name, location, crop_type, quantity, \
     expected_price, harvest_date, description, listed_at";

pub async fn create_listing_internal(
    pool: &DbPool,
    input: ListingInput,
) -> FarmResult<ProduceListing> {
    let farmer_name = required_text(&input.farmer_name, "Farmer name")?;
    let location = required_text(&input.location, "Location")?;
    let crop_type = required_text(&input.crop_type, "Crop type")?;
    let quantity = positive_number(input.quantity, "Quantity")?;
    let expected_price = positive_number(input.expected_price, "Expected price")?;
    let harvest_date = parse_optional_date(input.harvest_date.as_deref(), "harvest date")?;
    let listed_at = Local::now().naive_local();

    let listing = sqlx::query_as::<_, ProduceListing>(&format!(
        "INSERT INTO produce_listings
            (farmer_name, location, crop_type, quantity, expected_price, harvest_date, description, listed_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING {}",
        LISTING_COLUMNS
    ))
    .bind(farmer_name)
    .bind(location)
    .bind(crop_type)
    .bind(quantity)
    .bind(expected_price)
    .bind(harvest_date)
    .bind(optional_text(input.description))
    .bind(listed_at)
    .fetch_one(pool)
    .await?;

    tracing::info!(
        "Listing {} posted: {} {} in {}",
        listing.listing_id,
        listing.quantity,
        listing.crop_type,
        listing.location
    );
    Ok(listing)
}

/// Crop and location match as case-insensitive substrings, the price as a
/// ceiling. Newest listings first.
pub async fn search_listings_internal(
    pool: &DbPool,
    search: ListingSearch,
) -> FarmResult<Vec<ProduceListing>> {
    let max_price = match optional_text(search.max_price) {
        Some(raw) => Some(raw.parse::<f64>().map_err(|_| {
            FarmError::Validation(format!("Invalid max price: '{}'", raw))
        })?),
        None => None,
    };

    let sql = format!(
        "SELECT {} FROM produce_listings
         WHERE ($1 IS NULL OR instr(LOWER(crop_type), LOWER($1)) > 0)
           AND ($2 IS NULL OR instr(LOWER(location), LOWER($2)) > 0)
           AND ($3 IS NULL OR expected_price <= $3)
         ORDER BY listed_at DESC, listing_id DESC",
        LISTING_COLUMNS
    );
    Ok(sqlx::query_as::<_, ProduceListing>(&sql)
        .bind(optional_text(search.crop))
        .bind(optional_text(search.location))
        .bind(max_price)
        .fetch_all(pool)
        .await?)
}

pub async fn delete_listing_internal(pool: &DbPool, listing_id: i64) -> FarmResult<()> {
    let result = sqlx::query("DELETE FROM produce_listings WHERE listing_id = $1")
        .bind(listing_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(FarmError::NotFound(format!(
            "Listing {} not found",
            listing_id
        )));
    }
    Ok(())
}

pub async fn search_listings_axum(
    AxumState(state): AxumState<AppState>,
    Query(search): Query<ListingSearch>,
) -> FarmResult<Json<Vec<ProduceListing>>> {
    Ok(Json(search_listings_internal(&state.pool, search).await?))
}

pub async fn create_listing_axum(
    AxumState(state): AxumState<AppState>,
    payload: Result<Json<ListingInput>, JsonRejection>,
) -> FarmResult<Json<ProduceListing>> {
    let Json(input) = payload?;
    Ok(Json(create_listing_internal(&state.pool, input).await?))
}

pub async fn delete_listing_axum(
    AxumState(state): AxumState<AppState>,
    Path(listing_id): Path<i64>,
) -> FarmResult<Json<()>> {
    delete_listing_internal(&state.pool, listing_id).await?;
    Ok(Json(()))
}
