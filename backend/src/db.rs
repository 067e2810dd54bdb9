use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;

use crate::error::{FarmError, FarmResult};

pub type DbPool = Pool<Sqlite>;

pub async fn init_pool(database_url: &str) -> FarmResult<DbPool> {
    let in_memory = database_url.contains(":memory:");
    if !in_memory {
        ensure_parent_dir(database_url)?;
    }

    let opts = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| FarmError::Internal(format!("Invalid DB URL: {}", e)))?
        .create_if_missing(true)
        .foreign_keys(true);

    // An in-memory database lives only as long as its connection.
    let pool_opts = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .idle_timeout(std::time::Duration::from_secs(120))
    };

    Ok(pool_opts.connect_with(opts).await?)
}

pub async fn init_database(pool: &DbPool) -> FarmResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database schema ready");
    Ok(())
}

fn ensure_parent_dir(database_url: &str) -> FarmResult<()> {
    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Field {
    pub field_id: i64,
    pub name: String,
    pub area: f64,
    pub soil_type: Option<String>,
    pub irrigation_type: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Worker {
    pub worker_id: i64,
    pub full_name: String,
    pub phone: Option<String>,
    pub daily_wage: i64,
    pub skills: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Task {
    pub task_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub priority: String,
    pub status: String,
    pub field_id: i64,
    pub worker_id: Option<i64>,
    #[sqlx(default)]
    pub field_name: Option<String>,
    #[sqlx(default)]
    pub worker_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct InventoryItem {
    pub item_id: i64,
    pub name: String,
    pub category: Option<String>,
    pub stock: f64,
    pub unit: Option<String>,
    pub alert_threshold: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Transaction {
    pub transaction_id: i64,
    pub description: String,
    pub category: Option<String>,
    pub amount: f64,
    #[serde(rename = "type")]
    pub txn_type: String,
    #[serde(rename = "date")]
    pub txn_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct FinanceSummary {
    pub income: f64,
    pub expense: f64,
    pub profit: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct ProduceListing {
    pub listing_id: i64,
    pub farmer_name: String,
    pub location: String,
    pub crop_type: String,
    pub quantity: f64,
    pub expected_price: f64,
    pub harvest_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub listed_at: NaiveDateTime,
}

#[cfg(test)]
pub async fn test_pool() -> DbPool {
    let pool = init_pool("sqlite::memory:")
        .await
        .expect("Failed to create in-memory pool");
    init_database(&pool).await.expect("Failed to migrate");
    pool
}
