use crate::commands::utils::{optional_text, parse_optional_date, positive_number, required_text};
use crate::db::{DbPool, FinanceSummary, Transaction};
use crate::error::{FarmError, FarmResult};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State as AxumState},
    Json,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TransactionInput {
    pub description: String,
    pub category: Option<String>,
    pub amount: f64,
    #[serde(rename = "type")]
    pub txn_type: String,
    pub date: Option<String>,
}

const TXN_COLUMNS: &str = "transaction_id, description, category, amount, txn_type, txn_date";

struct ValidTransaction {
    description: String,
    category: Option<String>,
    amount: f64,
    txn_type: &'static str,
    txn_date: NaiveDate,
}

/// `income` / `Income` / `INCOME` all store as `Income`.
pub fn normalize_txn_type(raw: &str) -> FarmResult<&'static str> {
    match raw.trim().to_lowercase().as_str() {
        "income" => Ok("Income"),
        "expense" => Ok("Expense"),
        _ => Err(FarmError::Validation(format!(
            "Transaction type must be Income or Expense, got '{}'",
            raw
        ))),
    }
}

fn validate(input: TransactionInput) -> FarmResult<ValidTransaction> {
    Ok(ValidTransaction {
        description: required_text(&input.description, "Description")?,
        category: optional_text(input.category),
        amount: positive_number(input.amount, "Amount")?,
        txn_type: normalize_txn_type(&input.txn_type)?,
        txn_date: parse_optional_date(input.date.as_deref(), "date")?
            .unwrap_or_else(|| Local::now().date_naive()),
    })
}

pub async fn list_transactions_internal(pool: &DbPool) -> FarmResult<Vec<Transaction>> {
    Ok(sqlx::query_as::<_, Transaction>(&format!(
        "SELECT {} FROM transactions ORDER BY txn_date DESC, transaction_id DESC",
        TXN_COLUMNS
    ))
    .fetch_all(pool)
    .await?)
}

pub async fn get_transaction_internal(pool: &DbPool, transaction_id: i64) -> FarmResult<Transaction> {
    sqlx::query_as::<_, Transaction>(&format!(
        "SELECT {} FROM transactions WHERE transaction_id = $1",
        TXN_COLUMNS
    ))
    .bind(transaction_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| FarmError::NotFound(format!("Transaction {} not found", transaction_id)))
}

pub async fn create_transaction_internal(
    pool: &DbPool,
    input: TransactionInput,
) -> FarmResult<Transaction> {
    let t = validate(input)?;
    let txn = sqlx::query_as::<_, Transaction>(&format!(
        "INSERT INTO transactions (description, category, amount, txn_type, txn_date)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {}",
        TXN_COLUMNS
    ))
    .bind(t.description)
    .bind(t.category)
    .bind(t.amount)
    .bind(t.txn_type)
    .bind(t.txn_date)
    .fetch_one(pool)
    .await?;

    tracing::info!(
        "{} of {} recorded on {}",
        txn.txn_type,
        txn.amount,
        txn.txn_date
    );
    Ok(txn)
}

pub async fn update_transaction_internal(
    pool: &DbPool,
    transaction_id: i64,
    input: TransactionInput,
) -> FarmResult<Transaction> {
    let t = validate(input)?;
    sqlx::query_as::<_, Transaction>(&format!(
        "UPDATE transactions
         SET description = $1, category = $2, amount = $3, txn_type = $4, txn_date = $5
         WHERE transaction_id = $6
         RETURNING {}",
        TXN_COLUMNS
    ))
    .bind(t.description)
    .bind(t.category)
    .bind(t.amount)
    .bind(t.txn_type)
    .bind(t.txn_date)
    .bind(transaction_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| FarmError::NotFound(format!("Transaction {} not found", transaction_id)))
}

pub async fn delete_transaction_internal(pool: &DbPool, transaction_id: i64) -> FarmResult<()> {
    let result = sqlx::query("DELETE FROM transactions WHERE transaction_id = $1")
        .bind(transaction_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(FarmError::NotFound(format!(
            "Transaction {} not found",
            transaction_id
        )));
    }
    Ok(())
}

/// Totals over every recorded transaction; profit is income minus expense.
pub async fn get_finance_summary_internal(pool: &DbPool) -> FarmResult<FinanceSummary> {
    let (income, expense): (f64, f64) = sqlx::query_as(
        "SELECT
            CAST(COALESCE(SUM(CASE WHEN txn_type = 'Income' THEN amount END), 0) AS REAL),
            CAST(COALESCE(SUM(CASE WHEN txn_type = 'Expense' THEN amount END), 0) AS REAL)
         FROM transactions",
    )
    .fetch_one(pool)
    .await?;

    Ok(FinanceSummary {
        income,
        expense,
        profit: income - expense,
    })
}

pub async fn list_transactions_axum(
    AxumState(state): AxumState<AppState>,
) -> FarmResult<Json<Vec<Transaction>>> {
    Ok(Json(list_transactions_internal(&state.pool).await?))
}

pub async fn get_transaction_axum(
    AxumState(state): AxumState<AppState>,
    Path(transaction_id): Path<i64>,
) -> FarmResult<Json<Transaction>> {
    Ok(Json(get_transaction_internal(&state.pool, transaction_id).await?))
}

pub async fn create_transaction_axum(
    AxumState(state): AxumState<AppState>,
    payload: Result<Json<TransactionInput>, JsonRejection>,
) -> FarmResult<Json<Transaction>> {
    let Json(input) = payload?;
    Ok(Json(create_transaction_internal(&state.pool, input).await?))
}

pub async fn update_transaction_axum(
    AxumState(state): AxumState<AppState>,
    Path(transaction_id): Path<i64>,
    payload: Result<Json<TransactionInput>, JsonRejection>,
) -> FarmResult<Json<Transaction>> {
    let Json(input) = payload?;
    Ok(Json(
        update_transaction_internal(&state.pool, transaction_id, input).await?,
    ))
}

pub async fn delete_transaction_axum(
    AxumState(state): AxumState<AppState>,
    Path(transaction_id): Path<i64>,
) -> FarmResult<Json<()>> {
    delete_transaction_internal(&state.pool, transaction_id).await?;
    Ok(Json(()))
}

pub async fn get_finance_summary_axum(
    AxumState(state): AxumState<AppState>,
) -> FarmResult<Json<FinanceSummary>> {
    Ok(Json(get_finance_summary_internal(&state.pool).await?))
}
