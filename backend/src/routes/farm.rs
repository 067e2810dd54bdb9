use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        // Fields
        .route(
            "/api/farm/fields",
            get(commands::field::list_fields_axum).post(commands::field::create_field_axum),
        )
        .route("/api/farm/fields/:id", get(commands::field::get_field_axum))
        .route(
            "/api/farm/fields/:id/update",
            post(commands::field::update_field_axum),
        )
        .route(
            "/api/farm/fields/:id/delete",
            post(commands::field::delete_field_axum),
        )
        // Workers
        .route(
            "/api/farm/workers",
            get(commands::worker::list_workers_axum).post(commands::worker::create_worker_axum),
        )
        .route("/api/farm/workers/:id", get(commands::worker::get_worker_axum))
        .route(
            "/api/farm/workers/:id/update",
            post(commands::worker::update_worker_axum),
        )
        .route(
            "/api/farm/workers/:id/delete",
            post(commands::worker::delete_worker_axum),
        )
        // Tasks
        .route(
            "/api/farm/tasks",
            get(commands::task::list_tasks_axum).post(commands::task::create_task_axum),
        )
        .route("/api/farm/tasks/:id", get(commands::task::get_task_axum))
        .route(
            "/api/farm/tasks/:id/update",
            post(commands::task::update_task_axum),
        )
        .route(
            "/api/farm/tasks/:id/delete",
            post(commands::task::delete_task_axum),
        )
        // Inventory
        .route(
            "/api/farm/inventory",
            get(commands::inventory::list_items_axum).post(commands::inventory::create_item_axum),
        )
        .route(
            "/api/farm/inventory/low-stock",
            get(commands::inventory::list_low_stock_axum),
        )
        .route(
            "/api/farm/inventory/:id",
            get(commands::inventory::get_item_axum),
        )
        .route(
            "/api/farm/inventory/:id/update",
            post(commands::inventory::update_item_axum),
        )
        .route(
            "/api/farm/inventory/:id/delete",
            post(commands::inventory::delete_item_axum),
        )
        // Finance
        .route(
            "/api/farm/finance",
            get(commands::finance::list_transactions_axum)
                .post(commands::finance::create_transaction_axum),
        )
        .route(
            "/api/farm/finance/summary",
            get(commands::finance::get_finance_summary_axum),
        )
        .route(
            "/api/farm/finance/:id",
            get(commands::finance::get_transaction_axum),
        )
        .route(
            "/api/farm/finance/:id/update",
            post(commands::finance::update_transaction_axum),
        )
        .route(
            "/api/farm/finance/:id/delete",
            post(commands::finance::delete_transaction_axum),
        )
}
