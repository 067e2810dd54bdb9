use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/market/listings",
            get(commands::market::search_listings_axum),
        )
        .route("/api/market/sell", post(commands::market::create_listing_axum))
        .route(
            "/api/market/listings/:id/delete",
            post(commands::market::delete_listing_axum),
        )
}
