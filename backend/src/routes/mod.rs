use crate::middleware::response::wrap_response_middleware;
use crate::state::AppState;
use axum::{middleware, Router};

pub mod advisory;
pub mod farm;
pub mod market;
pub mod system;

/// Record and system routes answer in the `{success, data}` envelope; the
/// advisory routes return their payload as-is.
pub fn create_router() -> Router<AppState> {
    let enveloped = Router::new()
        .merge(system::router())
        .merge(farm::router())
        .merge(market::router())
        .layer(middleware::from_fn(wrap_response_middleware));

    Router::new().merge(enveloped).merge(advisory::router())
}
