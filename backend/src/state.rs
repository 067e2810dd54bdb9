use crate::advisory::Advisor;
use crate::db::DbPool;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub advisor: Arc<Advisor>,
    pub upload_dir: PathBuf, // scratch space for diagnosis images
}

impl axum::extract::FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<Advisor> {
    fn from_ref(state: &AppState) -> Self {
        state.advisor.clone()
    }
}
