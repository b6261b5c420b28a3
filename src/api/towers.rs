use axum::{
    extract::{Path, State},
    Json,
};

use super::error::ApiError;
use crate::domain::{Tower, TowerSummary};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> Json<Vec<Tower>> {
    Json(state.catalog.towers().to_vec())
}

pub async fn summaries(State(state): State<AppState>) -> Json<Vec<TowerSummary>> {
    Json(state.catalog.summaries().to_vec())
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Tower>, ApiError> {
    state
        .catalog
        .find(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("tower {}", id)))
}
