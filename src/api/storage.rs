use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::error::ApiError;
use crate::repo::StoredSample;
use crate::state::AppState;

pub const STORED_ACK: &str = "Live telemetry data stored successfully";

const DEFAULT_RECENT_LIMIT: usize = 50;
const MAX_RECENT_LIMIT: usize = 1_000;

#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

/// POST /api/telemetry/store
pub async fn store_live(State(state): State<AppState>) -> Result<&'static str, ApiError> {
    state.retention.store_live_sample().await?;
    Ok(STORED_ACK)
}

/// GET /api/storage/stats - plain-text summary line
pub async fn stats(State(state): State<AppState>) -> Result<String, ApiError> {
    Ok(state.retention.storage_stats().await?.to_string())
}

/// GET /api/storage/count
pub async fn count(State(state): State<AppState>) -> Result<Json<u64>, ApiError> {
    Ok(Json(state.retention.data_count().await?))
}

/// GET /api/storage/recent?limit=50 - newest stored rows with their ids
pub async fn recent(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<StoredSample>>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .min(MAX_RECENT_LIMIT);
    Ok(Json(state.repo.recent(limit).await?))
}
