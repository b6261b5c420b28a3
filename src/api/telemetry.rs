use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::debug;

use super::error::ApiError;
use crate::domain::{TelemetrySample, TimeRange};
use crate::simulation::BaselineState;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub time_range: Option<String>,
}

/// GET /api/telemetry/live - one freshly generated sample, wrapped in a list
pub async fn live(State(state): State<AppState>) -> Json<Vec<TelemetrySample>> {
    Json(vec![state.simulator.live_sample()])
}

/// GET /api/telemetry/tower/:tower_id/history?timeRange=24h
///
/// The tower id only scopes the request; every tower shares one simulated series.
pub async fn tower_history(
    State(state): State<AppState>,
    Path(tower_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<TelemetrySample>>, ApiError> {
    let range = query
        .time_range
        .as_deref()
        .map(TimeRange::from_key)
        .unwrap_or_default();
    debug!(%tower_id, %range, "historical series requested");

    let simulator = state.simulator.clone();
    let series = tokio::task::spawn_blocking(move || simulator.historical_series(range)).await?;
    Ok(Json(series))
}

/// GET /api/simulation/baseline - current drifting baseline
pub async fn baseline(State(state): State<AppState>) -> Json<BaselineState> {
    Json(state.simulator.baseline())
}
