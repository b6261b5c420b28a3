pub mod error;
pub mod health;
pub mod storage;
pub mod telemetry;
pub mod towers;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::{config::Config, state::AppState};

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/telemetry/live", get(telemetry::live))
        .route(
            "/telemetry/tower/:tower_id/history",
            get(telemetry::tower_history),
        )
        .route("/telemetry/store", post(storage::store_live))
        .route("/towers", get(towers::list))
        .route("/towers/summaries", get(towers::summaries))
        .route("/towers/:id", get(towers::get))
        .route("/storage/stats", get(storage::stats))
        .route("/storage/count", get(storage::count))
        .route("/storage/recent", get(storage::recent))
        .route("/simulation/baseline", get(telemetry::baseline))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(%origin, error=%e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

pub fn router(state: AppState, cfg: &Config) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check))
        .with_state(state)
        .layer(cors_layer(&cfg.server.cors_origins))
        .layer(
            ServiceBuilder::new().layer(TimeoutLayer::new(Duration::from_secs(
                cfg.server.request_timeout_secs,
            ))),
        )
        .layer(TraceLayer::new_for_http())
}
