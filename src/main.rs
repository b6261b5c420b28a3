use anyhow::Result;
use tower_telemetry_simulator::{api, config, state, telemetry};
use config::Config;
use telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e.into());
        }
    }

    init_tracing();

    let cfg = Config::load()?;

    let app_state = state::AppState::new(&cfg)?;
    let app = api::router(app_state.clone(), &cfg);

    let addr = cfg.server.socket_addr()?;

    if cfg.server.host == "0.0.0.0" {
        warn!("Server binding to 0.0.0.0 - simulator will be reachable from the network");
    }

    info!(%addr, "starting Tower Telemetry Simulator");

    state::spawn_background_tasks(&app_state, &cfg);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}
