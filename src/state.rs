use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::domain::TowerCatalog;
use crate::repo::{InMemoryTelemetryRepository, TelemetryRepository};
use crate::retention::{spawn_retention_task, RetentionService};
use crate::simulation::{RngDrawSource, SystemClock, TelemetrySimulator};

#[derive(Clone)]
pub struct AppState {
    pub simulator: Arc<TelemetrySimulator>,
    pub repo: Arc<dyn TelemetryRepository>,
    pub retention: Arc<RetentionService>,
    pub catalog: Arc<TowerCatalog>,
}

impl AppState {
    pub fn new(cfg: &Config) -> Result<Self> {
        let tz = cfg.simulation.tz()?;
        let simulator = Arc::new(TelemetrySimulator::new(
            Box::new(RngDrawSource::from_seed_option(cfg.simulation.seed)),
            Arc::new(SystemClock),
            tz,
        ));
        let catalog = TowerCatalog::new(cfg.towers.clone(), cfg.tower_summaries.clone());

        info!(
            timezone = %tz,
            seeded = cfg.simulation.seed.is_some(),
            towers = catalog.towers().len(),
            "simulator initialised"
        );

        Ok(Self::from_parts(
            simulator,
            Arc::new(InMemoryTelemetryRepository::new()),
            catalog,
            cfg.retention.horizon_days,
        ))
    }

    pub fn from_parts(
        simulator: Arc<TelemetrySimulator>,
        repo: Arc<dyn TelemetryRepository>,
        catalog: TowerCatalog,
        horizon_days: i64,
    ) -> Self {
        let retention = Arc::new(RetentionService::new(
            simulator.clone(),
            repo.clone(),
            horizon_days,
        ));
        Self {
            simulator,
            repo,
            retention,
            catalog: Arc::new(catalog),
        }
    }
}

pub fn spawn_background_tasks(state: &AppState, cfg: &Config) {
    if !cfg.retention.enabled {
        info!("retention cleanup disabled");
        return;
    }
    spawn_retention_task(
        state.retention.clone(),
        cfg.retention.cleanup_hour,
        state.simulator.timezone(),
    );
}
