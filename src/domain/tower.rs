use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Static descriptive record for one tower site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tower {
    pub id: u64,
    pub name: String,
    pub status: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    #[serde(default)]
    pub use_case: Option<String>,
    pub region: String,
    #[serde(default)]
    pub model_3d_path: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Dashboard card for a tower; figures are whatever the catalog was loaded with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TowerSummary {
    pub id: u64,
    pub name: String,
    pub status: String,
    pub battery: f64,
    pub temperature: f64,
    pub uptime: f64,
    pub network_load: f64,
    pub city: String,
    pub region: String,
    #[serde(default)]
    pub use_case: Option<String>,
    #[serde(default)]
    pub last_maintenance: Option<DateTime<Utc>>,
}

/// Read-only tower catalog served next to the telemetry endpoints
#[derive(Debug, Clone, Default)]
pub struct TowerCatalog {
    towers: Vec<Tower>,
    summaries: Vec<TowerSummary>,
}

impl TowerCatalog {
    pub fn new(towers: Vec<Tower>, summaries: Vec<TowerSummary>) -> Self {
        Self { towers, summaries }
    }

    pub fn towers(&self) -> &[Tower] {
        &self.towers
    }

    pub fn summaries(&self) -> &[TowerSummary] {
        &self.summaries
    }

    pub fn find(&self, id: u64) -> Option<&Tower> {
        self.towers.iter().find(|t| t.id == id)
    }
}
