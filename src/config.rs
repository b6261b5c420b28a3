use anyhow::{Context, Result};
use chrono_tz::Tz;
use figment::{providers::{Env, Format, Serialized, Toml}, Figment};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use validator::{Validate, ValidationError};

use crate::domain::{Tower, TowerSummary};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub server: ServerConfig,
    #[validate(nested)]
    pub simulation: SimulationConfig,
    #[validate(nested)]
    pub retention: RetentionConfig,
    #[serde(default)]
    pub towers: Vec<Tower>,
    #[serde(default)]
    pub tower_summaries: Vec<TowerSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    #[validate(range(min = 1))]
    pub request_timeout_secs: u64,
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:3001".to_string(),
            ],
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SimulationConfig {
    /// IANA zone used for hour-of-day and weekday effects
    #[validate(custom(function = "validate_timezone"))]
    pub timezone: String,
    /// Fixed seed for reproducible output; entropy when absent
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("invalid timezone '{}': {}", self.timezone, e))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RetentionConfig {
    pub enabled: bool,
    #[validate(range(min = 1))]
    pub horizon_days: i64,
    #[validate(range(max = 23))]
    pub cleanup_hour: u32,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            horizon_days: 7,
            cleanup_hour: 2,
        }
    }
}

fn validate_timezone(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<Tz>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("timezone"))
}

impl Config {
    /// Defaults, then `config/default.toml`, then `TTS__`-prefixed env vars.
    pub fn load() -> Result<Self> {
        Self::from_figment(
            Figment::new()
                .merge(Serialized::defaults(Config::default()))
                .merge(Toml::file("config/default.toml"))
                .merge(Env::prefixed("TTS__").split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let cfg: Config = figment.extract().context("failed to read configuration")?;
        cfg.validate().context("invalid configuration")?;
        Ok(cfg)
    }
}
