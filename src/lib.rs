//! Correlated stochastic telemetry for cellular tower dashboards.
//!
//! [`simulation`] holds the generator; [`api`] exposes it over HTTP
//! together with sample storage and retention.

pub mod api;
pub mod config;
pub mod domain;
pub mod repo;
pub mod retention;
pub mod simulation;
pub mod state;
pub mod telemetry;
