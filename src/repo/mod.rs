//! Persistence for stored telemetry samples.
//!
//! Storage assigns identity; generated samples never carry one.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::TelemetrySample;

pub mod memory;

pub use memory::InMemoryTelemetryRepository;

/// A persisted sample together with its storage-assigned id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSample {
    pub id: u64,
    #[serde(flatten)]
    pub sample: TelemetrySample,
}

#[async_trait]
pub trait TelemetryRepository: Send + Sync {
    /// Persist samples, returning the ids assigned in insertion order
    async fn insert_batch(&self, samples: Vec<TelemetrySample>) -> Result<Vec<u64>>;

    async fn count(&self) -> Result<u64>;

    /// Rows whose timestamp is at or after `since`
    async fn count_since(&self, since: DateTime<Utc>) -> Result<u64>;

    /// Remove rows strictly older than `cutoff`; returns how many were removed
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64>;

    /// Up to `limit` rows, newest timestamp first
    async fn recent(&self, limit: usize) -> Result<Vec<StoredSample>>;
}
