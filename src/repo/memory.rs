use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{StoredSample, TelemetryRepository};
use crate::domain::TelemetrySample;

/// Process-local telemetry store. Ids start at 1 and are never reused.
#[derive(Debug)]
pub struct InMemoryTelemetryRepository {
    rows: RwLock<Vec<StoredSample>>,
    next_id: AtomicU64,
}

impl Default for InMemoryTelemetryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTelemetryRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl TelemetryRepository for InMemoryTelemetryRepository {
    async fn insert_batch(&self, samples: Vec<TelemetrySample>) -> Result<Vec<u64>> {
        if samples.is_empty() {
            return Ok(Vec::new());
        }

        let mut rows = self.rows.write().await;
        let mut ids = Vec::with_capacity(samples.len());
        for sample in samples {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            rows.push(StoredSample { id, sample });
            ids.push(id);
        }

        debug!(inserted = ids.len(), total = rows.len(), "Inserted telemetry rows");
        Ok(ids)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.rows.read().await.len() as u64)
    }

    async fn count_since(&self, since: DateTime<Utc>) -> Result<u64> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|r| r.sample.timestamp >= since).count() as u64)
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| r.sample.timestamp >= cutoff);
        let deleted = (before - rows.len()) as u64;

        info!("Deleted {} old telemetry records", deleted);
        Ok(deleted)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<StoredSample>> {
        let rows = self.rows.read().await;
        let mut out: Vec<StoredSample> = rows.iter().cloned().collect();
        out.sort_by(|a, b| {
            b.sample
                .timestamp
                .cmp(&a.sample.timestamp)
                .then(b.id.cmp(&a.id))
        });
        out.truncate(limit);
        Ok(out)
    }
}
