//! Storing live samples and expiring old ones.

use anyhow::Result;
use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::repo::TelemetryRepository;
use crate::simulation::TelemetrySimulator;

pub const DEFAULT_HORIZON_DAYS: i64 = 7;

/// Row counts reported by the storage stats endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStats {
    pub total: u64,
    pub last_24h: u64,
    pub last_7d: u64,
}

impl fmt::Display for StorageStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Storage Stats: Total={}, Last24h={}, Last7d={}",
            self.total, self.last_24h, self.last_7d
        )
    }
}

pub struct RetentionService {
    simulator: Arc<TelemetrySimulator>,
    repo: Arc<dyn TelemetryRepository>,
    horizon: Duration,
}

impl RetentionService {
    pub fn new(
        simulator: Arc<TelemetrySimulator>,
        repo: Arc<dyn TelemetryRepository>,
        horizon_days: i64,
    ) -> Self {
        Self {
            simulator,
            repo,
            horizon: Duration::days(horizon_days.max(1)),
        }
    }

    /// Generate one live sample and persist it; returns the stored id
    pub async fn store_live_sample(&self) -> Result<u64> {
        let sample = self.simulator.live_sample();
        let ids = self.repo.insert_batch(vec![sample]).await?;
        let id = ids
            .first()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("repository returned no id for stored sample"))?;
        info!(id, "Stored live telemetry sample");
        Ok(id)
    }

    /// Delete every sample older than the retention horizon
    pub async fn cleanup_expired(&self) -> Result<u64> {
        let cutoff = self.simulator.now() - self.horizon;
        let deleted = self.repo.delete_older_than(cutoff).await?;
        info!(deleted, cutoff = %cutoff, "Telemetry retention cleanup finished");
        Ok(deleted)
    }

    pub async fn data_count(&self) -> Result<u64> {
        self.repo.count().await
    }

    pub async fn storage_stats(&self) -> Result<StorageStats> {
        let now = self.simulator.now();
        Ok(StorageStats {
            total: self.repo.count().await?,
            last_24h: self.repo.count_since(now - Duration::hours(24)).await?,
            last_7d: self.repo.count_since(now - Duration::days(7)).await?,
        })
    }
}

/// Next instant strictly after `now` at which the local clock in `tz`
/// reads `hour:00`. Days where that hour is skipped by a DST jump are passed over.
pub fn next_cleanup_after(now: DateTime<Utc>, hour: u32, tz: Tz) -> DateTime<Utc> {
    let today = now.with_timezone(&tz).date_naive();
    (0..=2)
        .filter_map(|offset| {
            let day = today + Duration::days(offset);
            let naive = day.and_hms_opt(hour, 0, 0)?;
            tz.from_local_datetime(&naive).earliest()
        })
        .map(|local| local.with_timezone(&Utc))
        .find(|candidate| *candidate > now)
        .unwrap_or_else(|| now + Duration::days(1))
}

/// Run [`RetentionService::cleanup_expired`] once a day at `cleanup_hour` in `tz`.
pub fn spawn_retention_task(
    service: Arc<RetentionService>,
    cleanup_hour: u32,
    tz: Tz,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let now = service.simulator.now();
            let next = next_cleanup_after(now, cleanup_hour, tz);
            let wait = (next - now).to_std().unwrap_or_default();
            info!(next_run = %next, "Scheduled telemetry retention cleanup");
            tokio::time::sleep(wait).await;

            if let Err(e) = service.cleanup_expired().await {
                warn!(error=%e, "retention cleanup failed");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::InMemoryTelemetryRepository;
    use crate::simulation::{FixedClock, RngDrawSource};

    fn service_at(now: DateTime<Utc>) -> (RetentionService, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(now));
        let simulator = Arc::new(TelemetrySimulator::new(
            Box::new(RngDrawSource::seeded(3)),
            clock.clone(),
            Tz::UTC,
        ));
        let repo = Arc::new(InMemoryTelemetryRepository::new());
        (
            RetentionService::new(simulator, repo, DEFAULT_HORIZON_DAYS),
            clock,
        )
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_stats_display() {
        let stats = StorageStats {
            total: 10,
            last_24h: 4,
            last_7d: 9,
        };
        assert_eq!(
            stats.to_string(),
            "Storage Stats: Total=10, Last24h=4, Last7d=9"
        );
    }

    #[tokio::test]
    async fn test_store_and_stats() {
        let (service, clock) = service_at(noon() - Duration::days(10));
        service.store_live_sample().await.unwrap();
        clock.advance(Duration::days(7));
        service.store_live_sample().await.unwrap();
        clock.advance(Duration::days(3) - Duration::hours(1));
        let id = service.store_live_sample().await.unwrap();
        assert_eq!(id, 3);

        clock.advance(Duration::hours(1));
        let stats = service.storage_stats().await.unwrap();
        assert_eq!(
            stats,
            StorageStats {
                total: 3,
                last_24h: 1,
                last_7d: 2
            }
        );
        assert_eq!(service.data_count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_cleanup_removes_only_expired() {
        let (service, clock) = service_at(noon() - Duration::days(8));
        service.store_live_sample().await.unwrap();
        clock.advance(Duration::days(2));
        service.store_live_sample().await.unwrap();

        clock.advance(Duration::days(6));
        assert_eq!(service.cleanup_expired().await.unwrap(), 1);
        assert_eq!(service.data_count().await.unwrap(), 1);
        assert_eq!(service.cleanup_expired().await.unwrap(), 0);
    }

    #[test]
    fn test_next_cleanup_same_day_and_next_day() {
        let early = Utc.with_ymd_and_hms(2024, 3, 20, 1, 30, 0).unwrap();
        assert_eq!(
            next_cleanup_after(early, 2, Tz::UTC),
            Utc.with_ymd_and_hms(2024, 3, 20, 2, 0, 0).unwrap()
        );

        let exactly = Utc.with_ymd_and_hms(2024, 3, 20, 2, 0, 0).unwrap();
        assert_eq!(
            next_cleanup_after(exactly, 2, Tz::UTC),
            Utc.with_ymd_and_hms(2024, 3, 21, 2, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_next_cleanup_in_local_zone() {
        // 02:00 in Stockholm (CET, UTC+1) is 01:00 UTC
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        assert_eq!(
            next_cleanup_after(now, 2, chrono_tz::Europe::Stockholm),
            Utc.with_ymd_and_hms(2024, 1, 11, 1, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_next_cleanup_skips_dst_gap() {
        // 2024-03-31 02:00 does not exist in Stockholm; next valid 02:00 is April 1st (CEST)
        let now = Utc.with_ymd_and_hms(2024, 3, 30, 12, 0, 0).unwrap();
        assert_eq!(
            next_cleanup_after(now, 2, chrono_tz::Europe::Stockholm),
            Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()
        );
    }
}
