use chrono::Duration;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;

/// Spacing between consecutive back-filled samples
pub const HISTORY_INTERVAL_MINUTES: i64 = 5;

/// Requested look-back window for a historical series
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
pub enum TimeRange {
    #[strum(serialize = "1h")]
    #[serde(rename = "1h")]
    OneHour,
    #[default]
    #[strum(serialize = "24h")]
    #[serde(rename = "24h")]
    OneDay,
    #[strum(serialize = "7d")]
    #[serde(rename = "7d")]
    SevenDays,
    #[strum(serialize = "30d")]
    #[serde(rename = "30d")]
    ThirtyDays,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown time range '{0}', expected one of 1h, 24h, 7d, 30d")]
pub struct UnknownTimeRange(pub String);

impl TimeRange {
    /// Number of samples back-filled for this window (one per interval)
    pub fn sample_count(&self) -> usize {
        match self {
            TimeRange::OneHour => 12,
            TimeRange::OneDay => 288,
            TimeRange::SevenDays => 2016,
            TimeRange::ThirtyDays => 8640,
        }
    }

    /// Lenient lookup used by the service boundary: unknown keys fall back to 24h.
    pub fn from_key(key: &str) -> Self {
        Self::parse(key).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "falling back to default time range");
            TimeRange::default()
        })
    }

    /// Strict lookup that reports unknown keys.
    pub fn parse(key: &str) -> Result<Self, UnknownTimeRange> {
        key.parse::<TimeRange>()
            .map_err(|_| UnknownTimeRange(key.to_string()))
    }

    pub fn interval() -> Duration {
        Duration::minutes(HISTORY_INTERVAL_MINUTES)
    }
}
