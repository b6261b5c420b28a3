use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString};

/// Closed interval a metric is clamped into after it is computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Degenerate interval holding a single value
    pub const fn pinned(value: f64) -> Self {
        Self { min: value, max: value }
    }

    /// Clamp a raw value into the interval. NaN collapses to the lower bound.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.max(self.min).min(self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Every numeric field carried by a [`TelemetrySample`](super::TelemetrySample).
///
/// The string form matches the JSON field name the dashboard reads.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, EnumCount,
)]
#[strum(serialize_all = "camelCase")]
pub enum Metric {
    // Environmental
    AmbientTemperature,
    Temperature,
    Humidity,
    WindSpeed,
    AirQuality,
    UvIndex,
    Pressure,
    Precipitation,
    Vibration,
    // System health
    Battery,
    Uptime,
    CpuUtilization,
    MemoryUsage,
    DiskSpace,
    Voltage,
    // Network performance
    NetworkLoad,
    SignalStrength,
    Latency,
    Jitter,
    ResponseTime,
    Throughput,
    Bandwidth,
    ErrorRate,
    PacketLoss,
    Interference,
}
