use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator};

use super::Metric;

/// Status reported for every simulated reading
pub const STATUS_ONLINE: &str = "online";

/// Eight-point compass direction the wind is blowing from
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
)]
pub enum WindDirection {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl WindDirection {
    /// Direction at position `index` (wrapping) in compass order starting at north
    pub fn from_index(index: usize) -> Self {
        Self::iter()
            .nth(index % Self::COUNT)
            .unwrap_or(WindDirection::N)
    }
}

/// Round to two decimal places, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One simulated telemetry reading.
///
/// Every numeric field is rounded to two decimals when the sample is built
/// through [`TelemetrySample::new`]. Storage identity is not part of the
/// sample; the persistence layer wraps it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySample {
    pub status: String,
    #[serde(with = "iso_instant")]
    pub timestamp: DateTime<Utc>,

    // Environmental
    pub ambient_temperature: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub wind_direction: WindDirection,
    pub air_quality: f64,
    pub uv_index: f64,
    pub pressure: f64,
    pub precipitation: f64,
    pub vibration: f64,

    // System health
    pub battery: f64,
    pub uptime: f64,
    pub cpu_utilization: f64,
    pub memory_usage: f64,
    pub disk_space: f64,
    pub voltage: f64,

    // Network performance
    pub network_load: f64,
    pub signal_strength: f64,
    pub latency: f64,
    pub jitter: f64,
    pub response_time: f64,
    pub throughput: f64,
    pub bandwidth: f64,
    pub error_rate: f64,
    pub packet_loss: f64,
    pub interference: f64,
}

impl TelemetrySample {
    /// Build an online sample from a metric lookup, rounding each value.
    ///
    /// `timestamp` is truncated to whole seconds so the serialized instant
    /// and the in-memory value agree.
    pub fn new<F>(timestamp: DateTime<Utc>, wind_direction: WindDirection, value_of: F) -> Self
    where
        F: Fn(Metric) -> f64,
    {
        use chrono::SubsecRound;

        let v = |m: Metric| round2(value_of(m));
        Self {
            status: STATUS_ONLINE.to_string(),
            timestamp: timestamp.trunc_subsecs(0),
            ambient_temperature: v(Metric::AmbientTemperature),
            temperature: v(Metric::Temperature),
            humidity: v(Metric::Humidity),
            wind_speed: v(Metric::WindSpeed),
            wind_direction,
            air_quality: v(Metric::AirQuality),
            uv_index: v(Metric::UvIndex),
            pressure: v(Metric::Pressure),
            precipitation: v(Metric::Precipitation),
            vibration: v(Metric::Vibration),
            battery: v(Metric::Battery),
            uptime: v(Metric::Uptime),
            cpu_utilization: v(Metric::CpuUtilization),
            memory_usage: v(Metric::MemoryUsage),
            disk_space: v(Metric::DiskSpace),
            voltage: v(Metric::Voltage),
            network_load: v(Metric::NetworkLoad),
            signal_strength: v(Metric::SignalStrength),
            latency: v(Metric::Latency),
            jitter: v(Metric::Jitter),
            response_time: v(Metric::ResponseTime),
            throughput: v(Metric::Throughput),
            bandwidth: v(Metric::Bandwidth),
            error_rate: v(Metric::ErrorRate),
            packet_loss: v(Metric::PacketLoss),
            interference: v(Metric::Interference),
        }
    }

    /// Read a numeric field by metric
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::AmbientTemperature => self.ambient_temperature,
            Metric::Temperature => self.temperature,
            Metric::Humidity => self.humidity,
            Metric::WindSpeed => self.wind_speed,
            Metric::AirQuality => self.air_quality,
            Metric::UvIndex => self.uv_index,
            Metric::Pressure => self.pressure,
            Metric::Precipitation => self.precipitation,
            Metric::Vibration => self.vibration,
            Metric::Battery => self.battery,
            Metric::Uptime => self.uptime,
            Metric::CpuUtilization => self.cpu_utilization,
            Metric::MemoryUsage => self.memory_usage,
            Metric::DiskSpace => self.disk_space,
            Metric::Voltage => self.voltage,
            Metric::NetworkLoad => self.network_load,
            Metric::SignalStrength => self.signal_strength,
            Metric::Latency => self.latency,
            Metric::Jitter => self.jitter,
            Metric::ResponseTime => self.response_time,
            Metric::Throughput => self.throughput,
            Metric::Bandwidth => self.bandwidth,
            Metric::ErrorRate => self.error_rate,
            Metric::PacketLoss => self.packet_loss,
            Metric::Interference => self.interference,
        }
    }

    /// ISO-8601 instant form of the timestamp, e.g. `2024-01-01T00:00:00Z`
    pub fn timestamp_iso(&self) -> String {
        format_instant(&self.timestamp)
    }
}

/// Format an instant the way samples are stamped
pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Serde adapter writing `DateTime<Utc>` as a whole-second UTC instant
pub mod iso_instant {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_instant(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
