//! # Generation Profiles
//!
//! One set of correlation formulas, two sets of constants. The live profile
//! produces the near-flat readings the dashboard polls every few seconds;
//! the historical profile produces the wider swings used for back-fill.
//! Every sigma, coupling gain, conditional penalty and clamp bound the
//! generator uses lives here.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::{CyclicalPattern, DrawSource};
use crate::domain::{Bounds, Metric, WindDirection};
use crate::simulation::baseline::PINNED_BATTERY;

/// Which realism mode a sample is generated under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GenerationMode {
    Live,
    Historical,
}

/// Gaussian spread around a computed center, then a hard clamp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spread {
    pub sigma: f64,
    pub bounds: Bounds,
}

impl Spread {
    pub const fn new(sigma: f64, min: f64, max: f64) -> Self {
        Self {
            sigma,
            bounds: Bounds::new(min, max),
        }
    }

    /// Consumes one gaussian draw
    pub fn sample(&self, center: f64, draws: &mut dyn DrawSource) -> f64 {
        self.bounds.clamp(self.perturb(center, draws))
    }

    /// Center plus noise, before clamping. Consumes one gaussian draw.
    pub fn perturb(&self, center: f64, draws: &mut dyn DrawSource) -> f64 {
        center + draws.normal(self.sigma)
    }
}

/// Linear response `gain * (input - reference)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slope {
    pub reference: f64,
    pub gain: f64,
}

impl Slope {
    pub const fn new(reference: f64, gain: f64) -> Self {
        Self { reference, gain }
    }

    pub fn apply(&self, input: f64) -> f64 {
        self.gain * (input - self.reference)
    }
}

/// Fixed offset applied once an input exceeds a threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub above: f64,
    pub offset: f64,
}

impl Step {
    pub const fn new(above: f64, offset: f64) -> Self {
        Self { above, offset }
    }

    pub fn apply(&self, input: f64) -> f64 {
        if input > self.above {
            self.offset
        } else {
            0.0
        }
    }
}

/// `base + slope(input) + noise`, clamped
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub base: f64,
    pub slope: Slope,
    pub spread: Spread,
}

impl LinearModel {
    pub fn sample(&self, input: f64, draws: &mut dyn DrawSource) -> f64 {
        self.sample_from(0.0, input, draws)
    }

    /// Same as [`sample`](Self::sample) with `base` shifted by `origin`
    pub fn sample_from(&self, origin: f64, input: f64, draws: &mut dyn DrawSource) -> f64 {
        self.spread
            .sample(origin + self.base + self.slope.apply(input), draws)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TowerTemperatureModel {
    pub equipment_heat: f64,
    pub equipment_heat_sigma: f64,
    pub spread: Spread,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindModel {
    pub spread: Spread,
    /// Probability of reporting the prevailing direction
    pub persistence: f64,
    pub prevailing: WindDirection,
}

impl WindModel {
    /// Consumes one uniform draw, plus one index draw when the wind shifts
    pub fn direction(&self, draws: &mut dyn DrawSource) -> WindDirection {
        use strum::EnumCount;

        if draws.chance(self.persistence) {
            self.prevailing
        } else {
            WindDirection::from_index(draws.index(WindDirection::COUNT))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirQualityModel {
    pub base: f64,
    pub humidity: Slope,
    pub wind_gain: f64,
    pub rush_hour_penalty: f64,
    pub spread: Spread,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationModel {
    pub humidity_above: f64,
    pub pressure_below: f64,
    pub wet_chance: f64,
    pub dry_chance: f64,
    pub max_mm: f64,
}

impl PrecipitationModel {
    /// Consumes one uniform draw, plus one more when it rains
    pub fn sample(&self, humidity: f64, pressure: f64, draws: &mut dyn DrawSource) -> f64 {
        let chance = if humidity > self.humidity_above && pressure < self.pressure_below {
            self.wet_chance
        } else {
            self.dry_chance
        };
        if draws.chance(chance) {
            self.bounds().clamp(draws.uniform() * self.max_mm)
        } else {
            0.0
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(0.0, self.max_mm)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VibrationModel {
    pub base: f64,
    /// Gain per km/h of wind above `wind.reference`; calm wind contributes nothing
    pub wind: Slope,
    pub sigma: f64,
    pub calm_jitter: f64,
    pub windy_jitter: f64,
    pub bounds: Bounds,
}

impl VibrationModel {
    /// Consumes one gaussian and one uniform draw
    pub fn sample(&self, wind_speed: f64, draws: &mut dyn DrawSource) -> f64 {
        let windy = wind_speed > self.wind.reference;
        let excess = if windy { self.wind.apply(wind_speed) } else { 0.0 };
        let jitter = if windy { self.windy_jitter } else { self.calm_jitter };
        let raw = self.base + excess + draws.normal(self.sigma) + draws.uniform() * jitter;
        self.bounds.clamp(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiskModel {
    pub base: f64,
    /// Uniformly drawn amount of used space subtracted from `base`
    pub wear_span: f64,
    pub spread: Spread,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkLoadModel {
    pub base: f64,
    pub spread: Spread,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalModel {
    pub base: f64,
    pub humid_penalty: Step,
    pub wind_penalty: Step,
    pub dry_sigma: f64,
    /// Sigma used once humidity passes `humid_penalty.above`
    pub wet_sigma: f64,
    pub bounds: Bounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencyModel {
    pub load: LinearModel,
    pub humid_penalty: Step,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResponseTimeModel {
    pub base: f64,
    pub latency_gain: f64,
    pub cpu_gain: f64,
    pub spread: Spread,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorRateModel {
    pub base: f64,
    pub humid_penalty: Step,
    pub heat_penalty: Step,
    pub spread: Spread,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PacketLossModel {
    pub base: f64,
    pub error_gain: f64,
    pub congestion_penalty: Step,
    pub spread: Spread,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterferenceModel {
    pub base: f64,
    pub humid_penalty: Step,
    pub gust_penalty: Step,
    pub spread: Spread,
}

/// Complete parameter set for the correlated generator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationProfile {
    pub mode: GenerationMode,
    pub cyclical: CyclicalPattern,

    // Environment
    pub ambient_temperature: Spread,
    pub tower_temperature: TowerTemperatureModel,
    pub humidity: LinearModel,
    pub wind: WindModel,
    pub air_quality: AirQualityModel,
    pub uv_index: Spread,
    pub pressure: Spread,
    pub precipitation: PrecipitationModel,
    pub vibration: VibrationModel,

    // System health
    pub uptime: Spread,
    pub cpu: LinearModel,
    pub memory: LinearModel,
    pub disk: DiskModel,
    pub nominal_voltage: f64,
    pub voltage: Spread,

    // Network
    pub network_load: NetworkLoadModel,
    pub signal: SignalModel,
    pub throughput: LinearModel,
    pub bandwidth: LinearModel,
    pub latency: LatencyModel,
    pub jitter: LinearModel,
    pub response_time: ResponseTimeModel,
    pub error_rate: ErrorRateModel,
    pub packet_loss: PacketLossModel,
    pub interference: InterferenceModel,
}

const PREVAILING_WIND: WindDirection = WindDirection::E;
const WIND_PERSISTENCE: f64 = 0.95;

impl GenerationProfile {
    /// Low-variance constants for the polled live reading
    pub const fn live() -> Self {
        Self {
            mode: GenerationMode::Live,
            cyclical: CyclicalPattern {
                diurnal_amplitude: 0.5,
                rush_hour_boost: 0.02,
                weekend_dip: 0.02,
            },
            ambient_temperature: Spread::new(0.1, 15.0, 45.0),
            tower_temperature: TowerTemperatureModel {
                equipment_heat: 8.0,
                equipment_heat_sigma: 0.05,
                spread: Spread::new(0.05, 25.0, 55.0),
            },
            humidity: LinearModel {
                base: 0.0,
                slope: Slope::new(25.0, -0.2),
                spread: Spread::new(0.2, 30.0, 85.0),
            },
            wind: WindModel {
                spread: Spread::new(0.2, 2.0, 35.0),
                persistence: WIND_PERSISTENCE,
                prevailing: PREVAILING_WIND,
            },
            air_quality: AirQualityModel {
                base: 75.0,
                humidity: Slope::new(50.0, -0.1),
                wind_gain: 0.05,
                rush_hour_penalty: 1.0,
                spread: Spread::new(0.1, 40.0, 95.0),
            },
            uv_index: Spread::new(0.1, 0.0, 12.0),
            pressure: Spread::new(0.5, 1010.0, 1020.0),
            precipitation: PrecipitationModel {
                humidity_above: 75.0,
                pressure_below: 1010.0,
                wet_chance: 0.4,
                dry_chance: 0.05,
                max_mm: 2.5,
            },
            vibration: VibrationModel {
                base: 0.02,
                wind: Slope::new(20.0, 0.0),
                sigma: 0.005,
                calm_jitter: 0.0,
                windy_jitter: 0.0,
                bounds: Bounds::new(0.01, 0.03),
            },
            uptime: Spread::new(0.01, 99.7, 100.0),
            cpu: LinearModel {
                base: 40.0,
                slope: Slope::new(0.0, 0.0),
                spread: Spread::new(0.2, 39.5, 40.5),
            },
            memory: LinearModel {
                base: 60.0,
                slope: Slope::new(0.0, 0.0),
                spread: Spread::new(0.1, 59.8, 60.2),
            },
            disk: DiskModel {
                base: 75.0,
                wear_span: 0.0,
                spread: Spread::new(0.1, 74.8, 75.2),
            },
            nominal_voltage: 12.5,
            voltage: Spread::new(0.01, 12.4, 12.6),
            network_load: NetworkLoadModel {
                base: 50.0,
                spread: Spread::new(0.1, 48.0, 52.0),
            },
            signal: SignalModel {
                base: -65.0,
                humid_penalty: Step::new(70.0, 0.1),
                wind_penalty: Step::new(20.0, 0.05),
                dry_sigma: 0.02,
                wet_sigma: 0.02,
                bounds: Bounds::new(-66.0, -64.0),
            },
            throughput: LinearModel {
                base: 510.0,
                slope: Slope::new(-65.0, 0.0),
                spread: Spread::new(0.5, 508.0, 512.0),
            },
            bandwidth: LinearModel {
                base: 600.0,
                slope: Slope::new(0.0, 0.0),
                spread: Spread::new(0.5, 598.0, 602.0),
            },
            latency: LatencyModel {
                load: LinearModel {
                    base: 18.0,
                    slope: Slope::new(50.0, 0.01),
                    spread: Spread::new(0.02, 17.8, 18.2),
                },
                humid_penalty: Step::new(70.0, 0.05),
            },
            jitter: LinearModel {
                base: 1.0,
                slope: Slope::new(0.0, 0.0),
                spread: Spread::new(0.01, 0.98, 1.02),
            },
            response_time: ResponseTimeModel {
                base: 20.0,
                latency_gain: 0.0,
                cpu_gain: 0.0,
                spread: Spread::new(0.1, 19.8, 20.2),
            },
            error_rate: ErrorRateModel {
                base: 0.01,
                humid_penalty: Step::new(75.0, 0.0),
                heat_penalty: Step::new(45.0, 0.0),
                spread: Spread::new(0.001, 0.0, 0.02),
            },
            packet_loss: PacketLossModel {
                base: 0.01,
                error_gain: 0.0,
                congestion_penalty: Step::new(80.0, 0.0),
                spread: Spread::new(0.001, 0.0, 0.02),
            },
            interference: InterferenceModel {
                base: 5.0,
                humid_penalty: Step::new(70.0, 0.0),
                gust_penalty: Step::new(25.0, 0.0),
                spread: Spread::new(0.1, 4.8, 5.2),
            },
        }
    }

    /// Wider-variance constants for back-filled history
    pub const fn historical() -> Self {
        Self {
            mode: GenerationMode::Historical,
            cyclical: CyclicalPattern {
                diurnal_amplitude: 1.5,
                rush_hour_boost: 0.1,
                weekend_dip: 0.1,
            },
            ambient_temperature: Spread::new(3.0, 15.0, 45.0),
            tower_temperature: TowerTemperatureModel {
                equipment_heat: 8.0,
                equipment_heat_sigma: 2.0,
                spread: Spread::new(1.5, 30.0, 55.0),
            },
            humidity: LinearModel {
                base: 0.0,
                slope: Slope::new(25.0, -0.8),
                spread: Spread::new(5.0, 30.0, 85.0),
            },
            wind: WindModel {
                spread: Spread::new(4.0, 2.0, 35.0),
                persistence: WIND_PERSISTENCE,
                prevailing: PREVAILING_WIND,
            },
            air_quality: AirQualityModel {
                base: 85.0,
                humidity: Slope::new(50.0, -0.3),
                wind_gain: 0.2,
                rush_hour_penalty: 3.0,
                spread: Spread::new(3.0, 65.0, 98.0),
            },
            uv_index: Spread::new(1.2, 0.0, 12.0),
            pressure: Spread::new(8.0, 990.0, 1040.0),
            precipitation: PrecipitationModel {
                humidity_above: 75.0,
                pressure_below: 1010.0,
                wet_chance: 0.3,
                dry_chance: 0.05,
                max_mm: 3.0,
            },
            vibration: VibrationModel {
                base: 0.0,
                wind: Slope::new(20.0, 0.02),
                sigma: 0.0,
                calm_jitter: 0.05,
                windy_jitter: 0.1,
                bounds: Bounds::new(0.0, 0.8),
            },
            uptime: Spread::new(0.02, 99.8, 100.0),
            cpu: LinearModel {
                base: 40.0,
                slope: Slope::new(0.0, 0.3),
                spread: Spread::new(5.0, 25.0, 85.0),
            },
            memory: LinearModel {
                base: 65.0,
                slope: Slope::new(0.0, 0.2),
                spread: Spread::new(3.0, 55.0, 90.0),
            },
            disk: DiskModel {
                base: 85.0,
                wear_span: 20.0,
                spread: Spread::new(0.0, 50.0, 90.0),
            },
            nominal_voltage: 12.5,
            voltage: Spread::new(0.15, 11.8, 13.2),
            network_load: NetworkLoadModel {
                base: 60.0,
                spread: Spread::new(15.0, 40.0, 95.0),
            },
            signal: SignalModel {
                base: -65.0,
                humid_penalty: Step::new(70.0, 0.0),
                wind_penalty: Step::new(20.0, 0.0),
                dry_sigma: 3.0,
                wet_sigma: 8.0,
                bounds: Bounds::new(-75.0, -45.0),
            },
            throughput: LinearModel {
                base: 800.0,
                slope: Slope::new(-70.0, 10.0),
                spread: Spread::new(50.0, 400.0, 1000.0),
            },
            bandwidth: LinearModel {
                base: 0.0,
                slope: Slope::new(0.0, 0.8),
                spread: Spread::new(30.0, 80.0, 950.0),
            },
            latency: LatencyModel {
                load: LinearModel {
                    base: 20.0,
                    slope: Slope::new(0.0, 0.2),
                    spread: Spread::new(3.0, 12.0, 45.0),
                },
                humid_penalty: Step::new(70.0, 5.0),
            },
            jitter: LinearModel {
                base: 0.0,
                slope: Slope::new(0.0, 0.15),
                spread: Spread::new(1.0, 1.0, 12.0),
            },
            response_time: ResponseTimeModel {
                base: 0.0,
                latency_gain: 1.0,
                cpu_gain: 0.1,
                spread: Spread::new(2.0, 15.0, 55.0),
            },
            error_rate: ErrorRateModel {
                base: 0.02,
                humid_penalty: Step::new(75.0, 0.03),
                heat_penalty: Step::new(45.0, 0.02),
                spread: Spread::new(0.01, 0.0, 0.08),
            },
            packet_loss: PacketLossModel {
                base: 0.0,
                error_gain: 2.0,
                congestion_penalty: Step::new(80.0, 0.05),
                spread: Spread::new(0.02, 0.0, 0.15),
            },
            interference: InterferenceModel {
                base: 8.0,
                humid_penalty: Step::new(70.0, 5.0),
                gust_penalty: Step::new(25.0, 3.0),
                spread: Spread::new(2.0, 3.0, 28.0),
            },
        }
    }

    /// Documented range every generated value of `metric` is clamped into
    pub fn bounds(&self, metric: Metric) -> Bounds {
        match metric {
            Metric::AmbientTemperature => self.ambient_temperature.bounds,
            Metric::Temperature => self.tower_temperature.spread.bounds,
            Metric::Humidity => self.humidity.spread.bounds,
            Metric::WindSpeed => self.wind.spread.bounds,
            Metric::AirQuality => self.air_quality.spread.bounds,
            Metric::UvIndex => self.uv_index.bounds,
            Metric::Pressure => self.pressure.bounds,
            Metric::Precipitation => self.precipitation.bounds(),
            Metric::Vibration => self.vibration.bounds,
            Metric::Battery => Bounds::pinned(PINNED_BATTERY),
            Metric::Uptime => self.uptime.bounds,
            Metric::CpuUtilization => self.cpu.spread.bounds,
            Metric::MemoryUsage => self.memory.spread.bounds,
            Metric::DiskSpace => self.disk.spread.bounds,
            Metric::Voltage => self.voltage.bounds,
            Metric::NetworkLoad => self.network_load.spread.bounds,
            Metric::SignalStrength => self.signal.bounds,
            Metric::Latency => self.latency.load.spread.bounds,
            Metric::Jitter => self.jitter.spread.bounds,
            Metric::ResponseTime => self.response_time.spread.bounds,
            Metric::Throughput => self.throughput.spread.bounds,
            Metric::Bandwidth => self.bandwidth.spread.bounds,
            Metric::ErrorRate => self.error_rate.spread.bounds,
            Metric::PacketLoss => self.packet_loss.spread.bounds,
            Metric::Interference => self.interference.spread.bounds,
        }
    }
}
