//! # Correlated Metric Generator
//!
//! Derives a full telemetry sample from the baseline, the cyclical modifiers
//! for the sample's wall-clock position, and fresh draws. Metrics are
//! computed in dependency order and each is clamped before anything
//! downstream reads it. The one exception is the rain gate, which reads
//! pressure before its clamp:
//!
//! ```text
//! ambient -> tower temp -> humidity -> wind -> air quality -> uv -> pressure
//!         -> precipitation -> vibration -> battery/uptime
//! network load -> cpu -> memory -> disk
//! signal -> throughput -> bandwidth -> latency -> jitter -> response time
//!        -> error rate -> packet loss -> interference -> voltage
//! ```

use chrono::{DateTime, Utc};
use strum::EnumCount;

use super::baseline::{BaselineState, PINNED_BATTERY};
use super::{CalendarPosition, DrawSource, GenerationMode, GenerationProfile};
use crate::domain::{Metric, TelemetrySample, WindDirection};

/// Working set of raw (clamped, unrounded) metric values
#[derive(Debug, Clone)]
struct Readings {
    values: [f64; Metric::COUNT],
    wind_direction: WindDirection,
}

impl Readings {
    fn new() -> Self {
        Self {
            values: [0.0; Metric::COUNT],
            wind_direction: WindDirection::N,
        }
    }

    fn set(&mut self, metric: Metric, value: f64) -> f64 {
        self.values[metric as usize] = value;
        value
    }

    fn get(&self, metric: Metric) -> f64 {
        self.values[metric as usize]
    }
}

/// Stateless generator; all mutable inputs are passed in per call
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelatedGenerator {
    profile: GenerationProfile,
}

impl CorrelatedGenerator {
    pub fn new(profile: GenerationProfile) -> Self {
        Self { profile }
    }

    pub fn live() -> Self {
        Self::new(GenerationProfile::live())
    }

    pub fn historical() -> Self {
        Self::new(GenerationProfile::historical())
    }

    pub fn profile(&self) -> &GenerationProfile {
        &self.profile
    }

    pub fn mode(&self) -> GenerationMode {
        self.profile.mode
    }

    /// Produce one sample stamped with `timestamp`, using `position` for
    /// every hour/day-of-week effect.
    pub fn generate(
        &self,
        baseline: &BaselineState,
        timestamp: DateTime<Utc>,
        position: CalendarPosition,
        draws: &mut dyn DrawSource,
    ) -> TelemetrySample {
        let readings = self.derive(baseline, position, draws);
        TelemetrySample::new(timestamp, readings.wind_direction, |m| readings.get(m))
    }

    fn derive(
        &self,
        baseline: &BaselineState,
        position: CalendarPosition,
        draws: &mut dyn DrawSource,
    ) -> Readings {
        let p = &self.profile;
        let cyc = p.cyclical.modifiers(position);
        let mut r = Readings::new();

        // Environment
        let ambient = r.set(
            Metric::AmbientTemperature,
            p.ambient_temperature.sample(baseline.temperature, draws),
        );

        let tower = &p.tower_temperature;
        let equipment_heat = tower.equipment_heat + draws.normal(tower.equipment_heat_sigma);
        let tower_temp = r.set(
            Metric::Temperature,
            tower
                .spread
                .sample(ambient + equipment_heat + cyc.diurnal_offset, draws),
        );

        let humidity = r.set(
            Metric::Humidity,
            p.humidity.sample_from(baseline.humidity, ambient, draws),
        );

        let wind = r.set(
            Metric::WindSpeed,
            p.wind.spread.sample(baseline.wind_speed, draws),
        );
        r.wind_direction = p.wind.direction(draws);

        let aq = &p.air_quality;
        let rush_penalty = if cyc.rush_hour { aq.rush_hour_penalty } else { 0.0 };
        r.set(
            Metric::AirQuality,
            aq.spread.sample(
                aq.base + aq.humidity.apply(humidity) + wind * aq.wind_gain - rush_penalty,
                draws,
            ),
        );

        r.set(Metric::UvIndex, p.uv_index.sample(cyc.uv_base, draws));

        // Rain is gated on the unclamped reading; the live clamp sits above the gate
        let raw_pressure = p.pressure.perturb(baseline.pressure, draws);
        r.set(Metric::Pressure, p.pressure.bounds.clamp(raw_pressure));

        r.set(
            Metric::Precipitation,
            p.precipitation.sample(humidity, raw_pressure, draws),
        );
        r.set(Metric::Vibration, p.vibration.sample(wind, draws));

        // System health
        r.set(Metric::Battery, PINNED_BATTERY);
        r.set(Metric::Uptime, p.uptime.sample(baseline.uptime, draws));

        let load_center =
            p.network_load.base * cyc.rush_hour_multiplier * cyc.weekend_multiplier;
        let load = r.set(
            Metric::NetworkLoad,
            p.network_load.spread.sample(load_center, draws),
        );

        let cpu = r.set(Metric::CpuUtilization, p.cpu.sample(load, draws));
        r.set(Metric::MemoryUsage, p.memory.sample(load, draws));

        let disk = &p.disk;
        let used = draws.uniform() * disk.wear_span;
        r.set(Metric::DiskSpace, disk.spread.sample(disk.base - used, draws));

        // Network
        let sig = &p.signal;
        let signal_sigma = if humidity > sig.humid_penalty.above {
            sig.wet_sigma
        } else {
            sig.dry_sigma
        };
        let signal_raw = sig.base - sig.humid_penalty.apply(humidity) - sig.wind_penalty.apply(wind)
            + draws.normal(signal_sigma);
        let signal = r.set(Metric::SignalStrength, sig.bounds.clamp(signal_raw));

        let throughput = r.set(Metric::Throughput, p.throughput.sample(signal, draws));
        r.set(Metric::Bandwidth, p.bandwidth.sample(throughput, draws));

        let lat = &p.latency;
        let latency = r.set(
            Metric::Latency,
            lat.load
                .sample_from(lat.humid_penalty.apply(humidity), load, draws),
        );
        r.set(Metric::Jitter, p.jitter.sample(latency, draws));

        let rt = &p.response_time;
        r.set(
            Metric::ResponseTime,
            rt.spread.sample(
                rt.base + latency * rt.latency_gain + cpu * rt.cpu_gain,
                draws,
            ),
        );

        let er = &p.error_rate;
        let error_rate = r.set(
            Metric::ErrorRate,
            er.spread.sample(
                er.base + er.humid_penalty.apply(humidity) + er.heat_penalty.apply(tower_temp),
                draws,
            ),
        );

        let pl = &p.packet_loss;
        r.set(
            Metric::PacketLoss,
            pl.spread.sample(
                pl.base + error_rate * pl.error_gain + pl.congestion_penalty.apply(load),
                draws,
            ),
        );

        let inf = &p.interference;
        r.set(
            Metric::Interference,
            inf.spread.sample(
                inf.base + inf.humid_penalty.apply(humidity) + inf.gust_penalty.apply(wind),
                draws,
            ),
        );

        r.set(Metric::Voltage, p.voltage.sample(p.nominal_voltage, draws));

        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{RngDrawSource, ScriptedDrawSource};
    use chrono::TimeZone;
    use strum::IntoEnumIterator;

    fn noon_wednesday() -> (DateTime<Utc>, CalendarPosition) {
        let ts = Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap();
        (ts, CalendarPosition::of(&ts))
    }

    fn assert_in_bounds(generator: &CorrelatedGenerator, sample: &TelemetrySample) {
        for metric in Metric::iter() {
            let bounds = generator.profile().bounds(metric);
            let value = sample.value(metric);
            assert!(
                bounds.contains(value),
                "{} {metric}={value} outside [{}, {}]",
                generator.mode(),
                bounds.min,
                bounds.max
            );
        }
    }

    #[test]
    fn test_live_sample_without_noise() {
        let (ts, pos) = noon_wednesday();
        let sample = CorrelatedGenerator::live().generate(
            &BaselineState::default(),
            ts,
            pos,
            &mut ScriptedDrawSource::new(),
        );

        assert_eq!(sample.timestamp, ts);
        assert_eq!(sample.ambient_temperature, 25.0);
        assert_eq!(sample.temperature, 33.5);
        assert_eq!(sample.humidity, 55.0);
        assert_eq!(sample.wind_speed, 12.0);
        assert_eq!(sample.wind_direction, WindDirection::E);
        assert_eq!(sample.air_quality, 75.1);
        assert_eq!(sample.uv_index, 12.0);
        assert_eq!(sample.pressure, 1013.0);
        assert_eq!(sample.precipitation, 0.0);
        assert_eq!(sample.vibration, 0.02);
        assert_eq!(sample.battery, 100.0);
        assert_eq!(sample.uptime, 99.98);
        assert_eq!(sample.network_load, 50.0);
        assert_eq!(sample.cpu_utilization, 40.0);
        assert_eq!(sample.memory_usage, 60.0);
        assert_eq!(sample.disk_space, 75.0);
        assert_eq!(sample.signal_strength, -65.0);
        assert_eq!(sample.throughput, 510.0);
        assert_eq!(sample.bandwidth, 600.0);
        assert_eq!(sample.latency, 18.0);
        assert_eq!(sample.jitter, 1.0);
        assert_eq!(sample.response_time, 20.0);
        assert_eq!(sample.error_rate, 0.01);
        assert_eq!(sample.packet_loss, 0.01);
        assert_eq!(sample.interference, 5.0);
        assert_eq!(sample.voltage, 12.5);
    }

    #[test]
    fn test_historical_sample_without_noise() {
        let (ts, pos) = noon_wednesday();
        let sample = CorrelatedGenerator::historical().generate(
            &BaselineState::default(),
            ts,
            pos,
            &mut ScriptedDrawSource::new(),
        );

        assert_eq!(sample.temperature, 34.5);
        assert_eq!(sample.air_quality, 85.9);
        assert_eq!(sample.vibration, 0.0);
        assert_eq!(sample.network_load, 60.0);
        assert_eq!(sample.cpu_utilization, 58.0);
        assert_eq!(sample.memory_usage, 77.0);
        assert_eq!(sample.disk_space, 85.0);
        assert_eq!(sample.throughput, 850.0);
        assert_eq!(sample.bandwidth, 680.0);
        assert_eq!(sample.latency, 32.0);
        assert_eq!(sample.jitter, 4.8);
        assert_eq!(sample.response_time, 37.8);
        assert_eq!(sample.error_rate, 0.02);
        assert_eq!(sample.packet_loss, 0.04);
        assert_eq!(sample.interference, 8.0);
    }

    #[test]
    fn test_rush_hour_weekend_load_and_air_quality() {
        // Saturday 08:00
        let ts = Utc.with_ymd_and_hms(2024, 1, 6, 8, 0, 0).unwrap();
        let sample = CorrelatedGenerator::live().generate(
            &BaselineState::default(),
            ts,
            CalendarPosition::of(&ts),
            &mut ScriptedDrawSource::new(),
        );
        assert_eq!(sample.network_load, 49.98);
        assert_eq!(sample.air_quality, 74.1);
    }

    #[test]
    fn test_humid_conditions_degrade_network() {
        let baseline = BaselineState {
            humidity: 84.0,
            ..Default::default()
        };
        let (ts, pos) = noon_wednesday();
        let sample = CorrelatedGenerator::historical().generate(
            &baseline,
            ts,
            pos,
            &mut ScriptedDrawSource::new(),
        );
        assert_eq!(sample.humidity, 84.0);
        assert_eq!(sample.latency, 37.0);
        assert_eq!(sample.error_rate, 0.05);
        assert_eq!(sample.interference, 13.0);
    }

    #[test]
    fn test_extreme_draws_are_clamped() {
        let (ts, pos) = noon_wednesday();
        for generator in [CorrelatedGenerator::live(), CorrelatedGenerator::historical()] {
            for draw in [-50.0, 50.0] {
                let mut draws = ScriptedDrawSource::new()
                    .with_gaussians(std::iter::repeat(draw).take(64))
                    .with_uniforms(std::iter::repeat(0.999).take(64));
                let sample = generator.generate(&BaselineState::default(), ts, pos, &mut draws);
                assert_in_bounds(&generator, &sample);
            }
        }
    }

    #[test]
    fn test_random_samples_stay_in_bounds() {
        let mut draws = RngDrawSource::seeded(2024);
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        for generator in [CorrelatedGenerator::live(), CorrelatedGenerator::historical()] {
            for i in 0..2_000 {
                let ts = start + chrono::Duration::minutes(37 * i);
                let sample =
                    generator.generate(&BaselineState::default(), ts, CalendarPosition::of(&ts), &mut draws);
                assert_in_bounds(&generator, &sample);
                assert_eq!(sample.battery, 100.0);
            }
        }
    }

    #[test]
    fn test_live_rain_follows_low_baseline_pressure() {
        let baseline = BaselineState {
            humidity: 84.0,
            pressure: 986.0,
            ..Default::default()
        };
        let (ts, pos) = noon_wednesday();
        let generator = CorrelatedGenerator::live();
        let mut draws = RngDrawSource::seeded(77);

        let runs = 20_000;
        let mut wet = 0;
        for _ in 0..runs {
            let sample = generator.generate(&baseline, ts, pos, &mut draws);
            assert_eq!(sample.pressure, 1010.0);
            if sample.precipitation > 0.0 {
                wet += 1;
            }
        }

        let fraction = wet as f64 / runs as f64;
        assert!((0.35..0.45).contains(&fraction), "wet fraction {fraction}");
    }

    #[test]
    fn test_live_rain_stays_rare_at_normal_pressure() {
        let baseline = BaselineState {
            humidity: 84.0,
            ..Default::default()
        };
        let (ts, pos) = noon_wednesday();
        let generator = CorrelatedGenerator::live();
        let mut draws = RngDrawSource::seeded(78);

        let wet = (0..20_000)
            .filter(|_| generator.generate(&baseline, ts, pos, &mut draws).precipitation > 0.0)
            .count();
        assert!(wet < 1_400, "{wet} wet samples");
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let (ts, pos) = noon_wednesday();
        let generator = CorrelatedGenerator::historical();
        let a = generator.generate(&BaselineState::default(), ts, pos, &mut RngDrawSource::seeded(8));
        let b = generator.generate(&BaselineState::default(), ts, pos, &mut RngDrawSource::seeded(8));
        assert_eq!(a, b);
    }
}
