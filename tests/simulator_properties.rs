use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rstest::rstest;
use std::sync::Arc;
use strum::IntoEnumIterator;

use tower_telemetry_simulator::domain::{Metric, TelemetrySample, TimeRange, WindDirection};
use tower_telemetry_simulator::simulation::baseline::EQUIPMENT_AGE_STEP;
use tower_telemetry_simulator::simulation::{
    BaselineState, FixedClock, GenerationProfile, RngDrawSource, TelemetrySimulator,
};

fn simulator(seed: u64) -> TelemetrySimulator {
    let now = Utc.with_ymd_and_hms(2024, 7, 15, 9, 30, 0).unwrap();
    TelemetrySimulator::new(
        Box::new(RngDrawSource::seeded(seed)),
        Arc::new(FixedClock::new(now)),
        chrono_tz::Tz::UTC,
    )
}

fn has_two_decimals(value: f64) -> bool {
    let scaled = value * 100.0;
    (scaled - scaled.round()).abs() < 1e-6
}

fn assert_within_profile(sample: &TelemetrySample, profile: &GenerationProfile) {
    for metric in Metric::iter() {
        let value = sample.value(metric);
        let bounds = profile.bounds(metric);
        assert!(
            value >= bounds.min - 1e-9 && value <= bounds.max + 1e-9,
            "{metric} = {value} outside [{}, {}]",
            bounds.min,
            bounds.max
        );
        assert!(has_two_decimals(value), "{metric} = {value} not rounded");
    }
    assert_eq!(sample.status, "online");
    assert_eq!(sample.battery, 100.0);
}

#[rstest]
#[case(TimeRange::OneHour, 12)]
#[case(TimeRange::OneDay, 288)]
#[case(TimeRange::SevenDays, 2016)]
#[case(TimeRange::ThirtyDays, 8640)]
fn test_series_length_per_range(#[case] range: TimeRange, #[case] expected: usize) {
    assert_eq!(simulator(1).historical_series(range).len(), expected);
}

#[rstest]
#[case("1h", 12)]
#[case("24h", 288)]
#[case("7d", 2016)]
#[case("bogus", 288)]
#[case("", 288)]
fn test_series_length_per_key(#[case] key: &str, #[case] expected: usize) {
    assert_eq!(simulator(1).historical_series_for_key(key).len(), expected);
}

#[test]
fn test_historical_series_stays_in_range_and_descends() {
    let sim = simulator(99);
    let series = sim.historical_series(TimeRange::SevenDays);
    let profile = GenerationProfile::historical();

    for sample in &series {
        assert_within_profile(sample, &profile);
    }
    for pair in series.windows(2) {
        assert!(pair[0].timestamp > pair[1].timestamp);
        assert!(pair[0].timestamp_iso() > pair[1].timestamp_iso());
    }
}

#[test]
fn test_prevailing_wind_dominates() {
    let series = simulator(5).historical_series(TimeRange::SevenDays);
    let easterly = series
        .iter()
        .filter(|s| s.wind_direction == WindDirection::E)
        .count();
    assert!(easterly * 10 >= series.len() * 9, "only {easterly} of {} easterly", series.len());
}

#[test]
fn test_live_samples_stay_in_range() {
    let sim = simulator(11);
    let profile = GenerationProfile::live();
    let mut last_age = sim.baseline().equipment_age;

    for _ in 0..2_000 {
        let sample = sim.live_sample();
        assert_within_profile(&sample, &profile);

        let age = sim.baseline().equipment_age;
        assert!(age >= last_age);
        last_age = age;
    }
}

#[test]
fn test_concurrent_live_samples_each_advance_once() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 500;

    let sim = simulator(31);
    std::thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                for _ in 0..PER_THREAD {
                    let sample = sim.live_sample();
                    assert_eq!(sample.battery, 100.0);
                }
            });
        }
    });

    // Same additions in the same order as a sequential run
    let mut expected = 0.0;
    for _ in 0..THREADS * PER_THREAD {
        expected += EQUIPMENT_AGE_STEP;
    }

    let baseline = sim.baseline();
    assert_eq!(baseline.equipment_age, expected);
    assert!(baseline.is_within_bounds());
}

#[test]
fn test_seeded_simulators_agree() {
    let a = simulator(2024);
    let b = simulator(2024);
    for _ in 0..50 {
        assert_eq!(a.live_sample(), b.live_sample());
    }
    assert_eq!(
        a.historical_series(TimeRange::OneHour),
        b.historical_series(TimeRange::OneHour)
    );
}

#[test]
fn test_samples_serialize_with_dashboard_field_names() {
    let sample = simulator(3).live_sample();
    let json = serde_json::to_value(&sample).unwrap();
    for key in [
        "ambientTemperature",
        "windDirection",
        "uvIndex",
        "cpuUtilization",
        "signalStrength",
        "packetLoss",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert_eq!(json["timestamp"], "2024-07-15T09:30:00Z");
}

proptest! {
    #[test]
    fn prop_baseline_walk_stays_bounded(seed in any::<u64>(), steps in 1usize..3_000) {
        let mut baseline = BaselineState::default();
        let mut draws = RngDrawSource::seeded(seed);
        let mut last_age = baseline.equipment_age;

        for _ in 0..steps {
            baseline.advance(&mut draws);
            prop_assert!(baseline.is_within_bounds());
            prop_assert_eq!(baseline.battery, 100.0);
            prop_assert!(baseline.equipment_age >= last_age);
            last_age = baseline.equipment_age;
        }
    }

    #[test]
    fn prop_history_never_moves_baseline(seed in any::<u64>()) {
        let sim = simulator(seed);
        sim.live_sample();
        let before = sim.baseline();
        sim.historical_series(TimeRange::OneHour);
        prop_assert_eq!(sim.baseline(), before);
    }
}
