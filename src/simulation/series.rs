//! # Sample Series Orchestrator
//!
//! Owns the shared baseline and draw source behind one lock. Live samples
//! advance the baseline under that lock; historical series only snapshot it
//! and then generate lock-free on a forked draw source.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

use super::{
    BaselineState, CalendarPosition, Clock, CorrelatedGenerator, DrawSource, RngDrawSource,
    SystemClock,
};
use crate::domain::{TelemetrySample, TimeRange};

struct SimulatorCore {
    baseline: BaselineState,
    draws: Box<dyn DrawSource>,
}

/// Entry point for producing live samples and back-filled series
pub struct TelemetrySimulator {
    core: Mutex<SimulatorCore>,
    live: CorrelatedGenerator,
    historical: CorrelatedGenerator,
    clock: Arc<dyn Clock>,
    timezone: Tz,
}

impl TelemetrySimulator {
    pub fn new(draws: Box<dyn DrawSource>, clock: Arc<dyn Clock>, timezone: Tz) -> Self {
        Self {
            core: Mutex::new(SimulatorCore {
                baseline: BaselineState::default(),
                draws,
            }),
            live: CorrelatedGenerator::live(),
            historical: CorrelatedGenerator::historical(),
            clock,
            timezone,
        }
    }

    /// Wall clock, UTC calendar, seeded when `seed` is set
    pub fn with_seed(seed: Option<u64>) -> Self {
        Self::new(
            Box::new(RngDrawSource::from_seed_option(seed)),
            Arc::new(SystemClock),
            Tz::UTC,
        )
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Snapshot of the current baseline
    pub fn baseline(&self) -> BaselineState {
        self.core.lock().baseline.clone()
    }

    /// Advance the baseline one step and generate a sample stamped now.
    pub fn live_sample(&self) -> TelemetrySample {
        let now = self.clock.now();
        let position = self.position_of(now);

        let mut guard = self.core.lock();
        let core = &mut *guard;
        core.baseline.advance(core.draws.as_mut());
        let sample = self
            .live
            .generate(&core.baseline, now, position, core.draws.as_mut());
        drop(guard);

        debug!(
            timestamp = %sample.timestamp_iso(),
            temperature = sample.temperature,
            network_load = sample.network_load,
            "generated live sample"
        );
        sample
    }

    /// Back-fill `range` at five-minute spacing, most recent first.
    ///
    /// Sample `i` is stamped `now - 5i minutes` and keyed on that instant's
    /// hour and weekday. The baseline is read, never advanced.
    pub fn historical_series(&self, range: TimeRange) -> Vec<TelemetrySample> {
        let now = self.clock.now();
        let (baseline, mut draws) = {
            let mut core = self.core.lock();
            (core.baseline.clone(), core.draws.fork())
        };

        let count = range.sample_count();
        let interval = TimeRange::interval();
        let series: Vec<TelemetrySample> = (0..count)
            .map(|i| {
                let ts = now - interval * i as i32;
                self.historical
                    .generate(&baseline, ts, self.position_of(ts), draws.as_mut())
            })
            .collect();

        debug!(range = %range, count = series.len(), "generated historical series");
        series
    }

    /// Lenient variant keyed by the request string; unknown keys mean 24h
    pub fn historical_series_for_key(&self, key: &str) -> Vec<TelemetrySample> {
        self.historical_series(TimeRange::from_key(key))
    }

    fn position_of(&self, instant: DateTime<Utc>) -> CalendarPosition {
        CalendarPosition::of(&instant.with_timezone(&self.timezone))
    }
}
