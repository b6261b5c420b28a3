//! # Baseline State
//!
//! Slowly drifting environmental and health baselines shared by every live
//! sample. Each live tick perturbs the drifting fields with a tiny gaussian
//! step and clamps them back into range (clamp, not bounce).

use serde::{Deserialize, Serialize};

use super::DrawSource;
use crate::domain::Bounds;

pub const TEMPERATURE_RANGE: Bounds = Bounds::new(18.0, 48.0);
pub const HUMIDITY_RANGE: Bounds = Bounds::new(30.0, 85.0);
pub const WIND_SPEED_RANGE: Bounds = Bounds::new(3.0, 35.0);
pub const PRESSURE_RANGE: Bounds = Bounds::new(985.0, 1045.0);
pub const UPTIME_RANGE: Bounds = Bounds::new(99.5, 100.0);
pub const EQUIPMENT_AGE_RANGE: Bounds = Bounds::new(0.0, 1.0);

/// Battery is never discharged
pub const PINNED_BATTERY: f64 = 100.0;

const TEMPERATURE_STEP_SIGMA: f64 = 0.005;
const HUMIDITY_STEP_SIGMA: f64 = 0.008;
const WIND_SPEED_STEP_SIGMA: f64 = 0.01;
const PRESSURE_STEP_SIGMA: f64 = 0.02;

const UPTIME_RECOVERY_THRESHOLD: f64 = 99.95;
const UPTIME_RECOVERY_STEP: f64 = 0.000005;
const UPTIME_DIP_PROBABILITY: f64 = 0.00005;
const UPTIME_DIP_STEP: f64 = 0.00005;

/// Equipment age added per live tick
pub const EQUIPMENT_AGE_STEP: f64 = 0.0000005;

/// Process-lifetime baselines the generator derives metrics from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineState {
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub pressure: f64,
    pub battery: f64,
    pub uptime: f64,
    /// Aging factor in `[0, 1]`, never decreases
    pub equipment_age: f64,
}

impl Default for BaselineState {
    fn default() -> Self {
        Self {
            temperature: 25.0,
            humidity: 55.0,
            wind_speed: 12.0,
            pressure: 1013.0,
            battery: PINNED_BATTERY,
            uptime: 99.98,
            equipment_age: 0.0,
        }
    }
}

impl BaselineState {
    /// One drift step. Consumes four gaussian draws, plus one uniform draw
    /// when uptime is healthy enough to dip.
    pub fn advance(&mut self, draws: &mut dyn DrawSource) {
        self.temperature += draws.normal(TEMPERATURE_STEP_SIGMA);
        self.humidity += draws.normal(HUMIDITY_STEP_SIGMA);
        self.wind_speed += draws.normal(WIND_SPEED_STEP_SIGMA);
        self.pressure += draws.normal(PRESSURE_STEP_SIGMA);

        if self.uptime < UPTIME_RECOVERY_THRESHOLD {
            self.uptime += UPTIME_RECOVERY_STEP;
        } else if draws.chance(UPTIME_DIP_PROBABILITY) {
            self.uptime -= UPTIME_DIP_STEP;
        }

        self.equipment_age += EQUIPMENT_AGE_STEP;

        self.temperature = TEMPERATURE_RANGE.clamp(self.temperature);
        self.humidity = HUMIDITY_RANGE.clamp(self.humidity);
        self.wind_speed = WIND_SPEED_RANGE.clamp(self.wind_speed);
        self.pressure = PRESSURE_RANGE.clamp(self.pressure);
        self.battery = PINNED_BATTERY;
        self.uptime = UPTIME_RANGE.clamp(self.uptime);
        self.equipment_age = EQUIPMENT_AGE_RANGE.clamp(self.equipment_age);
    }

    /// Whether every field sits inside its clamp range
    pub fn is_within_bounds(&self) -> bool {
        TEMPERATURE_RANGE.contains(self.temperature)
            && HUMIDITY_RANGE.contains(self.humidity)
            && WIND_SPEED_RANGE.contains(self.wind_speed)
            && PRESSURE_RANGE.contains(self.pressure)
            && self.battery == PINNED_BATTERY
            && UPTIME_RANGE.contains(self.uptime)
            && EQUIPMENT_AGE_RANGE.contains(self.equipment_age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{RngDrawSource, ScriptedDrawSource};

    #[test]
    fn test_initial_values() {
        let b = BaselineState::default();
        assert_eq!(b.temperature, 25.0);
        assert_eq!(b.humidity, 55.0);
        assert_eq!(b.wind_speed, 12.0);
        assert_eq!(b.pressure, 1013.0);
        assert_eq!(b.battery, 100.0);
        assert_eq!(b.uptime, 99.98);
        assert_eq!(b.equipment_age, 0.0);
        assert!(b.is_within_bounds());
    }

    #[test]
    fn test_advance_applies_scaled_steps() {
        let mut b = BaselineState::default();
        let mut draws = ScriptedDrawSource::new()
            .with_gaussians([1.0, -1.0, 2.0, 0.5])
            .with_uniforms([0.9]);
        b.advance(&mut draws);

        assert!((b.temperature - 25.005).abs() < 1e-12);
        assert!((b.humidity - 54.992).abs() < 1e-12);
        assert!((b.wind_speed - 12.02).abs() < 1e-12);
        assert!((b.pressure - 1013.01).abs() < 1e-12);
        assert_eq!(b.uptime, 99.98);
        assert_eq!(b.equipment_age, EQUIPMENT_AGE_STEP);
    }

    #[test]
    fn test_advance_clamps_instead_of_bouncing() {
        let mut b = BaselineState {
            temperature: 47.999,
            pressure: 985.001,
            ..Default::default()
        };
        let mut draws = ScriptedDrawSource::new().with_gaussians([10.0, 0.0, 0.0, -10.0]);
        b.advance(&mut draws);
        assert_eq!(b.temperature, 48.0);
        assert_eq!(b.pressure, 985.0);
    }

    #[test]
    fn test_uptime_recovers_below_threshold() {
        let mut b = BaselineState {
            uptime: 99.9,
            ..Default::default()
        };
        let mut draws = ScriptedDrawSource::new();
        b.advance(&mut draws);
        assert!((b.uptime - (99.9 + UPTIME_RECOVERY_STEP)).abs() < 1e-12);
    }

    #[test]
    fn test_uptime_dips_on_rare_draw() {
        let mut b = BaselineState::default();
        // uniform 0.0 is below the dip probability
        let mut draws = ScriptedDrawSource::new().with_uniforms([0.0]);
        b.advance(&mut draws);
        assert!((b.uptime - (99.98 - UPTIME_DIP_STEP)).abs() < 1e-12);
    }

    #[test]
    fn test_battery_stays_pinned() {
        let mut b = BaselineState {
            battery: 42.0,
            ..Default::default()
        };
        b.advance(&mut RngDrawSource::seeded(1));
        assert_eq!(b.battery, 100.0);
    }

    #[test]
    fn test_equipment_age_caps_at_one() {
        let mut b = BaselineState {
            equipment_age: 1.0 - EQUIPMENT_AGE_STEP / 2.0,
            ..Default::default()
        };
        let mut draws = RngDrawSource::seeded(5);
        b.advance(&mut draws);
        assert_eq!(b.equipment_age, 1.0);
        b.advance(&mut draws);
        assert_eq!(b.equipment_age, 1.0);
    }

    #[test]
    fn test_long_walk_stays_in_bounds() {
        let mut b = BaselineState::default();
        let mut draws = RngDrawSource::seeded(99);
        let mut last_age = b.equipment_age;
        for _ in 0..100_000 {
            b.advance(&mut draws);
            assert!(b.is_within_bounds());
            assert!(b.equipment_age >= last_age);
            last_age = b.equipment_age;
        }
    }
}
