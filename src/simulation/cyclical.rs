//! # Cyclical Pattern Model
//!
//! Deterministic hour-of-day / day-of-week modifiers: the UV curve, the
//! diurnal temperature swing, and rush-hour / weekend network multipliers.

use chrono::{DateTime, Datelike, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const NIGHT_UV: f64 = 0.2;
const PEAK_UV: f64 = 10.0;
const MIDDAY_UV_BOOST: f64 = 2.0;

/// Wall-clock position that cyclical effects are keyed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarPosition {
    /// Hour of day, 0-23
    pub hour: u32,
    /// ISO day of week, Monday = 1 through Sunday = 7
    pub day_of_week: u32,
}

impl CalendarPosition {
    pub fn new(hour: u32, day_of_week: u32) -> Self {
        Self { hour, day_of_week }
    }

    /// Position of an instant as seen in the instant's own time zone
    pub fn of<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self {
            hour: instant.hour(),
            day_of_week: instant.weekday().number_from_monday(),
        }
    }
}

/// Sine of the sun's progress through the 06:00-18:00 day, peaking at noon.
/// Negative at night.
pub fn solar_phase(hour: u32) -> f64 {
    ((hour as f64 - 6.0) * PI / 12.0).sin()
}

/// Noise-free UV index for an hour of day
pub fn uv_index_for_hour(hour: u32) -> f64 {
    match hour {
        6..=18 => {
            let mut uv = solar_phase(hour) * PEAK_UV;
            if (10..=14).contains(&hour) {
                uv += MIDDAY_UV_BOOST;
            }
            uv
        }
        _ => NIGHT_UV,
    }
}

pub fn is_rush_hour(hour: u32) -> bool {
    matches!(hour, 7..=9 | 17..=19)
}

pub fn is_weekend(day_of_week: u32) -> bool {
    matches!(day_of_week, 6 | 7)
}

/// Magnitudes of the cyclical effects for one generation profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CyclicalPattern {
    /// Peak diurnal tower-temperature swing in °C
    pub diurnal_amplitude: f64,
    /// Fractional network-load increase during rush hour
    pub rush_hour_boost: f64,
    /// Fractional network-load decrease on weekends
    pub weekend_dip: f64,
}

/// Modifiers for one calendar position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CyclicalModifiers {
    pub uv_base: f64,
    pub diurnal_offset: f64,
    pub rush_hour: bool,
    pub rush_hour_multiplier: f64,
    pub weekend_multiplier: f64,
}

impl CyclicalPattern {
    pub fn diurnal_temperature_offset(&self, hour: u32) -> f64 {
        solar_phase(hour) * self.diurnal_amplitude
    }

    pub fn rush_hour_multiplier(&self, hour: u32) -> f64 {
        if is_rush_hour(hour) {
            1.0 + self.rush_hour_boost
        } else {
            1.0
        }
    }

    pub fn weekend_multiplier(&self, day_of_week: u32) -> f64 {
        if is_weekend(day_of_week) {
            1.0 - self.weekend_dip
        } else {
            1.0
        }
    }

    pub fn modifiers(&self, position: CalendarPosition) -> CyclicalModifiers {
        CyclicalModifiers {
            uv_base: uv_index_for_hour(position.hour),
            diurnal_offset: self.diurnal_temperature_offset(position.hour),
            rush_hour: is_rush_hour(position.hour),
            rush_hour_multiplier: self.rush_hour_multiplier(position.hour),
            weekend_multiplier: self.weekend_multiplier(position.day_of_week),
        }
    }
}
