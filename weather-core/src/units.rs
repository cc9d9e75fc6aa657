//! Conversions from the canonical metric units to the display unit system.
//!
//! Aggregation always happens on unrounded Celsius and m/s values; these
//! helpers are only meant to be applied at the output boundary.

use crate::model::UnitPreference;

const MPS_TO_KMH: f64 = 3.6;
const MPS_TO_MPH: f64 = 2.23694;

pub fn convert_temperature(celsius: f64, to: UnitPreference) -> f64 {
    match to {
        UnitPreference::Metric => celsius,
        UnitPreference::Imperial => celsius * 9.0 / 5.0 + 32.0,
    }
}

pub fn convert_wind_speed(meters_per_second: f64, to: UnitPreference) -> f64 {
    match to {
        UnitPreference::Metric => meters_per_second * MPS_TO_KMH,
        UnitPreference::Imperial => meters_per_second * MPS_TO_MPH,
    }
}

/// Nearest integer, halves away from zero.
pub fn round_display(value: f64) -> i64 {
    value.round() as i64
}

/// `21°C`, `70°F`. Expects a value already converted to `unit`.
pub fn format_temperature(value: f64, unit: UnitPreference) -> String {
    format!("{}{}", round_display(value), unit.temperature_symbol())
}

/// `12.6 km/h`. Expects a value already converted to `unit`.
pub fn format_wind_speed(value: f64, unit: UnitPreference) -> String {
    format!("{value:.1} {}", unit.wind_speed_symbol())
}
