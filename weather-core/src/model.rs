use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};

use crate::error::MalformedSample;

/// Display unit system. Storage and aggregation are always metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitPreference {
    #[default]
    Metric,
    Imperial,
}

impl UnitPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitPreference::Metric => "metric",
            UnitPreference::Imperial => "imperial",
        }
    }

    pub const fn all() -> &'static [UnitPreference] {
        &[UnitPreference::Metric, UnitPreference::Imperial]
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            UnitPreference::Metric => "°C",
            UnitPreference::Imperial => "°F",
        }
    }

    pub fn wind_speed_symbol(&self) -> &'static str {
        match self {
            UnitPreference::Metric => "km/h",
            UnitPreference::Imperial => "mph",
        }
    }
}

impl fmt::Display for UnitPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitPreference {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "metric" | "c" | "celsius" => Ok(UnitPreference::Metric),
            "imperial" | "f" | "fahrenheit" => Ok(UnitPreference::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported units: metric, imperial."
            )),
        }
    }
}

/// Weather condition identifier as delivered by the upstream provider.
///
/// OpenWeather uses numeric ids (`500` = light rain), other feeds use text codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionCode {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for ConditionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionCode::Numeric(id) => write!(f, "{id}"),
            ConditionCode::Text(code) => f.write_str(code),
        }
    }
}

impl Default for ConditionCode {
    fn default() -> Self {
        ConditionCode::Text(String::new())
    }
}

/// UTC offset of the observed location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocationTimezone {
    pub utc_offset_seconds: i32,
}

impl LocationTimezone {
    pub const UTC: LocationTimezone = LocationTimezone { utc_offset_seconds: 0 };

    pub fn from_offset_seconds(utc_offset_seconds: i32) -> Self {
        Self { utc_offset_seconds }
    }
}

/// A sample as adapted from provider JSON, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSample {
    pub timestamp_utc: Option<i64>,
    pub temperature_c: Option<f64>,
    pub feels_like_c: Option<f64>,
    pub humidity_pct: Option<u8>,
    pub wind_speed_mps: Option<f64>,
    pub pressure_hpa: Option<u32>,
    pub condition: Option<ConditionCode>,
    pub description: Option<String>,
    /// Provider icon id, e.g. OpenWeather's `10d`.
    pub icon: Option<String>,
    pub is_daytime: Option<bool>,
}

/// One validated weather observation or forecast point, in canonical metric units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSample {
    pub timestamp_utc: i64,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub pressure_hpa: u32,
    pub condition: ConditionCode,
    pub description: String,
    pub icon: Option<String>,
    pub is_daytime: bool,
}

impl TryFrom<&RawSample> for WeatherSample {
    type Error = MalformedSample;

    fn try_from(raw: &RawSample) -> Result<Self, Self::Error> {
        let timestamp_utc = raw.timestamp_utc.ok_or(MalformedSample::MissingTimestamp)?;
        let temperature_c = raw.temperature_c.ok_or(MalformedSample::MissingTemperature)?;
        if !temperature_c.is_finite() {
            return Err(MalformedSample::NonFiniteTemperature);
        }

        Ok(Self {
            timestamp_utc,
            temperature_c,
            feels_like_c: raw
                .feels_like_c
                .filter(|v| v.is_finite())
                .unwrap_or(temperature_c),
            humidity_pct: raw.humidity_pct.unwrap_or(0),
            wind_speed_mps: raw.wind_speed_mps.filter(|v| v.is_finite()).unwrap_or(0.0),
            pressure_hpa: raw.pressure_hpa.unwrap_or(0),
            condition: raw.condition.clone().unwrap_or_default(),
            description: raw.description.clone().unwrap_or_default(),
            icon: raw.icon.clone(),
            is_daytime: raw.is_daytime.unwrap_or(true),
        })
    }
}

impl From<&WeatherSample> for RawSample {
    fn from(sample: &WeatherSample) -> Self {
        Self {
            timestamp_utc: Some(sample.timestamp_utc),
            temperature_c: Some(sample.temperature_c),
            feels_like_c: Some(sample.feels_like_c),
            humidity_pct: Some(sample.humidity_pct),
            wind_speed_mps: Some(sample.wind_speed_mps),
            pressure_hpa: Some(sample.pressure_hpa),
            condition: Some(sample.condition.clone()),
            description: Some(sample.description.clone()),
            icon: sample.icon.clone(),
            is_daytime: Some(sample.is_daytime),
        }
    }
}

/// Current conditions, converted to the requested unit system but not yet rounded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub observed_at_local: NaiveDateTime,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    pub pressure_hpa: u32,
    pub condition: ConditionCode,
    pub description: String,
    pub icon: Option<String>,
    pub is_daytime: bool,
    pub unit: UnitPreference,
}

/// Forecast summary for one location-local calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    /// `YYYY-MM-DD` at the observed location.
    pub day_key: String,
    pub date: NaiveDate,
    /// "Tomorrow" or the weekday name.
    pub label: String,
    pub condition: ConditionCode,
    pub description: String,
    /// Most frequent icon of the day, if the provider supplies icons.
    pub icon: Option<String>,
    pub max_temperature: f64,
    pub min_temperature: f64,
    pub avg_temperature: f64,
    pub sample_count: usize,
    pub unit: UnitPreference,
}

/// A sample the summarizer refused, by its position in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkippedSample {
    pub index: usize,
    pub reason: MalformedSample,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Summary {
    pub current: Option<CurrentConditions>,
    pub daily: Vec<DailySummary>,
    pub skipped: Vec<SkippedSample>,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.daily.is_empty()
    }
}
