use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use log::warn;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;

use crate::model::{ConditionCode, LocationTimezone, RawSample};

use super::{SampleFeed, SampleSource, field, read_document};

/// OpenWeatherMap responses saved to disk (`/data/2.5/forecast` and optionally `/data/2.5/weather`).
#[derive(Debug, Clone)]
pub struct OpenWeatherFiles {
    forecast_path: PathBuf,
    current_path: Option<PathBuf>,
}

impl OpenWeatherFiles {
    pub fn new(forecast_path: PathBuf, current_path: Option<PathBuf>) -> Self {
        Self { forecast_path, current_path }
    }
}

#[async_trait]
impl SampleSource for OpenWeatherFiles {
    async fn current(&self) -> Result<Option<SampleFeed>> {
        let Some(path) = &self.current_path else {
            return Ok(None);
        };

        let body = read_document(path).await?;
        parse_current(&body)
            .with_context(|| format!("Failed to parse OpenWeather current JSON: {}", path.display()))
            .map(Some)
    }

    async fn forecast(&self) -> Result<SampleFeed> {
        let body = read_document(&self.forecast_path).await?;
        parse_forecast(&body).with_context(|| {
            format!("Failed to parse OpenWeather forecast JSON: {}", self.forecast_path.display())
        })
    }
}

/// Adapt a 3-hourly `/forecast` response.
pub fn parse_forecast(body: &str) -> Result<SampleFeed> {
    let parsed: OwForecastResponse = serde_json::from_str(body)?;

    let Some(list) = parsed.list else {
        return Err(api_error(parsed.cod.as_ref(), parsed.message.as_ref().and_then(|m| m.as_str())));
    };

    let city = parsed.city.unwrap_or(Value::Null);
    let location_name = field::string_at(&city, "/name").map(|name| {
        match field::string_at(&city, "/country") {
            Some(country) => format!("{name}, {country}"),
            None => name,
        }
    });

    Ok(SampleFeed {
        location_name,
        timezone: LocationTimezone::from_offset_seconds(
            field::i32_at(&city, "/timezone").unwrap_or(0),
        ),
        samples: list
            .iter()
            .enumerate()
            .map(|(index, entry)| OwEntry::from_json(index, entry).into_raw())
            .collect(),
    })
}

/// Adapt a `/weather` current-conditions response into a single-sample feed.
pub fn parse_current(body: &str) -> Result<SampleFeed> {
    let parsed: Value = serde_json::from_str(body)?;

    if parsed.get("main").is_none() {
        return Err(api_error(parsed.get("cod"), parsed.get("message").and_then(Value::as_str)));
    }

    let location_name = field::string_at(&parsed, "/name").filter(|n| !n.is_empty()).map(|name| {
        match field::string_at(&parsed, "/sys/country") {
            Some(country) => format!("{name}, {country}"),
            None => name,
        }
    });

    Ok(SampleFeed {
        location_name,
        timezone: LocationTimezone::from_offset_seconds(
            field::i32_at(&parsed, "/timezone").unwrap_or(0),
        ),
        samples: vec![OwEntry::from_json(0, &parsed).into_raw()],
    })
}

fn api_error(cod: Option<&Value>, message: Option<&str>) -> anyhow::Error {
    let cod = cod.map(|c| c.to_string().trim_matches('"').to_string()).unwrap_or_default();
    anyhow!(
        "OpenWeather response has no weather data (cod {}): {}",
        if cod.is_empty() { "?" } else { cod.as_str() },
        message.unwrap_or("no message")
    )
}

#[derive(Debug, Default, Deserialize)]
struct OwMain {
    temp: Option<f64>,
    feels_like: Option<f64>,
    pressure: Option<u32>,
    humidity: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: Option<i64>,
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OwWind {
    speed: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    pod: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwEntry {
    dt: Option<i64>,
    #[serde(default)]
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwWind,
    sys: Option<OwSys>,
}

impl OwEntry {
    /// Deserialize one list entry, reading fields one by one if any has the wrong type.
    fn from_json(index: usize, entry: &Value) -> Self {
        OwEntry::deserialize(entry).unwrap_or_else(|e| {
            warn!("OpenWeather entry has mistyped fields, reading leniently — index={index} error={e}");
            OwEntry::from_fields(entry)
        })
    }

    fn from_fields(entry: &Value) -> Self {
        OwEntry {
            dt: field::i64_at(entry, "/dt"),
            main: OwMain {
                temp: field::f64_at(entry, "/main/temp"),
                feels_like: field::f64_at(entry, "/main/feels_like"),
                pressure: field::u32_at(entry, "/main/pressure"),
                humidity: field::u8_at(entry, "/main/humidity"),
            },
            weather: vec![OwWeather {
                id: field::i64_at(entry, "/weather/0/id"),
                description: field::string_at(entry, "/weather/0/description"),
                icon: field::string_at(entry, "/weather/0/icon"),
            }],
            wind: OwWind { speed: field::f64_at(entry, "/wind/speed") },
            sys: Some(OwSys { pod: field::string_at(entry, "/sys/pod") }),
        }
    }

    fn into_raw(self) -> RawSample {
        let weather = self.weather.into_iter().next();
        let (id, description, icon) = match weather {
            Some(w) => (w.id, w.description, w.icon),
            None => (None, None, None),
        };

        let is_daytime = icon
            .as_deref()
            .and_then(|i| i.chars().last())
            .or_else(|| self.sys.as_ref().and_then(|s| s.pod.as_deref()).and_then(|p| p.chars().next()))
            .and_then(|c| match c {
                'd' => Some(true),
                'n' => Some(false),
                _ => None,
            });

        let condition =
            id.map(ConditionCode::Numeric).or_else(|| icon.clone().map(ConditionCode::Text));

        RawSample {
            timestamp_utc: self.dt,
            temperature_c: self.main.temp,
            feels_like_c: self.main.feels_like,
            humidity_pct: self.main.humidity,
            wind_speed_mps: self.wind.speed,
            pressure_hpa: self.main.pressure,
            condition,
            description,
            icon,
            is_daytime,
        }
    }
}

/// Entries and city are kept as raw JSON so a single mistyped field only
/// affects the entry it belongs to.
#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    cod: Option<Value>,
    message: Option<Value>,
    city: Option<Value>,
    list: Option<Vec<Value>>,
}
