use crate::{
    model::{LocationTimezone, RawSample},
    source::{openweather::OpenWeatherFiles, samples::SamplesFiles},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug, path::PathBuf};

pub mod openweather;
pub mod samples;

/// Input document formats the CLI can summarize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// Saved OpenWeatherMap `/forecast` and `/weather` responses.
    OpenWeather,
    /// This crate's own `{ location, utc_offset_seconds, samples }` document.
    Samples,
}

impl SourceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::OpenWeather => "openweather",
            SourceFormat::Samples => "samples",
        }
    }

    pub const fn all() -> &'static [SourceFormat] {
        &[SourceFormat::OpenWeather, SourceFormat::Samples]
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SourceFormat {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(SourceFormat::OpenWeather),
            "samples" => Ok(SourceFormat::Samples),
            _ => Err(anyhow::anyhow!(
                "Unknown input format '{value}'. Supported formats: openweather, samples."
            )),
        }
    }
}

/// Samples for one location, already adapted from a provider document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleFeed {
    pub location_name: Option<String>,
    pub timezone: LocationTimezone,
    pub samples: Vec<RawSample>,
}

#[async_trait]
pub trait SampleSource: Send + Sync + Debug {
    /// Current-conditions feed, or `None` when the source has no separate one.
    async fn current(&self) -> anyhow::Result<Option<SampleFeed>>;

    /// Time series used for the daily forecast.
    async fn forecast(&self) -> anyhow::Result<SampleFeed>;
}

/// Construct a file-backed source for `format`.
pub fn source_from_format(
    format: SourceFormat,
    forecast_path: PathBuf,
    current_path: Option<PathBuf>,
) -> Box<dyn SampleSource> {
    match format {
        SourceFormat::OpenWeather => Box::new(OpenWeatherFiles::new(forecast_path, current_path)),
        SourceFormat::Samples => Box::new(SamplesFiles::new(forecast_path, current_path)),
    }
}

pub(crate) async fn read_document(path: &std::path::Path) -> anyhow::Result<String> {
    use anyhow::Context;

    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read weather document: {}", path.display()))
}

/// Typed field lookups on a JSON entry by pointer (`/main/temp`).
///
/// A field of the wrong type or out of range reads as absent, so one bad entry
/// degrades into a malformed sample instead of failing the whole document.
pub(crate) mod field {
    use serde_json::Value;

    pub fn f64_at(value: &Value, pointer: &str) -> Option<f64> {
        value.pointer(pointer).and_then(Value::as_f64)
    }

    pub fn i64_at(value: &Value, pointer: &str) -> Option<i64> {
        value.pointer(pointer).and_then(Value::as_i64)
    }

    pub fn i32_at(value: &Value, pointer: &str) -> Option<i32> {
        i64_at(value, pointer).and_then(|v| i32::try_from(v).ok())
    }

    pub fn u8_at(value: &Value, pointer: &str) -> Option<u8> {
        value.pointer(pointer).and_then(Value::as_u64).and_then(|v| u8::try_from(v).ok())
    }

    pub fn u32_at(value: &Value, pointer: &str) -> Option<u32> {
        value.pointer(pointer).and_then(Value::as_u64).and_then(|v| u32::try_from(v).ok())
    }

    pub fn bool_at(value: &Value, pointer: &str) -> Option<bool> {
        value.pointer(pointer).and_then(Value::as_bool)
    }

    pub fn string_at(value: &Value, pointer: &str) -> Option<String> {
        value.pointer(pointer).and_then(Value::as_str).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_format_as_str_roundtrip() {
        for format in SourceFormat::all() {
            let s = format.as_str();
            let parsed = SourceFormat::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*format, parsed);
        }
    }

    #[test]
    fn source_format_is_case_insensitive() {
        assert_eq!(SourceFormat::try_from("OpenWeather").unwrap(), SourceFormat::OpenWeather);
    }

    #[test]
    fn unknown_format_error() {
        let err = SourceFormat::try_from("doesnotexist").unwrap_err();
        assert!(err.to_string().contains("Unknown input format"));
    }

    #[test]
    fn field_lookups_treat_wrong_types_as_absent() {
        let entry = serde_json::json!({
            "dt": 1704067200.5,
            "main": {"temp": "n/a", "humidity": 300, "pressure": 1012},
            "ok": true
        });

        assert_eq!(field::i64_at(&entry, "/dt"), None);
        assert_eq!(field::f64_at(&entry, "/dt"), Some(1704067200.5));
        assert_eq!(field::f64_at(&entry, "/main/temp"), None);
        assert_eq!(field::string_at(&entry, "/main/temp").as_deref(), Some("n/a"));
        assert_eq!(field::u8_at(&entry, "/main/humidity"), None);
        assert_eq!(field::u32_at(&entry, "/main/pressure"), Some(1012));
        assert_eq!(field::bool_at(&entry, "/ok"), Some(true));
        assert_eq!(field::i32_at(&entry, "/missing"), None);
    }

    #[tokio::test]
    async fn missing_file_error_names_the_path() {
        let source = source_from_format(
            SourceFormat::Samples,
            PathBuf::from("/definitely/not/here.json"),
            None,
        );
        let err = source.forecast().await.unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
