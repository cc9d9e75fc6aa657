use anyhow::{Context, Result};
use async_trait::async_trait;
use log::warn;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;

use crate::model::{ConditionCode, LocationTimezone, RawSample};

use super::{SampleFeed, SampleSource, field, read_document};

/// The crate's own input document. Example:
///
/// ```json
/// { "location": "Porto, PT", "utc_offset_seconds": 0,
///   "samples": [{ "timestamp_utc": 1704067200, "temperature_c": 11.5 }] }
/// ```
///
/// Samples are converted one at a time: a sample with a mistyped field keeps
/// its well-typed fields and loses the rest, so the summarizer can skip it.
#[derive(Debug, Deserialize)]
struct SamplesDocument {
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    utc_offset_seconds: i32,
    #[serde(default)]
    samples: Vec<Value>,
}

pub fn parse_samples(body: &str) -> Result<SampleFeed> {
    let doc: SamplesDocument = serde_json::from_str(body)?;

    Ok(SampleFeed {
        location_name: doc.location,
        timezone: LocationTimezone::from_offset_seconds(doc.utc_offset_seconds),
        samples: doc
            .samples
            .iter()
            .enumerate()
            .map(|(index, sample)| raw_sample(index, sample))
            .collect(),
    })
}

fn raw_sample(index: usize, sample: &Value) -> RawSample {
    RawSample::deserialize(sample).unwrap_or_else(|e| {
        warn!("Sample has mistyped fields, reading leniently — index={index} error={e}");
        RawSample {
            timestamp_utc: field::i64_at(sample, "/timestamp_utc"),
            temperature_c: field::f64_at(sample, "/temperature_c"),
            feels_like_c: field::f64_at(sample, "/feels_like_c"),
            humidity_pct: field::u8_at(sample, "/humidity_pct"),
            wind_speed_mps: field::f64_at(sample, "/wind_speed_mps"),
            pressure_hpa: field::u32_at(sample, "/pressure_hpa"),
            condition: sample
                .get("condition")
                .and_then(|c| ConditionCode::deserialize(c).ok()),
            description: field::string_at(sample, "/description"),
            icon: field::string_at(sample, "/icon"),
            is_daytime: field::bool_at(sample, "/is_daytime"),
        }
    })
}

#[derive(Debug, Clone)]
pub struct SamplesFiles {
    forecast_path: PathBuf,
    current_path: Option<PathBuf>,
}

impl SamplesFiles {
    pub fn new(forecast_path: PathBuf, current_path: Option<PathBuf>) -> Self {
        Self { forecast_path, current_path }
    }
}

#[async_trait]
impl SampleSource for SamplesFiles {
    async fn current(&self) -> Result<Option<SampleFeed>> {
        let Some(path) = &self.current_path else {
            return Ok(None);
        };

        let body = read_document(path).await?;
        parse_samples(&body)
            .with_context(|| format!("Failed to parse samples JSON: {}", path.display()))
            .map(Some)
    }

    async fn forecast(&self) -> Result<SampleFeed> {
        let body = read_document(&self.forecast_path).await?;
        parse_samples(&body).with_context(|| {
            format!("Failed to parse samples JSON: {}", self.forecast_path.display())
        })
    }
}
