//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Forecast bucketing: per-day summaries from a raw sample series
//! - Unit normalization (Celsius and m/s internally, converted only for display)
//! - Adapters from provider documents into raw samples
//! - Configuration handling
//!
//! It is used by `weather-cli`, but the summarizer is pure and can be reused by
//! any front-end that adapts its own data into [`RawSample`]s.

pub mod config;
pub mod error;
pub mod model;
pub mod report;
pub mod source;
pub mod stats;
pub mod summarize;
pub mod units;

pub use config::Config;
pub use error::MalformedSample;
pub use model::{
    ConditionCode, CurrentConditions, DailySummary, LocationTimezone, RawSample, SkippedSample,
    Summary, UnitPreference, WeatherSample,
};
pub use report::{WeatherReport, build_report};
pub use source::{SampleFeed, SampleSource, SourceFormat, source_from_format};
pub use stats::statistical_mode;
pub use summarize::{DEFAULT_MAX_DAYS, current_conditions, day_key, summarize};
pub use units::{convert_temperature, convert_wind_speed};
