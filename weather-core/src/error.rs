use serde::Serialize;
use thiserror::Error;

/// Reasons a raw sample cannot take part in a summary.
///
/// None of these are fatal: the summarizer skips the sample and records why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedSample {
    #[error("sample has no timestamp")]
    MissingTimestamp,

    #[error("sample timestamp is outside the representable date range")]
    TimestampOutOfRange,

    #[error("sample has no temperature")]
    MissingTemperature,

    #[error("sample temperature is not a finite number")]
    NonFiniteTemperature,
}
