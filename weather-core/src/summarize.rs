//! Turns an ordered series of samples into current conditions plus a short
//! per-day forecast.
//!
//! Calendar days are always computed from `timestamp + utc_offset` read as a
//! UTC instant, so the result does not depend on the machine's own timezone.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::{debug, warn};
use std::collections::BTreeMap;

use crate::{
    error::MalformedSample,
    model::{
        CurrentConditions, DailySummary, LocationTimezone, RawSample, SkippedSample, Summary,
        UnitPreference, WeatherSample,
    },
    stats::statistical_mode,
    units::{convert_temperature, convert_wind_speed},
};

pub const DEFAULT_MAX_DAYS: usize = 5;

/// Wall-clock time at the observed location.
pub fn local_datetime(timestamp_utc: i64, tz: LocationTimezone) -> Option<NaiveDateTime> {
    let shifted = timestamp_utc.checked_add(i64::from(tz.utc_offset_seconds))?;
    DateTime::<Utc>::from_timestamp(shifted, 0).map(|dt| dt.naive_utc())
}

/// Calendar date at the observed location.
pub fn day_key(timestamp_utc: i64, tz: LocationTimezone) -> Option<NaiveDate> {
    local_datetime(timestamp_utc, tz).map(|dt| dt.date())
}

pub fn current_conditions(
    sample: &WeatherSample,
    tz: LocationTimezone,
    unit: UnitPreference,
) -> Result<CurrentConditions, MalformedSample> {
    let observed_at_local = local_datetime(sample.timestamp_utc, tz)
        .ok_or(MalformedSample::TimestampOutOfRange)?;

    Ok(CurrentConditions {
        observed_at_local,
        temperature: convert_temperature(sample.temperature_c, unit),
        feels_like: convert_temperature(sample.feels_like_c, unit),
        humidity_pct: sample.humidity_pct,
        wind_speed: convert_wind_speed(sample.wind_speed_mps, unit),
        pressure_hpa: sample.pressure_hpa,
        condition: sample.condition.clone(),
        description: sample.description.clone(),
        icon: sample.icon.clone(),
        is_daytime: sample.is_daytime,
        unit,
    })
}

/// Summarize `samples` (expected in non-decreasing timestamp order).
///
/// The first valid sample becomes the current conditions. The earliest calendar
/// day is treated as "today" and left out of the daily forecast; at most
/// `max_days` following days are returned in ascending order.
pub fn summarize(
    samples: &[RawSample],
    tz: LocationTimezone,
    unit: UnitPreference,
    max_days: usize,
) -> Summary {
    let mut summary = Summary::default();
    let mut buckets: BTreeMap<NaiveDate, Vec<WeatherSample>> = BTreeMap::new();
    let mut previous_ts: Option<i64> = None;

    for (index, raw) in samples.iter().enumerate() {
        let validated = WeatherSample::try_from(raw).and_then(|sample| {
            let date =
                day_key(sample.timestamp_utc, tz).ok_or(MalformedSample::TimestampOutOfRange)?;
            Ok((sample, date))
        });

        let (sample, date) = match validated {
            Ok(v) => v,
            Err(reason) => {
                warn!("Skipping malformed sample — index={index} reason={reason}");
                summary.skipped.push(SkippedSample { index, reason });
                continue;
            }
        };

        if previous_ts.is_some_and(|prev| sample.timestamp_utc < prev) {
            debug!(
                "Sample out of timestamp order — index={index} timestamp={}",
                sample.timestamp_utc
            );
        }
        previous_ts = Some(sample.timestamp_utc);

        if summary.current.is_none() {
            summary.current = current_conditions(&sample, tz, unit).ok();
        }

        buckets.entry(date).or_default().push(sample);
    }

    let Some(today) = buckets.keys().next().copied() else {
        debug!("No usable samples — skipped={}", summary.skipped.len());
        return summary;
    };

    summary.daily = buckets
        .iter()
        .skip(1)
        .take(max_days)
        .map(|(date, bucket)| summarize_day(*date, bucket, today, unit))
        .collect();

    debug!(
        "Summarized forecast — today={today} days_seen={} days_emitted={} skipped={}",
        buckets.len(),
        summary.daily.len(),
        summary.skipped.len()
    );

    summary
}

fn summarize_day(
    date: NaiveDate,
    bucket: &[WeatherSample],
    today: NaiveDate,
    unit: UnitPreference,
) -> DailySummary {
    let middle = &bucket[bucket.len() / 2];

    let max_c = bucket.iter().map(|s| s.temperature_c).fold(f64::NEG_INFINITY, f64::max);
    let min_c = bucket.iter().map(|s| s.temperature_c).fold(f64::INFINITY, f64::min);
    let avg_c = bucket.iter().map(|s| s.temperature_c).sum::<f64>() / bucket.len() as f64;

    let condition = statistical_mode(bucket.iter().map(|s| s.condition.clone()))
        .unwrap_or_else(|| middle.condition.clone());

    let description = statistical_mode(
        bucket
            .iter()
            .filter(|s| !s.description.is_empty())
            .map(|s| s.description.as_str()),
    )
    .unwrap_or(middle.description.as_str())
    .to_string();

    let icon = statistical_mode(bucket.iter().filter_map(|s| s.icon.as_deref())).map(str::to_string);

    DailySummary {
        day_key: date.format("%Y-%m-%d").to_string(),
        date,
        label: day_label(date, today),
        condition,
        description,
        icon,
        max_temperature: convert_temperature(max_c, unit),
        min_temperature: convert_temperature(min_c, unit),
        avg_temperature: convert_temperature(avg_c, unit),
        sample_count: bucket.len(),
        unit,
    }
}

fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    if today.succ_opt() == Some(date) {
        "Tomorrow".to_string()
    } else {
        date.format("%A").to_string()
    }
}
