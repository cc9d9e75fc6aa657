use anyhow::Result;
use log::{info, warn};
use serde::Serialize;

use crate::{
    model::{CurrentConditions, DailySummary, SkippedSample, UnitPreference},
    source::SampleSource,
    summarize::summarize,
};

/// Everything the front-end needs to render one lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub location_name: Option<String>,
    pub unit: UnitPreference,
    pub current: Option<CurrentConditions>,
    pub daily: Vec<DailySummary>,
    /// Forecast samples that were skipped as malformed.
    pub skipped: Vec<SkippedSample>,
    /// Set when the forecast could not be loaded but current conditions could.
    pub forecast_error: Option<String>,
    /// Set when the current-conditions document failed to load. `current` then
    /// comes from the forecast, if at all.
    pub current_error: Option<String>,
}

/// Load current conditions and forecast concurrently and summarize them.
///
/// A forecast failure is reported in `forecast_error` as long as current
/// conditions are still available. A current-document failure is reported in
/// `current_error` and the forecast's first sample stands in. Fails only when
/// no document could be loaded; documents without usable samples give an empty
/// report.
pub async fn build_report(
    source: &dyn SampleSource,
    unit: UnitPreference,
    max_days: usize,
) -> Result<WeatherReport> {
    let (current, forecast) = tokio::join!(source.current(), source.forecast());

    let (current_feed, current_error) = match current {
        Ok(feed) => (feed, None),
        Err(e) => {
            warn!("Current conditions unavailable, falling back to forecast — error={e:#}");
            (None, Some(format!("{e:#}")))
        }
    };

    let current_summary = current_feed
        .as_ref()
        .map(|feed| summarize(&feed.samples, feed.timezone, unit, 0));

    let mut report = WeatherReport {
        location_name: current_feed.as_ref().and_then(|feed| feed.location_name.clone()),
        unit,
        current: current_summary.and_then(|s| s.current),
        daily: Vec::new(),
        skipped: Vec::new(),
        forecast_error: None,
        current_error,
    };

    match forecast {
        Ok(feed) => {
            let summary = summarize(&feed.samples, feed.timezone, unit, max_days);
            info!(
                "Forecast summarized — samples={} days={} skipped={}",
                feed.samples.len(),
                summary.daily.len(),
                summary.skipped.len()
            );

            if report.location_name.is_none() {
                report.location_name = feed.location_name;
            }
            if report.current.is_none() {
                report.current = summary.current;
            }
            report.daily = summary.daily;
            report.skipped = summary.skipped;
        }
        Err(e) if report.current.is_some() => {
            warn!("Forecast unavailable — error={e:#}");
            report.forecast_error = Some(format!("{e:#}"));
        }
        Err(e) => {
            return Err(e.context("No weather data available"));
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use crate::{
        model::{LocationTimezone, RawSample},
        source::SampleFeed,
    };
    use async_trait::async_trait;

    const MONDAY: i64 = 1_704_067_200;

    #[derive(Debug, Default)]
    struct FakeSource {
        current: Option<SampleFeed>,
        forecast: Option<SampleFeed>,
        fail_current: bool,
    }

    #[async_trait]
    impl SampleSource for FakeSource {
        async fn current(&self) -> Result<Option<SampleFeed>> {
            if self.fail_current {
                return Err(anyhow!("current document is corrupt"));
            }
            Ok(self.current.clone())
        }

        async fn forecast(&self) -> Result<SampleFeed> {
            self.forecast.clone().ok_or_else(|| anyhow!("forecast document is missing"))
        }
    }

    fn feed(name: &str, temps: &[(i64, f64)]) -> SampleFeed {
        SampleFeed {
            location_name: Some(name.to_string()),
            timezone: LocationTimezone::UTC,
            samples: temps
                .iter()
                .map(|(ts, t)| RawSample {
                    timestamp_utc: Some(*ts),
                    temperature_c: Some(*t),
                    ..Default::default()
                })
                .collect(),
        }
    }

    fn two_day_forecast() -> SampleFeed {
        feed("Forecast City", &[(MONDAY, 5.0), (MONDAY + 86_400, 9.0)])
    }

    #[tokio::test]
    async fn current_document_takes_precedence() {
        let source = FakeSource {
            current: Some(feed("Current City", &[(MONDAY + 600, 7.5)])),
            forecast: Some(two_day_forecast()),
            ..Default::default()
        };
        let report = build_report(&source, UnitPreference::Metric, 5).await.unwrap();

        assert_eq!(report.location_name.as_deref(), Some("Current City"));
        assert_eq!(report.current.unwrap().temperature, 7.5);
        assert_eq!(report.daily.len(), 1);
        assert!(report.forecast_error.is_none());
        assert!(report.current_error.is_none());
    }

    #[tokio::test]
    async fn forecast_supplies_current_when_no_current_document() {
        let source = FakeSource { forecast: Some(two_day_forecast()), ..Default::default() };
        let report = build_report(&source, UnitPreference::Metric, 5).await.unwrap();

        assert_eq!(report.location_name.as_deref(), Some("Forecast City"));
        assert_eq!(report.current.unwrap().temperature, 5.0);
        assert!(report.current_error.is_none());
    }

    #[tokio::test]
    async fn failed_current_document_falls_back_to_forecast() {
        let source = FakeSource {
            forecast: Some(two_day_forecast()),
            fail_current: true,
            ..Default::default()
        };
        let report = build_report(&source, UnitPreference::Imperial, 5).await.unwrap();

        assert_eq!(report.current.unwrap().temperature, 41.0);
        assert!(report.forecast_error.is_none());
        let err = report.current_error.expect("current failure should be reported");
        assert!(err.contains("current document is corrupt"));
    }

    #[tokio::test]
    async fn forecast_failure_is_reported_not_masked() {
        let source = FakeSource {
            current: Some(feed("Current City", &[(MONDAY, 7.5)])),
            ..Default::default()
        };
        let report = build_report(&source, UnitPreference::Metric, 5).await.unwrap();

        assert!(report.current.is_some());
        assert!(report.daily.is_empty());
        assert!(report.forecast_error.unwrap().contains("forecast document is missing"));
    }

    #[tokio::test]
    async fn nothing_loadable_is_an_error() {
        let source = FakeSource { fail_current: true, ..Default::default() };
        let err = build_report(&source, UnitPreference::Metric, 5).await.unwrap_err();
        assert!(format!("{err:#}").contains("forecast document is missing"));
    }

    #[tokio::test]
    async fn all_malformed_samples_give_an_empty_report() {
        let source = FakeSource {
            forecast: Some(SampleFeed {
                samples: vec![RawSample::default()],
                ..Default::default()
            }),
            ..Default::default()
        };
        let report = build_report(&source, UnitPreference::Metric, 5).await.unwrap();
        assert!(report.current.is_none());
        assert!(report.daily.is_empty());
        assert_eq!(report.skipped.len(), 1);
    }
}
