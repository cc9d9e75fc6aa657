use serde_json::{Value, json};
use std::{fs, path::PathBuf};
use weather_core::{
    ConditionCode, DEFAULT_MAX_DAYS, SourceFormat, UnitPreference, build_report, source_from_format,
};

// 2024-01-01T00:00:00Z
const START: i64 = 1_704_067_200;
const TOKYO_OFFSET: i64 = 9 * 3_600;

/// A 40-entry, 3-hourly `/forecast` body for a city at UTC+9.
fn tokyo_forecast() -> Value {
    let list: Vec<Value> = (0..40)
        .map(|i| {
            let dt = START + i * 3 * 3_600;
            let local_hour = ((dt + TOKYO_OFFSET) / 3_600) % 24;
            let daytime = (6..18).contains(&local_hour);
            let (id, description) = if i % 8 < 3 { (500, "light rain") } else { (804, "overcast clouds") };
            let (icon, pod) = if daytime { ("04d", "d") } else { ("04n", "n") };
            json!({
                "dt": dt,
                "main": {
                    "temp": 2.0 + (i % 8) as f64,
                    "feels_like": (i % 8) as f64,
                    "pressure": 1015,
                    "humidity": 60
                },
                "weather": [{
                    "id": id,
                    "description": description,
                    "icon": icon
                }],
                "wind": { "speed": 5.0 },
                "sys": { "pod": pod }
            })
        })
        .collect();

    json!({
        "cod": "200",
        "message": 0,
        "cnt": 40,
        "list": list,
        "city": { "name": "Tokyo", "country": "JP", "timezone": TOKYO_OFFSET }
    })
}

fn write_json(dir: &tempfile::TempDir, name: &str, value: &Value) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

#[tokio::test]
async fn forecast_file_is_bucketed_by_location_local_day() {
    let dir = tempfile::tempdir().unwrap();
    let forecast = write_json(&dir, "forecast.json", &tokyo_forecast());

    let source = source_from_format(SourceFormat::OpenWeather, forecast, None);
    let report = build_report(&*source, UnitPreference::Metric, DEFAULT_MAX_DAYS)
        .await
        .expect("report should build");

    assert_eq!(report.location_name.as_deref(), Some("Tokyo, JP"));

    let keys: Vec<&str> = report.daily.iter().map(|d| d.day_key.as_str()).collect();
    assert_eq!(keys, vec!["2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05", "2024-01-06"]);

    let labels: Vec<&str> = report.daily.iter().map(|d| d.label.as_str()).collect();
    assert_eq!(labels, vec!["Tomorrow", "Wednesday", "Thursday", "Friday", "Saturday"]);

    let counts: Vec<usize> = report.daily.iter().map(|d| d.sample_count).collect();
    assert_eq!(counts, vec![8, 8, 8, 8, 3]);

    for day in &report.daily {
        assert!(day.max_temperature >= day.min_temperature);
    }
    assert_eq!(report.daily[0].condition, ConditionCode::Numeric(804));
    assert_eq!(report.daily[0].description, "overcast clouds");

    let current = report.current.expect("current conditions come from the first entry");
    assert_eq!(current.observed_at_local.to_string(), "2024-01-01 09:00:00");
    assert!((current.wind_speed - 18.0).abs() < 1e-9);
    assert!(current.is_daytime);
}

#[tokio::test]
async fn imperial_report_converts_only_at_the_boundary() {
    let dir = tempfile::tempdir().unwrap();
    let forecast = write_json(&dir, "forecast.json", &tokyo_forecast());

    let source = source_from_format(SourceFormat::OpenWeather, forecast, None);
    let report = build_report(&*source, UnitPreference::Imperial, 2).await.unwrap();

    assert_eq!(report.daily.len(), 2);
    // 2..=9 °C across a full day.
    assert!((report.daily[0].min_temperature - 35.6).abs() < 1e-9);
    assert!((report.daily[0].max_temperature - 48.2).abs() < 1e-9);
    assert!((report.current.unwrap().wind_speed - 11.1847).abs() < 1e-9);
}

#[tokio::test]
async fn broken_forecast_keeps_current_conditions() {
    let dir = tempfile::tempdir().unwrap();
    let forecast = write_json(&dir, "forecast.json", &json!({ "cod": "404", "message": "city not found" }));
    let current = write_json(
        &dir,
        "current.json",
        &json!({
            "name": "Tokyo",
            "sys": { "country": "JP" },
            "timezone": TOKYO_OFFSET,
            "dt": START,
            "main": { "temp": 3.0, "feels_like": 0.5, "pressure": 1016, "humidity": 55 },
            "weather": [{ "id": 800, "description": "clear sky", "icon": "01d" }],
            "wind": { "speed": 2.0 },
            "cod": 200
        }),
    );

    let source = source_from_format(SourceFormat::OpenWeather, forecast, Some(current));
    let report = build_report(&*source, UnitPreference::Metric, DEFAULT_MAX_DAYS)
        .await
        .unwrap();

    assert_eq!(report.current.unwrap().description, "clear sky");
    assert!(report.daily.is_empty());
    assert!(report.forecast_error.unwrap().contains("city not found"));
}

#[tokio::test]
async fn samples_document_with_malformed_entries() {
    let dir = tempfile::tempdir().unwrap();
    let doc = json!({
        "location": "Somewhere",
        "utc_offset_seconds": 0,
        "samples": [
            { "timestamp_utc": START, "temperature_c": 10.0 },
            { "timestamp_utc": START + 86_400 },
            { "timestamp_utc": START + 86_400 + 3_600, "temperature_c": 12.0 }
        ]
    });
    let path = write_json(&dir, "samples.json", &doc);

    let source = source_from_format(SourceFormat::Samples, path, None);
    let report = build_report(&*source, UnitPreference::Metric, DEFAULT_MAX_DAYS)
        .await
        .unwrap();

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].index, 1);
    assert_eq!(report.daily.len(), 1);
    assert_eq!(report.daily[0].sample_count, 1);
}
