use std::fmt;
use weather_core::{
    WeatherReport,
    units::{format_temperature, format_wind_speed},
};

/// Human-readable rendering of a report, ending with a newline.
pub struct TextReport<'a>(pub &'a WeatherReport);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let unit = report.unit;

        writeln!(f, "{}", report.location_name.as_deref().unwrap_or("Unknown location"))?;

        if let Some(err) = &report.current_error {
            writeln!(f, "  Current conditions unavailable: {err}")?;
        }

        match &report.current {
            Some(now) => {
                writeln!(
                    f,
                    "  Now:       {}, {} (feels like {})",
                    format_temperature(now.temperature, unit),
                    describe(&now.description),
                    format_temperature(now.feels_like, unit),
                )?;
                writeln!(f, "  Humidity:  {}%", now.humidity_pct)?;
                writeln!(f, "  Wind:      {}", format_wind_speed(now.wind_speed, unit))?;
                if now.pressure_hpa > 0 {
                    writeln!(f, "  Pressure:  {} hPa", now.pressure_hpa)?;
                }
                writeln!(
                    f,
                    "  Observed:  {} local time",
                    now.observed_at_local.format("%a %d %b %H:%M")
                )?;
            }
            None if report.daily.is_empty() => {
                writeln!(f, "  No usable weather samples.")?;
            }
            None => {}
        }

        writeln!(f)?;

        if let Some(err) = &report.forecast_error {
            writeln!(f, "Forecast unavailable: {err}")?;
        } else if report.daily.is_empty() {
            writeln!(f, "No forecast beyond today.")?;
        } else {
            writeln!(f, "Forecast")?;
            for day in &report.daily {
                writeln!(
                    f,
                    "  {:<10}  {:<22}  {:>5} / {:<5}",
                    day.label,
                    describe(&day.description),
                    format_temperature(day.max_temperature, unit),
                    format_temperature(day.min_temperature, unit),
                )?;
            }
        }

        if !report.skipped.is_empty() {
            writeln!(f, "({} malformed samples skipped)", report.skipped.len())?;
        }

        Ok(())
    }
}

fn describe(description: &str) -> &str {
    if description.is_empty() { "unknown conditions" } else { description }
}
