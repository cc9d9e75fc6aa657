use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Select};
use log::debug;
use std::path::PathBuf;
use weather_core::{
    Config, DEFAULT_MAX_DAYS, SourceFormat, UnitPreference, build_report, source_from_format,
};

use crate::render::TextReport;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Choose display units, forecast length and default input format.
    Configure,

    /// Summarize saved weather documents into current conditions and a daily forecast.
    Show {
        /// Forecast document, e.g. a saved OpenWeather `/forecast` response.
        #[arg(long, short = 'f')]
        forecast: PathBuf,

        /// Optional current-conditions document, e.g. a saved `/weather` response.
        #[arg(long, short = 'c')]
        current: Option<PathBuf>,

        /// Input format: "openweather" or "samples". Defaults to the configured one.
        #[arg(long)]
        format: Option<String>,

        /// Unit system: "metric" or "imperial". Defaults to the configured one.
        #[arg(long, short = 'u')]
        units: Option<String>,

        /// Number of forecast days (1-5).
        #[arg(long, short = 'd')]
        days: Option<usize>,

        /// Print the report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { forecast, current, format, units, days, json } => {
                let config = Config::load()?;

                let format = match format {
                    Some(f) => SourceFormat::try_from(f.as_str())?,
                    None => config.source_format()?,
                };
                let unit = match units {
                    Some(u) => UnitPreference::try_from(u.as_str())?,
                    None => config.unit_preference()?,
                };
                let max_days = days.map_or(config.max_days(), |d| d.clamp(1, DEFAULT_MAX_DAYS));

                debug!("Showing report — format={format} unit={unit} max_days={max_days}");

                let source = source_from_format(format, forecast, current);
                let report = build_report(&*source, unit, max_days).await?;

                if json {
                    let out = serde_json::to_string_pretty(&report)
                        .context("Failed to serialize report to JSON")?;
                    println!("{out}");
                } else {
                    print!("{}", TextReport(&report));
                }

                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let current_unit = config.unit_preference().unwrap_or_default();
    let unit_cursor =
        UnitPreference::all().iter().position(|u| *u == current_unit).unwrap_or(0);
    let unit = Select::new("Display units:", UnitPreference::all().to_vec())
        .with_starting_cursor(unit_cursor)
        .prompt()?;

    let days = CustomType::<usize>::new("Forecast days (1-5):")
        .with_default(config.max_days())
        .with_error_message("Please enter a whole number")
        .prompt()?;

    let current_format = config.source_format().unwrap_or(SourceFormat::OpenWeather);
    let format_cursor =
        SourceFormat::all().iter().position(|f| *f == current_format).unwrap_or(0);
    let format = Select::new("Default input format:", SourceFormat::all().to_vec())
        .with_starting_cursor(format_cursor)
        .prompt()?;

    config.set_unit_preference(unit);
    config.set_forecast_days(days);
    config.set_source_format(format);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_parses_all_flags() {
        let cli = Cli::try_parse_from([
            "weather", "show", "-f", "forecast.json", "-c", "current.json", "--format", "samples",
            "-u", "imperial", "-d", "3", "--json",
        ])
        .expect("arguments should parse");

        match cli.command {
            Command::Show { forecast, current, format, units, days, json } => {
                assert_eq!(forecast, PathBuf::from("forecast.json"));
                assert_eq!(current, Some(PathBuf::from("current.json")));
                assert_eq!(format.as_deref(), Some("samples"));
                assert_eq!(units.as_deref(), Some("imperial"));
                assert_eq!(days, Some(3));
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn show_requires_forecast() {
        assert!(Cli::try_parse_from(["weather", "show"]).is_err());
    }

    #[test]
    fn configure_takes_no_arguments() {
        let cli = Cli::try_parse_from(["weather", "configure"]).unwrap();
        assert!(matches!(cli.command, Command::Configure));
    }
}
