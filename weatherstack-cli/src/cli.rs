use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use inquire::{Confirm, Password, PasswordDisplayMode};
use tracing::info;
use weatherstack_core::{
    Config, DATE_FORMAT, GetHistoricalWeatherConfig, Hourly, Interval, Units, WeatherstackClient,
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherstack", version, about = "Historical weather from weatherstack")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the weatherstack access key.
    Configure,

    /// Show past weather for a location.
    Historical {
        /// City name, "lat,lon", IP address, ...
        query: String,

        /// First day, YYYY-MM-DD.
        #[arg(long, value_parser = parse_date)]
        start: NaiveDate,

        /// Last day (inclusive), YYYY-MM-DD.
        #[arg(long, value_parser = parse_date)]
        end: Option<NaiveDate>,

        /// Include hourly data: on or off.
        #[arg(long, value_parser = parse_hourly)]
        hourly: Option<Hourly>,

        /// Hours between hourly slots: 1, 3, 6, 12 or 24.
        #[arg(long, value_parser = parse_interval)]
        interval: Option<Interval>,

        /// m (metric), s (scientific) or f (fahrenheit).
        #[arg(long, value_parser = parse_units)]
        units: Option<Units>,

        /// ISO 639-1 language code.
        #[arg(long)]
        language: Option<String>,

        /// Print the decoded response as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn parse_hourly(s: &str) -> Result<Hourly, String> {
    Hourly::try_from(s).map_err(|e| e.to_string())
}

fn parse_interval(s: &str) -> Result<Interval, String> {
    Interval::try_from(s).map_err(|e| e.to_string())
}

fn parse_units(s: &str) -> Result<Units, String> {
    Units::try_from(s).map_err(|e| e.to_string())
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Historical { query, start, end, hourly, interval, units, language, json } => {
                let config = Config::load()?;

                let mut request = GetHistoricalWeatherConfig::new(query, start);
                request.end_date = end;
                request.hourly = hourly;
                request.interval = interval;
                request.units = units.or(config.units);
                request.language = language.or_else(|| config.language.clone());

                let client = WeatherstackClient::from_config(&config)?;
                let response = client
                    .get_historical_weather(&request)
                    .await
                    .context("Failed to fetch historical weather")?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&response)?);
                } else {
                    let mut report = String::new();
                    output::render(&mut report, &response)?;
                    print!("{report}");
                }

                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let access_key = Password::new("weatherstack access key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read access key")?;

    let https = Confirm::new("Use HTTPS? (paid plans only)")
        .with_default(config.https)
        .prompt()
        .context("Failed to read HTTPS choice")?;

    config.set_access_key(access_key);
    config.https = https;
    config.access_key()?;
    config.save()?;

    let path = Config::config_file_path()?;
    info!(path = %path.display(), "configuration saved");
    println!("Saved configuration to {}", path.display());

    Ok(())
}
