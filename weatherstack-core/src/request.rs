use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::form_urlencoded;

use crate::error::WeatherstackError;

/// Date format used for every date parameter of the historical endpoint.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Longest inclusive range a single historical call may cover.
pub const MAX_DAYS_PER_CALL: i64 = 60;

/// Relative path of the historical endpoint.
pub const HISTORICAL_PATH: &str = "historical";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hourly {
    On,
    Off,
}

impl Hourly {
    pub fn as_param(&self) -> &'static str {
        match self {
            Hourly::On => "1",
            Hourly::Off => "0",
        }
    }
}

impl From<bool> for Hourly {
    fn from(on: bool) -> Self {
        if on { Hourly::On } else { Hourly::Off }
    }
}

impl TryFrom<&str> for Hourly {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "1" | "on" | "true" | "yes" => Ok(Hourly::On),
            "0" | "off" | "false" | "no" => Ok(Hourly::Off),
            _ => Err(anyhow::anyhow!("Unknown hourly value '{value}'. Expected on or off.")),
        }
    }
}

/// Sampling step of the hourly data within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interval {
    OneHour,
    ThreeHours,
    SixHours,
    DayNight,
    DayAverage,
}

impl Interval {
    pub fn hours(&self) -> u8 {
        match self {
            Interval::OneHour => 1,
            Interval::ThreeHours => 3,
            Interval::SixHours => 6,
            Interval::DayNight => 12,
            Interval::DayAverage => 24,
        }
    }

    /// Number of hourly slots the service returns per day.
    pub fn slots_per_day(&self) -> usize {
        24 / usize::from(self.hours())
    }

    pub const fn all() -> &'static [Interval] {
        &[
            Interval::OneHour,
            Interval::ThreeHours,
            Interval::SixHours,
            Interval::DayNight,
            Interval::DayAverage,
        ]
    }
}

impl TryFrom<&str> for Interval {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let hours = value.trim_end_matches(['h', 'H']);
        Interval::all()
            .iter()
            .copied()
            .find(|i| i.hours().to_string() == hours)
            .ok_or_else(|| {
                anyhow::anyhow!("Unknown interval '{value}'. Supported intervals: 1, 3, 6, 12, 24.")
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Units {
    #[serde(rename = "m")]
    Metric,
    #[serde(rename = "s")]
    Scientific,
    #[serde(rename = "f")]
    Fahrenheit,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "m",
            Units::Scientific => "s",
            Units::Fahrenheit => "f",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Scientific, Units::Fahrenheit]
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "m" | "metric" => Ok(Units::Metric),
            "s" | "scientific" => Ok(Units::Scientific),
            "f" | "fahrenheit" => Ok(Units::Fahrenheit),
            _ => Err(anyhow::anyhow!("Unknown units '{value}'. Supported units: m, s, f.")),
        }
    }
}

/// Which date parameters a validated request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSpan {
    Single(NaiveDate),
    Range { start: NaiveDate, end: NaiveDate },
}

impl DateSpan {
    /// Inclusive number of days covered.
    pub fn days(&self) -> i64 {
        match self {
            DateSpan::Single(_) => 1,
            DateSpan::Range { start, end } => (*end - *start).num_days() + 1,
        }
    }
}

/// Parameters of one call to the historical endpoint.
///
/// `None` on an optional field leaves the parameter out of the query string
/// so the service default applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetHistoricalWeatherConfig {
    pub query: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub hourly: Option<Hourly>,
    pub interval: Option<Interval>,
    pub units: Option<Units>,
    pub language: Option<String>,
}

impl GetHistoricalWeatherConfig {
    pub fn new(query: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            query: query.into(),
            start_date,
            end_date: None,
            hourly: None,
            interval: None,
            units: None,
            language: None,
        }
    }

    pub fn end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn hourly(mut self, hourly: Hourly) -> Self {
        self.hourly = Some(hourly);
        self
    }

    pub fn interval(mut self, interval: Interval) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn units(mut self, units: Units) -> Self {
        self.units = Some(units);
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Check the date range and classify it.
    pub fn date_span(&self) -> Result<DateSpan, WeatherstackError> {
        let Some(end) = self.end_date else {
            return Ok(DateSpan::Single(self.start_date));
        };

        if self.start_date > end {
            return Err(WeatherstackError::InvalidRange);
        }

        if (end - self.start_date).num_days() > MAX_DAYS_PER_CALL - 1 {
            return Err(WeatherstackError::RangeTooWide { max_days: MAX_DAYS_PER_CALL });
        }

        Ok(DateSpan::Range { start: self.start_date, end })
    }

    /// Validated `key=value` pairs, sorted by key.
    pub fn query_pairs(&self) -> Result<Vec<(&'static str, String)>, WeatherstackError> {
        let mut pairs = Vec::with_capacity(7);

        match self.date_span()? {
            DateSpan::Single(date) => {
                pairs.push(("historical_date", date.format(DATE_FORMAT).to_string()));
            }
            DateSpan::Range { start, end } => {
                pairs.push(("historical_date_start", start.format(DATE_FORMAT).to_string()));
                pairs.push(("historical_date_end", end.format(DATE_FORMAT).to_string()));
            }
        }

        pairs.push(("query", self.query.clone()));

        if let Some(hourly) = self.hourly {
            pairs.push(("hourly", hourly.as_param().to_string()));
        }
        if let Some(interval) = self.interval {
            pairs.push(("interval", interval.hours().to_string()));
        }
        if let Some(units) = self.units {
            pairs.push(("units", units.as_str().to_string()));
        }
        if let Some(language) = &self.language {
            pairs.push(("language", language.clone()));
        }

        pairs.sort_by_key(|(key, _)| *key);
        Ok(pairs)
    }

    /// Relative request path, e.g. `historical?historical_date=2024-06-01&query=Amsterdam`.
    pub fn path(&self) -> Result<String, WeatherstackError> {
        let pairs = self.query_pairs()?;
        let query = form_urlencoded::Serializer::new(String::new()).extend_pairs(pairs).finish();

        Ok(format!("{HISTORICAL_PATH}?{query}"))
    }
}
