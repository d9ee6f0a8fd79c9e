//! Decoded body of a historical call.
//!
//! Every record defaults its fields, so anything the service leaves out decodes
//! to a zero value. Fields the service adds later are ignored.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::request::DATE_FORMAT;

const LOCALTIME_FORMAT: &str = "%Y-%m-%d %H:%M";
const ASTRO_TIME_FORMAT: &str = "%I:%M %p";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoricalResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub request: Request,
    #[serde(deserialize_with = "null_as_default")]
    pub location: Location,
    #[serde(deserialize_with = "null_as_default")]
    pub current: CurrentWeather,
    /// Keyed by `YYYY-MM-DD`.
    #[serde(deserialize_with = "null_as_default")]
    pub historical: BTreeMap<String, HistoricalWeather>,
}

impl HistoricalResponse {
    /// Days in date order. Keys that are not valid dates are skipped.
    pub fn days(&self) -> impl Iterator<Item = (NaiveDate, &HistoricalWeather)> {
        self.historical
            .iter()
            .filter_map(|(key, day)| Some((NaiveDate::parse_from_str(key, DATE_FORMAT).ok()?, day)))
    }

    pub fn day(&self, date: NaiveDate) -> Option<&HistoricalWeather> {
        self.historical.get(&date.format(DATE_FORMAT).to_string())
    }
}

/// The service's reading of the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Request {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub query: String,
    #[serde(deserialize_with = "null_as_default")]
    pub language: String,
    #[serde(deserialize_with = "null_as_default")]
    pub unit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(deserialize_with = "null_as_default")]
    pub region: String,
    #[serde(deserialize_with = "null_as_default")]
    pub lat: String,
    #[serde(deserialize_with = "null_as_default")]
    pub lon: String,
    #[serde(deserialize_with = "null_as_default")]
    pub timezone_id: String,
    /// Wall-clock time at the location, `YYYY-MM-DD HH:MM`, no zone.
    #[serde(deserialize_with = "null_as_default")]
    pub localtime: String,
    #[serde(deserialize_with = "null_as_default")]
    pub localtime_epoch: i64,
    /// Offset from UTC in decimal hours, e.g. `"1.0"` or `"-4.0"`.
    #[serde(deserialize_with = "null_as_default")]
    pub utc_offset: String,
}

impl Location {
    pub fn latitude(&self) -> Option<f64> {
        self.lat.trim().parse().ok()
    }

    pub fn longitude(&self) -> Option<f64> {
        self.lon.trim().parse().ok()
    }

    /// `localtime` as a naive date-time; no offset is applied.
    pub fn local_time(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.localtime, LOCALTIME_FORMAT).ok()
    }

    pub fn utc_offset_hours(&self) -> Option<f64> {
        self.utc_offset.trim().parse().ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentWeather {
    #[serde(deserialize_with = "null_as_default")]
    pub observation_time: String,
    #[serde(deserialize_with = "null_as_default")]
    pub temperature: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub weather_code: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub weather_icons: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub weather_descriptions: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub wind_speed: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub wind_degree: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub wind_dir: String,
    #[serde(deserialize_with = "null_as_default")]
    pub pressure: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub precip: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub humidity: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub cloudcover: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub feelslike: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub uv_index: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub visibility: i32,
    /// `"yes"` or `"no"`.
    #[serde(deserialize_with = "null_as_default")]
    pub is_day: String,
}

impl CurrentWeather {
    pub fn is_day(&self) -> Option<bool> {
        match self.is_day.as_str() {
            "yes" => Some(true),
            "no" => Some(false),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoricalWeather {
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date_epoch: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub astro: Astro,
    #[serde(deserialize_with = "null_as_default")]
    pub mintemp: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub maxtemp: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub avgtemp: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub totalsnow: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub sunhour: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub uv_index: i32,
    /// Empty when hourly data was switched off.
    #[serde(deserialize_with = "null_as_default")]
    pub hourly: Vec<HourlyWeather>,
}

impl HistoricalWeather {
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }
}

/// Sun and moon data for one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Astro {
    #[serde(deserialize_with = "null_as_default")]
    pub sunrise: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sunset: String,
    #[serde(deserialize_with = "null_as_default")]
    pub moonrise: String,
    #[serde(deserialize_with = "null_as_default")]
    pub moonset: String,
    #[serde(deserialize_with = "null_as_default")]
    pub moon_phase: String,
    #[serde(deserialize_with = "null_as_default")]
    pub moon_illumination: i32,
}

impl Astro {
    pub fn sunrise_time(&self) -> Option<NaiveTime> {
        parse_clock_time(&self.sunrise)
    }

    pub fn sunset_time(&self) -> Option<NaiveTime> {
        parse_clock_time(&self.sunset)
    }

    /// `None` on days without a moonrise.
    pub fn moonrise_time(&self) -> Option<NaiveTime> {
        parse_clock_time(&self.moonrise)
    }

    pub fn moonset_time(&self) -> Option<NaiveTime> {
        parse_clock_time(&self.moonset)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HourlyWeather {
    /// Hour of day as HHMM with leading zeros stripped: `"0"`, `"300"`, `"2100"`.
    #[serde(deserialize_with = "null_as_default")]
    pub time: String,
    #[serde(deserialize_with = "null_as_default")]
    pub temperature: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub wind_speed: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub wind_degree: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub wind_dir: String,
    #[serde(deserialize_with = "null_as_default")]
    pub weather_code: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub weather_icons: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub weather_descriptions: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub precip: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub humidity: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub visibility: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub pressure: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub cloudcover: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub heatindex: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub dewpoint: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub windchill: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub windgust: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub feelslike: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub chanceofrain: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub chanceofremdry: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub chanceofwindy: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub chanceofovercast: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub chanceofsunshine: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub chanceoffrost: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub chanceofhightemp: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub chanceoffog: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub chanceofsnow: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub chanceofthunder: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub uv_index: i32,
}

impl HourlyWeather {
    pub fn time_of_day(&self) -> Option<NaiveTime> {
        parse_hhmm(&self.time)
    }

    /// Icon URL paired with its description, in service order.
    pub fn conditions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.weather_icons
            .iter()
            .zip(&self.weather_descriptions)
            .map(|(icon, description)| (icon.as_str(), description.as_str()))
    }
}

/// The service sends `null` for some values it has no data for.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn parse_clock_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), ASTRO_TIME_FORMAT).ok()
}

fn parse_hhmm(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    if s.is_empty() || s.len() > 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let value: u32 = s.parse().ok()?;
    NaiveTime::from_hms_opt(value / 100, value % 100, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture() -> serde_json::Value {
        json!({
            "request": {"type": "City", "query": "Tokyo, Japan", "language": "en", "unit": "m"},
            "location": {
                "name": "Tokyo",
                "country": "Japan",
                "region": "Tokyo",
                "lat": "35.690",
                "lon": "139.692",
                "timezone_id": "Asia/Tokyo",
                "localtime": "2023-11-14 07:13",
                "localtime_epoch": 1700000000,
                "utc_offset": "9.0"
            },
            "current": {
                "observation_time": "10:13 PM",
                "temperature": 11,
                "weather_code": 113,
                "weather_icons": ["https://cdn.example.com/wsymbol_0008_clear_sky_night.png"],
                "weather_descriptions": ["Clear"],
                "wind_speed": 7,
                "wind_degree": 340,
                "wind_dir": "NNW",
                "pressure": 1021,
                "precip": 0,
                "humidity": 58,
                "cloudcover": 0,
                "feelslike": 10,
                "uv_index": 1,
                "visibility": 10,
                "is_day": "no",
                "air_quality": {"co": "210.3"}
            },
            "historical": {
                "2024-02-15": {
                    "date": "2024-02-15",
                    "date_epoch": 1707955200,
                    "astro": {
                        "sunrise": "06:26 AM",
                        "sunset": "05:27 PM",
                        "moonrise": "No moonrise",
                        "moonset": "11:02 PM",
                        "moon_phase": "Waxing Crescent",
                        "moon_illumination": 28
                    },
                    "mintemp": 6,
                    "maxtemp": 17,
                    "avgtemp": 11,
                    "totalsnow": 0,
                    "sunhour": 10.5,
                    "uv_index": 4,
                    "hourly": [
                        {
                            "time": "0",
                            "temperature": 8,
                            "weather_icons": ["https://cdn.example.com/a.png", "https://cdn.example.com/b.png"],
                            "weather_descriptions": ["Clear", "Mist"],
                            "precip": 0.1,
                            "chanceofrain": 12,
                            "chanceofthunder": 0
                        },
                        {"time": "300", "temperature": 7}
                    ]
                }
            }
        })
    }

    #[test]
    fn decodes_fixture() {
        let response: HistoricalResponse = serde_json::from_value(fixture()).unwrap();

        assert_eq!(response.request.kind, "City");
        assert_eq!(response.location.localtime_epoch, 1_700_000_000);
        assert_eq!(response.location.utc_offset_hours(), Some(9.0));
        assert_eq!(response.current.is_day(), Some(false));

        let day = &response.historical["2024-02-15"];
        assert_eq!(day.date_epoch, 1_707_955_200);
        assert_eq!(day.astro.moon_illumination, 28);
        assert_eq!(day.hourly.len(), 2);

        let first = &day.hourly[0];
        assert_eq!(first.time, "0");
        assert_eq!(first.chanceofrain, 12);
        assert_eq!(
            first.weather_icons,
            vec!["https://cdn.example.com/a.png", "https://cdn.example.com/b.png"]
        );
        assert_eq!(first.weather_descriptions, vec!["Clear", "Mist"]);
        assert_eq!(
            first.conditions().collect::<Vec<_>>(),
            vec![("https://cdn.example.com/a.png", "Clear"), ("https://cdn.example.com/b.png", "Mist")]
        );
    }

    #[test]
    fn missing_fields_decode_to_zero_values() {
        let response: HistoricalResponse =
            serde_json::from_value(json!({"historical": {"2024-01-01": {"hourly": [{}]}}})).unwrap();

        assert_eq!(response.location, Location::default());
        let day = &response.historical["2024-01-01"];
        assert_eq!(day.mintemp, 0);
        assert_eq!(day.hourly[0], HourlyWeather::default());
    }

    #[test]
    fn null_values_decode_to_zero_values() {
        let response: HistoricalResponse = serde_json::from_value(json!({
            "request": null,
            "location": {"name": "Berlin", "region": null, "localtime_epoch": null},
            "current": {"weather_icons": null, "precip": null, "is_day": null},
            "historical": {
                "2024-01-01": {"date": "2024-01-01", "astro": null, "hourly": null},
                "2024-01-02": {"date": "2024-01-02", "hourly": [{"time": "0", "wind_dir": null}]}
            }
        }))
        .unwrap();

        assert_eq!(response.request, Request::default());
        assert_eq!(response.location.name, "Berlin");
        assert_eq!(response.location.region, "");
        assert_eq!(response.location.localtime_epoch, 0);
        assert!(response.current.weather_icons.is_empty());
        assert_eq!(response.current.is_day(), None);

        let first = &response.historical["2024-01-01"];
        assert_eq!(first.astro, Astro::default());
        assert!(first.hourly.is_empty());
        assert_eq!(response.historical["2024-01-02"].hourly[0].wind_dir, "");
    }

    #[test]
    fn null_historical_map_is_empty() {
        let response: HistoricalResponse =
            serde_json::from_value(json!({"historical": null})).unwrap();

        assert!(response.historical.is_empty());
    }

    #[test]
    fn reencoding_preserves_fields() {
        let response: HistoricalResponse = serde_json::from_value(fixture()).unwrap();
        let again: HistoricalResponse =
            serde_json::from_value(serde_json::to_value(&response).unwrap()).unwrap();

        assert_eq!(response, again);
    }

    #[test]
    fn days_are_in_date_order() {
        let response: HistoricalResponse = serde_json::from_value(json!({
            "historical": {
                "2024-01-03": {"date": "2024-01-03"},
                "2024-01-01": {"date": "2024-01-01"},
                "2024-01-02": {"date": "2024-01-02"}
            }
        }))
        .unwrap();

        let dates: Vec<String> = response.days().map(|(d, _)| d.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);

        let jan2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(response.day(jan2).and_then(HistoricalWeather::date), Some(jan2));
    }

    #[test]
    fn location_helpers() {
        let response: HistoricalResponse = serde_json::from_value(fixture()).unwrap();
        let location = &response.location;

        assert_eq!(location.latitude(), Some(35.69));
        assert_eq!(location.longitude(), Some(139.692));
        assert_eq!(
            location.local_time().unwrap().format("%H:%M").to_string(),
            "07:13"
        );
    }

    #[test]
    fn astro_sentinels_are_not_times() {
        let response: HistoricalResponse = serde_json::from_value(fixture()).unwrap();
        let astro = &response.historical["2024-02-15"].astro;

        assert_eq!(astro.moonrise, "No moonrise");
        assert_eq!(astro.moonrise_time(), None);
        assert_eq!(astro.sunrise_time(), NaiveTime::from_hms_opt(6, 26, 0));
        assert_eq!(astro.moonset_time(), NaiveTime::from_hms_opt(23, 2, 0));
    }

    #[test]
    fn hourly_time_forms() {
        let slot = |t: &str| HourlyWeather { time: t.to_string(), ..Default::default() };

        assert_eq!(slot("0").time_of_day(), NaiveTime::from_hms_opt(0, 0, 0));
        assert_eq!(slot("300").time_of_day(), NaiveTime::from_hms_opt(3, 0, 0));
        assert_eq!(slot("0600").time_of_day(), NaiveTime::from_hms_opt(6, 0, 0));
        assert_eq!(slot("2130").time_of_day(), NaiveTime::from_hms_opt(21, 30, 0));
        assert_eq!(slot("2400").time_of_day(), None);
        assert_eq!(slot("noon").time_of_day(), None);
        assert_eq!(slot("").time_of_day(), None);
    }

    #[test]
    fn unknown_is_day_value() {
        let current = CurrentWeather { is_day: "maybe".into(), ..Default::default() };
        assert_eq!(current.is_day(), None);
    }
}
