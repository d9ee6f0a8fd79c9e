//! Client for the weatherstack `historical` endpoint.
//!
//! This crate defines:
//! - Typed request parameters and their validation
//! - The decoded response tree
//! - A transport abstraction with a reqwest implementation
//! - Configuration & access key handling
//!
//! It is used by `weatherstack-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod request;
pub mod transport;

pub use client::WeatherstackClient;
pub use config::Config;
pub use error::WeatherstackError;
pub use model::{
    Astro, CurrentWeather, HistoricalResponse, HistoricalWeather, HourlyWeather, Location, Request,
};
pub use request::{
    DATE_FORMAT, DateSpan, GetHistoricalWeatherConfig, Hourly, Interval, MAX_DAYS_PER_CALL, Units,
};
pub use transport::{HttpTransport, Transport};
