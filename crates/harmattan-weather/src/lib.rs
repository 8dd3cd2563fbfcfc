//! WeatherAPI.com client for Harmattan
//!
//! Provides city autocomplete (location search) and multi-day forecast
//! fetching. Raw provider payloads are validated into domain types; callers
//! never see partially-populated forecasts.

pub mod client;
pub mod error;
pub mod types;

pub use client::WeatherClient;
pub use error::WeatherError;
pub use types::{CurrentConditions, ForecastDay, ForecastPayload, Location};
