//! Domain types and raw WeatherAPI.com payload shapes.
//!
//! The `Api*` structs mirror the provider JSON with every nested field
//! optional; `TryFrom` conversions validate presence and reject incomplete
//! payloads as [`WeatherError::Malformed`] instead of rendering absence.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::WeatherError;

/// A candidate location returned by autocomplete search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub region: String,
    pub country: String,
}

impl Location {
    /// Label shown in the candidate list, e.g. "Accra, Ghana".
    pub fn display_label(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

/// Current conditions at the forecast location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub condition: String,
    pub wind_kph: f64,
    pub humidity_pct: u8,
}

/// One entry in the daily forecast strip. Index 0 is today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub avg_temp_c: f64,
    pub max_temp_c: f64,
    pub min_temp_c: f64,
    pub condition: String,
    /// Provider-formatted local time, e.g. "06:15 AM".
    pub sunrise: String,
    pub sunset: String,
}

/// Complete forecast bundle: resolved location, current conditions, and the
/// chronologically ordered daily forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPayload {
    pub location: Location,
    pub current: CurrentConditions,
    pub days: Vec<ForecastDay>,
}

impl ForecastPayload {
    /// Today's forecast entry, if the provider returned any days.
    pub fn today(&self) -> Option<&ForecastDay> {
        self.days.first()
    }
}

fn missing(field: &str) -> WeatherError {
    WeatherError::Malformed(format!("missing field `{}`", field))
}

// --- Raw provider shapes ---

#[derive(Debug, Deserialize)]
pub(crate) struct ApiSearchLocation {
    name: Option<String>,
    region: Option<String>,
    country: Option<String>,
}

impl TryFrom<ApiSearchLocation> for Location {
    type Error = WeatherError;

    fn try_from(api: ApiSearchLocation) -> Result<Self, WeatherError> {
        Ok(Location {
            name: api.name.ok_or_else(|| missing("name"))?,
            region: api.region.unwrap_or_default(),
            country: api.country.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiForecastResponse {
    location: Option<ApiSearchLocation>,
    current: Option<ApiCurrent>,
    forecast: Option<ApiForecast>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCurrent {
    temp_c: Option<f64>,
    condition: Option<ApiCondition>,
    wind_kph: Option<f64>,
    humidity: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCondition {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiForecast {
    forecastday: Option<Vec<ApiForecastDay>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiForecastDay {
    date: Option<NaiveDate>,
    day: Option<ApiDay>,
    astro: Option<ApiAstro>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiDay {
    avgtemp_c: Option<f64>,
    maxtemp_c: Option<f64>,
    mintemp_c: Option<f64>,
    condition: Option<ApiCondition>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiAstro {
    sunrise: Option<String>,
    sunset: Option<String>,
}

impl TryFrom<ApiForecastDay> for ForecastDay {
    type Error = WeatherError;

    fn try_from(api: ApiForecastDay) -> Result<Self, WeatherError> {
        let day = api.day.ok_or_else(|| missing("forecastday.day"))?;
        let astro = api.astro.ok_or_else(|| missing("forecastday.astro"))?;

        Ok(ForecastDay {
            date: api.date.ok_or_else(|| missing("forecastday.date"))?,
            avg_temp_c: day.avgtemp_c.ok_or_else(|| missing("day.avgtemp_c"))?,
            max_temp_c: day.maxtemp_c.ok_or_else(|| missing("day.maxtemp_c"))?,
            min_temp_c: day.mintemp_c.ok_or_else(|| missing("day.mintemp_c"))?,
            condition: day
                .condition
                .and_then(|c| c.text)
                .ok_or_else(|| missing("day.condition.text"))?,
            sunrise: astro.sunrise.ok_or_else(|| missing("astro.sunrise"))?,
            sunset: astro.sunset.ok_or_else(|| missing("astro.sunset"))?,
        })
    }
}

impl TryFrom<ApiForecastResponse> for ForecastPayload {
    type Error = WeatherError;

    fn try_from(api: ApiForecastResponse) -> Result<Self, WeatherError> {
        let current = api.current.ok_or_else(|| missing("current"))?;

        let days = api
            .forecast
            .ok_or_else(|| missing("forecast"))?
            .forecastday
            .ok_or_else(|| missing("forecast.forecastday"))?
            .into_iter()
            .map(ForecastDay::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ForecastPayload {
            location: api
                .location
                .ok_or_else(|| missing("location"))?
                .try_into()?,
            current: CurrentConditions {
                temp_c: current.temp_c.ok_or_else(|| missing("current.temp_c"))?,
                condition: current
                    .condition
                    .and_then(|c| c.text)
                    .ok_or_else(|| missing("current.condition.text"))?,
                wind_kph: current
                    .wind_kph
                    .ok_or_else(|| missing("current.wind_kph"))?,
                humidity_pct: current
                    .humidity
                    .ok_or_else(|| missing("current.humidity"))?,
            },
            days,
        })
    }
}
