//! WeatherAPI.com HTTP client.

use std::time::Duration;

use serde::Deserialize;
use tracing::instrument;

use crate::error::WeatherError;
use crate::types::{ApiForecastResponse, ApiSearchLocation, ForecastPayload, Location};

const WEATHER_API_BASE: &str = "https://api.weatherapi.com/v1";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Error envelope the provider returns on non-success responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl WeatherClient {
    /// Create a client against the production WeatherAPI.com endpoint.
    ///
    /// # Errors
    /// Returns [`WeatherError::Network`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(api_key: &str) -> Result<Self, WeatherError> {
        Self::with_base_url(api_key, WEATHER_API_BASE)
    }

    /// Create a client against an alternate base URL (config override or a
    /// mock server in tests).
    ///
    /// # Errors
    /// Returns [`WeatherError::Network`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Autocomplete search: partial city name to candidate locations.
    ///
    /// A valid response with zero matches is `Ok(vec![])`, not an error.
    /// Single request, no retry; callers are expected to suppress queries of
    /// two characters or fewer upstream.
    ///
    /// # Errors
    /// [`WeatherError::Network`] if the request fails, [`WeatherError::Api`]
    /// on a non-success response, [`WeatherError::Malformed`] if a candidate
    /// lacks a name.
    #[instrument(skip(self), level = "info")]
    pub async fn search_locations(&self, query: &str) -> Result<Vec<Location>, WeatherError> {
        let url = format!(
            "{}/search.json?key={}&q={}",
            self.base_url,
            self.api_key,
            urlencoding::encode(query),
        );

        let response = self.client.get(&url).send().await?;
        let candidates: Vec<ApiSearchLocation> = self.handle_response(response).await?;

        let locations = candidates
            .into_iter()
            .map(Location::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("search for {:?} returned {} candidates", query, locations.len());
        Ok(locations)
    }

    /// Fetch current conditions plus a `days`-long daily forecast for a city.
    ///
    /// The day order of the provider response is preserved; `days[0]` is
    /// today. No retry and no default substitution on failure.
    ///
    /// # Errors
    /// [`WeatherError::Network`] if the request fails, [`WeatherError::Api`]
    /// on a non-success response (including unknown cities),
    /// [`WeatherError::Malformed`] if required fields are absent.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_forecast(
        &self,
        city: &str,
        days: u8,
    ) -> Result<ForecastPayload, WeatherError> {
        let url = format!(
            "{}/forecast.json?key={}&q={}&days={}",
            self.base_url,
            self.api_key,
            urlencoding::encode(city),
            days,
        );

        let response = self.client.get(&url).send().await?;
        let body: ApiForecastResponse = self.handle_response(response).await?;

        body.try_into()
    }

    /// Helper to handle provider responses and errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, WeatherError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| WeatherError::Malformed(format!("JSON parse error: {}", e)))
        } else {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .ok()
                .and_then(|b| b.error)
                .and_then(|e| e.message)
                .unwrap_or(text);
            Err(WeatherError::Api(format!("{}: {}", status.as_u16(), message)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn forecast_body() -> serde_json::Value {
        serde_json::json!({
            "location": {"name": "Tema", "region": "Greater Accra", "country": "Ghana"},
            "current": {
                "temp_c": 30.4,
                "condition": {"text": "Sunny"},
                "wind_kph": 11.2,
                "humidity": 62
            },
            "forecast": {
                "forecastday": [
                    {
                        "date": "2024-03-04",
                        "day": {
                            "avgtemp_c": 29.0, "maxtemp_c": 32.0, "mintemp_c": 26.0,
                            "condition": {"text": "Sunny"}
                        },
                        "astro": {"sunrise": "06:11 AM", "sunset": "06:19 PM"}
                    },
                    {
                        "date": "2024-03-05",
                        "day": {
                            "avgtemp_c": 28.1, "maxtemp_c": 31.2, "mintemp_c": 25.7,
                            "condition": {"text": "Partly cloudy"}
                        },
                        "astro": {"sunrise": "06:11 AM", "sunset": "06:19 PM"}
                    },
                    {
                        "date": "2024-03-06",
                        "day": {
                            "avgtemp_c": 27.9, "maxtemp_c": 30.8, "mintemp_c": 25.3,
                            "condition": {"text": "Moderate rain"}
                        },
                        "astro": {"sunrise": "06:10 AM", "sunset": "06:19 PM"}
                    }
                ]
            }
        })
    }

    #[tokio::test]
    async fn test_search_locations() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("key", "test_key"))
            .and(query_param("q", "Acc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"name": "Accra", "region": "Greater Accra", "country": "Ghana"},
                {"name": "Acceglio", "region": "Piedmont", "country": "Italy"}
            ])))
            .mount(&mock_server)
            .await;

        let client = WeatherClient::with_base_url("test_key", &mock_server.uri()).unwrap();
        let locations = client.search_locations("Acc").await.unwrap();

        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].name, "Accra");
        assert_eq!(locations[1].country, "Italy");
    }

    #[tokio::test]
    async fn test_search_empty_result_is_ok() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&mock_server)
            .await;

        let client = WeatherClient::with_base_url("test_key", &mock_server.uri()).unwrap();
        let locations = client.search_locations("Xyzzy").await.unwrap();
        assert!(locations.is_empty());
    }

    #[tokio::test]
    async fn test_search_encodes_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("q", "San José"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"name": "San José", "region": "San José", "country": "Costa Rica"}
            ])))
            .mount(&mock_server)
            .await;

        let client = WeatherClient::with_base_url("test_key", &mock_server.uri()).unwrap();
        let locations = client.search_locations("San José").await.unwrap();
        assert_eq!(locations[0].country, "Costa Rica");
    }

    #[tokio::test]
    async fn test_fetch_forecast_preserves_day_order() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .and(query_param("q", "Tema"))
            .and(query_param("days", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&mock_server)
            .await;

        let client = WeatherClient::with_base_url("test_key", &mock_server.uri()).unwrap();
        let payload = client.fetch_forecast("Tema", 7).await.unwrap();

        assert_eq!(payload.location.name, "Tema");
        assert_eq!(payload.current.condition, "Sunny");
        let dates: Vec<String> = payload.days.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-03-04", "2024-03-05", "2024-03-06"]);
    }

    #[tokio::test]
    async fn test_fetch_forecast_unknown_city() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"code": 1006, "message": "No matching location found."}
            })))
            .mount(&mock_server)
            .await;

        let client = WeatherClient::with_base_url("test_key", &mock_server.uri()).unwrap();
        let err = client.fetch_forecast("Nowhereville", 7).await.unwrap_err();

        match err {
            WeatherError::Api(msg) => {
                assert!(msg.contains("400"));
                assert!(msg.contains("No matching location found."));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_forecast_missing_fields() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "location": {"name": "Tema"}
            })))
            .mount(&mock_server)
            .await;

        let client = WeatherClient::with_base_url("test_key", &mock_server.uri()).unwrap();
        let err = client.fetch_forecast("Tema", 7).await.unwrap_err();
        assert!(matches!(err, WeatherError::Malformed(_)));
    }
}
