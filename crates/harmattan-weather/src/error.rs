//! Provider-specific error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Provider error: {0}")]
    Api(String),

    #[error("Malformed provider response: {0}")]
    Malformed(String),
}

impl WeatherError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Network error. Check your connection.".to_string(),
            Self::Api(msg) => format!("Weather service error: {}", msg),
            Self::Malformed(_) => "Unexpected response from the weather service".to_string(),
        }
    }
}
