//! Current-conditions lookup against OpenWeatherMap

use std::time::Instant;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::config::WeatherConfig;
use crate::error::FetchError;
use crate::http::ensure_success;

pub const WEATHER_FALLBACK: &str = "N/A";

pub struct WeatherClient {
    client: Client,
    config: WeatherConfig,
}

impl WeatherClient {
    pub fn new(client: Client, config: WeatherConfig) -> Self {
        Self { client, config }
    }

    /// Current weather as `"<temp>°C, <description>"`, or `"N/A"` on any failure
    #[instrument(skip(self))]
    pub async fn summary(&self, destination: &str) -> String {
        let start_time = Instant::now();
        match self.fetch(destination).await {
            Ok(current) => {
                let summary = current.format_summary();
                info!(
                    "Weather for {} in {:.3}s: {}",
                    destination,
                    start_time.elapsed().as_secs_f64(),
                    summary
                );
                summary
            }
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "Weather lookup failed, using fallback");
                WEATHER_FALLBACK.to_string()
            }
        }
    }

    async fn fetch(&self, destination: &str) -> Result<CurrentWeather, FetchError> {
        let url = format!("{}/weather", self.config.base_url);
        debug!("Requesting current weather from {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", destination),
                ("appid", self.config.api_key.as_deref().unwrap_or_default()),
                ("units", self.config.units.as_str()),
            ])
            .send()
            .await?;

        let body: openweather::CurrentResponse = ensure_success(response)?.json().await?;
        CurrentWeather::try_from(body)
    }
}

/// Temperature and description extracted from a provider response
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeather {
    /// Temperature in Celsius
    pub temperature: f64,
    pub description: String,
}

impl CurrentWeather {
    #[must_use]
    pub fn format_summary(&self) -> String {
        format!("{:.1}°C, {}", self.temperature, self.description)
    }
}

impl TryFrom<openweather::CurrentResponse> for CurrentWeather {
    type Error = FetchError;

    fn try_from(response: openweather::CurrentResponse) -> Result<Self, Self::Error> {
        let temperature = response
            .main
            .and_then(|main| main.temp)
            .ok_or_else(|| FetchError::parse("missing main.temp"))?;
        let description = response
            .weather
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|condition| condition.description)
            .ok_or_else(|| FetchError::parse("missing weather[0].description"))?;

        Ok(Self {
            temperature,
            description,
        })
    }
}

mod openweather {
    use super::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub main: Option<Main>,
        pub weather: Option<Vec<Condition>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Main {
        pub temp: Option<f64>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub description: Option<String>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{spawn_upstream, test_client, unreachable_url};
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::{Json, Router, routing::get};
    use serde_json::json;
    use std::collections::HashMap;

    fn client_for(base_url: String) -> WeatherClient {
        WeatherClient::new(
            test_client(),
            WeatherConfig {
                api_key: Some("test-key".to_string()),
                base_url,
                ..WeatherConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn test_summary_formats_temperature_and_description() {
        let router = Router::new().route(
            "/weather",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params.get("q").map(String::as_str), Some("Delhi"));
                assert_eq!(params.get("units").map(String::as_str), Some("metric"));
                assert_eq!(params.get("appid").map(String::as_str), Some("test-key"));
                Json(json!({
                    "main": {"temp": 28.4, "humidity": 40},
                    "weather": [{"main": "Haze", "description": "haze"}]
                }))
            }),
        );
        let client = client_for(spawn_upstream(router).await);

        assert_eq!(client.summary("Delhi").await, "28.4°C, haze");
    }

    #[tokio::test]
    async fn test_network_failure_falls_back() {
        let client = client_for(unreachable_url());
        assert_eq!(client.summary("Delhi").await, "N/A");
    }

    #[tokio::test]
    async fn test_error_status_falls_back() {
        let router = Router::new().route(
            "/weather",
            get(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"cod": 401, "message": "Invalid API key"})),
                )
            }),
        );
        let client = client_for(spawn_upstream(router).await);

        assert_eq!(client.summary("Delhi").await, "N/A");
    }

    #[tokio::test]
    async fn test_missing_fields_fall_back() {
        let router = Router::new().route(
            "/weather",
            get(|| async { Json(json!({"main": {}, "weather": []})) }),
        );
        let client = client_for(spawn_upstream(router).await);

        assert_eq!(client.summary("Delhi").await, "N/A");
    }

    #[test]
    fn test_conversion_requires_description() {
        let response: openweather::CurrentResponse =
            serde_json::from_value(json!({"main": {"temp": 20.0}})).unwrap();
        let err = CurrentWeather::try_from(response).unwrap_err();
        assert_eq!(err.kind(), "parse");
    }

    #[test]
    fn test_format_summary_rounds_to_one_decimal() {
        let current = CurrentWeather {
            temperature: 19.0,
            description: "light rain".to_string(),
        };
        assert_eq!(current.format_summary(), "19.0°C, light rain");
    }
}
