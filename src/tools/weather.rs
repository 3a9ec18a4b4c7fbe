//! Built-in weather lookup tool.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use super::{Tool, ToolError};
use crate::config::BridgeConfig;

/// Fetches current weather for a coordinate pair from the configured
/// weather API.
///
/// Failures at any stage (bad arguments, connect, timeout, non-success
/// status, bad body) are encoded into the result payload rather than
/// surfaced as errors, so a flaky weather service degrades to an error
/// message the model can speak about.
#[derive(Debug)]
pub struct WeatherTool {
    client: Client,
    base_url: String,
}

/// Arguments sent by the model. Both coordinates are required.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WeatherArgs {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Debug, Error)]
enum WeatherFetchError {
    #[error("invalid arguments: {0}")]
    Arguments(#[from] serde_json::Error),

    #[error("latitude and longitude are required")]
    MissingCoordinates,

    #[error("{0}")]
    Http(#[from] reqwest::Error),
}

impl WeatherTool {
    pub fn new(config: &BridgeConfig) -> Self {
        // Client construction only fails on TLS backend misconfiguration;
        // fall back to the default client rather than failing startup.
        let client = Client::builder()
            .connect_timeout(config.http_connect_timeout)
            .timeout(config.http_request_timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: config.weather_api_url.clone(),
        }
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &'static str {
        "getWeatherTool"
    }

    async fn invoke(&self, arguments: &str) -> Result<String, ToolError> {
        let payload = match self.fetch(arguments).await {
            Ok(weather) => json!({ "weather_data": weather }),
            Err(err) => json!({
                "error": format!("Failed to fetch weather data: {}", err)
            }),
        };
        Ok(serde_json::to_string(&payload)?)
    }
}

impl WeatherTool {
    async fn fetch(&self, arguments: &str) -> Result<Value, WeatherFetchError> {
        let args: WeatherArgs = serde_json::from_str(arguments)?;
        let (Some(latitude), Some(longitude)) = (args.latitude, args.longitude) else {
            return Err(WeatherFetchError::MissingCoordinates);
        };
        debug!(latitude, longitude, "Fetching weather data");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current_weather", "true".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_args_decode() {
        let args: WeatherArgs =
            serde_json::from_str(r#"{"latitude":47.6,"longitude":-122.3}"#).unwrap();
        assert_eq!(args.latitude, Some(47.6));
        assert_eq!(args.longitude, Some(-122.3));
    }

    #[test]
    fn test_weather_args_missing_fields_are_none() {
        let args: WeatherArgs = serde_json::from_str("{}").unwrap();
        assert!(args.latitude.is_none());
        assert!(args.longitude.is_none());
    }

    #[tokio::test]
    async fn test_missing_coordinates_error_payload() {
        let tool = WeatherTool::new(&BridgeConfig::default());
        let payload = tool.invoke("{}").await.unwrap();
        let value: Value = serde_json::from_str(&payload).unwrap();
        assert!(value["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to fetch weather data:"));
    }

    #[tokio::test]
    async fn test_unparsable_arguments_error_payload() {
        let tool = WeatherTool::new(&BridgeConfig::default());
        let payload = tool.invoke("not json at all").await.unwrap();
        let value: Value = serde_json::from_str(&payload).unwrap();
        assert!(value["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to fetch weather data:"));
    }
}
