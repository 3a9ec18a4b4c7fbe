//! Configuration for the session bridge.
//!
//! Settings are resolved with the priority: environment variables > `.env`
//! values > built-in defaults. Only the tool-dispatch layer is configurable;
//! the event protocol itself is fixed.

use std::time::Duration;

use tracing::warn;

/// Default upstream endpoint for the weather tool.
pub const DEFAULT_WEATHER_API_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Default connect and request timeout for outbound tool HTTP calls.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Bridge configuration.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Base URL of the weather API queried by `getWeatherTool`.
    pub weather_api_url: String,
    /// TCP connect timeout for tool HTTP calls.
    pub http_connect_timeout: Duration,
    /// Overall request timeout for tool HTTP calls.
    pub http_request_timeout: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            weather_api_url: DEFAULT_WEATHER_API_URL.to_string(),
            http_connect_timeout: DEFAULT_HTTP_TIMEOUT,
            http_request_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

impl BridgeConfig {
    /// Load configuration from the environment.
    ///
    /// Recognized variables:
    /// - `WEATHER_API_URL` - weather endpoint override
    /// - `WEATHER_HTTP_TIMEOUT_MS` - connect and request timeout in milliseconds
    pub fn from_env() -> Self {
        // Load .env if present; real env vars still win
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(url) = std::env::var("WEATHER_API_URL") {
            if !url.is_empty() {
                config.weather_api_url = url;
            }
        }

        if let Ok(raw) = std::env::var("WEATHER_HTTP_TIMEOUT_MS") {
            match raw.parse::<u64>() {
                Ok(ms) if ms > 0 => {
                    let timeout = Duration::from_millis(ms);
                    config.http_connect_timeout = timeout;
                    config.http_request_timeout = timeout;
                }
                _ => warn!(
                    "Ignoring invalid WEATHER_HTTP_TIMEOUT_MS value: {:?}",
                    raw
                ),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();
        assert_eq!(config.weather_api_url, DEFAULT_WEATHER_API_URL);
        assert_eq!(config.http_connect_timeout, Duration::from_secs(5));
        assert_eq!(config.http_request_timeout, Duration::from_secs(5));
    }
}
