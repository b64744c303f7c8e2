//! Configuration for market data providers

use std::time::Duration;

/// Configuration for the market data tools
#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Alpha Vantage API key. Tools that need it report a configuration
    /// failure per call when it is absent; the tool list stays stable.
    pub alpha_vantage_api_key: Option<String>,

    /// Request timeout for provider HTTP calls
    pub request_timeout: Duration,

    /// Alpha Vantage requests per minute (free tier: 5)
    pub alpha_vantage_rate_limit: u32,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            alpha_vantage_api_key: None,
            request_timeout: Duration::from_secs(30),
            alpha_vantage_rate_limit: 5,
        }
    }
}

impl MarketConfig {
    pub fn builder() -> MarketConfigBuilder {
        MarketConfigBuilder::default()
    }

    /// Load configuration from the environment
    ///
    /// Reads `ALPHA_VANTAGE_API_KEY` when set; everything else keeps its
    /// default.
    pub fn from_env() -> Self {
        Self {
            alpha_vantage_api_key: std::env::var("ALPHA_VANTAGE_API_KEY").ok(),
            ..Self::default()
        }
    }
}

/// Builder for MarketConfig
#[derive(Debug, Default)]
pub struct MarketConfigBuilder {
    alpha_vantage_api_key: Option<String>,
    request_timeout: Option<Duration>,
    alpha_vantage_rate_limit: Option<u32>,
}

impl MarketConfigBuilder {
    pub fn alpha_vantage_api_key(mut self, key: impl Into<String>) -> Self {
        self.alpha_vantage_api_key = Some(key.into());
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn alpha_vantage_rate_limit(mut self, per_minute: u32) -> Self {
        self.alpha_vantage_rate_limit = Some(per_minute);
        self
    }

    pub fn build(self) -> MarketConfig {
        let defaults = MarketConfig::default();
        MarketConfig {
            alpha_vantage_api_key: self.alpha_vantage_api_key,
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            alpha_vantage_rate_limit: self
                .alpha_vantage_rate_limit
                .unwrap_or(defaults.alpha_vantage_rate_limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MarketConfig::default();
        assert!(config.alpha_vantage_api_key.is_none());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.alpha_vantage_rate_limit, 5);
    }

    #[test]
    fn test_builder() {
        let config = MarketConfig::builder()
            .alpha_vantage_api_key("demo")
            .request_timeout(Duration::from_secs(10))
            .alpha_vantage_rate_limit(75)
            .build();

        assert_eq!(config.alpha_vantage_api_key.as_deref(), Some("demo"));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.alpha_vantage_rate_limit, 75);
    }
}
