//! External exchange-rate API client.
//!
//! The provider is substitutable: anything returning
//! `{ "result": "success", "conversion_rates": { "<CODE>": <rate> } }`
//! works. The default points at exchangerate-api's free tier; an API key
//! switches to the keyed v6 endpoint.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use core_config::env_or_default;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{CurrencyError, CurrencyResult};

/// Configuration for the external exchange-rate API
#[derive(Debug, Clone)]
pub struct ExchangeRateApiConfig {
    /// Base URL of the free endpoint (the currency code is appended)
    pub base_url: String,
    /// Optional API key; switches to the keyed endpoint
    pub api_key: Option<String>,
    /// Request timeout; failures past this take the stale-cache path
    pub timeout_secs: u64,
}

impl Default for ExchangeRateApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.exchangerate-api.io/v4/latest".to_string(),
            api_key: None,
            timeout_secs: 5,
        }
    }
}

impl ExchangeRateApiConfig {
    /// Load from environment variables:
    /// - `EXCHANGE_RATE_API_URL` (optional)
    /// - `EXCHANGE_RATE_API_KEY` (optional)
    /// - `EXCHANGE_RATE_TIMEOUT_SECS` (optional, default 5)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env_or_default("EXCHANGE_RATE_API_URL", &defaults.base_url),
            api_key: std::env::var("EXCHANGE_RATE_API_KEY").ok(),
            timeout_secs: env_or_default("EXCHANGE_RATE_TIMEOUT_SECS", "5")
                .parse()
                .unwrap_or(defaults.timeout_secs),
        }
    }
}

/// Abstraction over the external rate provider
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExchangeRateApi: Send + Sync {
    /// Fetch the full conversion-rate table for a base currency.
    ///
    /// Returned rates are relative to `base`: `rates["USD"]` multiplies a
    /// `base` amount into USD.
    async fn fetch_rates(&self, base: &str) -> CurrencyResult<HashMap<String, f64>>;
}

/// Shape of the provider's JSON response
#[derive(Debug, Deserialize)]
struct RatesResponse {
    #[serde(default)]
    result: String,
    #[serde(default)]
    conversion_rates: HashMap<String, f64>,
    #[serde(rename = "error-type", default)]
    error_type: Option<String>,
}

/// HTTP client for the exchange-rate provider
#[derive(Clone)]
pub struct ExchangeRateApiClient {
    client: Client,
    config: ExchangeRateApiConfig,
}

impl ExchangeRateApiClient {
    pub fn new(config: ExchangeRateApiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self { client, config }
    }

    fn request_url(&self, base: &str) -> String {
        match &self.config.api_key {
            Some(key) => format!("{}/{}/latest/{}", self.config.base_url, key, base),
            None => format!("{}/{}", self.config.base_url, base),
        }
    }
}

#[async_trait]
impl ExchangeRateApi for ExchangeRateApiClient {
    async fn fetch_rates(&self, base: &str) -> CurrencyResult<HashMap<String, f64>> {
        let base = base.to_uppercase();
        let url = self.request_url(&base);
        debug!("Fetching exchange rates for {} from {}", base, url);

        let response = self
            .client
            .get(&url)
            .header("User-Agent", "formulary-backend")
            .send()
            .await
            .map_err(|e| CurrencyError::Api(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(CurrencyError::Api(format!(
                "rate API returned status {}",
                response.status()
            )));
        }

        let data: RatesResponse = response
            .json()
            .await
            .map_err(|e| CurrencyError::Api(format!("invalid response body: {}", e)))?;

        if data.result != "success" {
            return Err(CurrencyError::Api(format!(
                "rate API returned error: {}",
                data.error_type.unwrap_or_else(|| "unknown".to_string())
            )));
        }

        info!(
            "Fetched {} conversion rates for {}",
            data.conversion_rates.len(),
            base
        );
        Ok(data.conversion_rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_tier_url() {
        let client = ExchangeRateApiClient::new(ExchangeRateApiConfig::default());
        assert_eq!(
            client.request_url("EUR"),
            "https://api.exchangerate-api.io/v4/latest/EUR"
        );
    }

    #[test]
    fn test_keyed_url() {
        let config = ExchangeRateApiConfig {
            base_url: "https://v6.exchangerate-api.io/v6".to_string(),
            api_key: Some("secret".to_string()),
            timeout_secs: 5,
        };
        let client = ExchangeRateApiClient::new(config);
        assert_eq!(
            client.request_url("EUR"),
            "https://v6.exchangerate-api.io/v6/secret/latest/EUR"
        );
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{
            "result": "success",
            "conversion_rates": {"USD": 0.85, "GBP": 1.17}
        }"#;
        let parsed: RatesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.result, "success");
        assert_eq!(parsed.conversion_rates.len(), 2);
    }

    #[test]
    fn test_error_response_parsing() {
        let body = r#"{"result": "error", "error-type": "unsupported-code"}"#;
        let parsed: RatesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.result, "error");
        assert_eq!(parsed.error_type.as_deref(), Some("unsupported-code"));
    }
}
