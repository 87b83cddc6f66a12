//! Configuration for the rates collector

use core_config::{ConfigError, Environment, FromEnv};
use database::postgres::PostgresConfig;
use domain_currency::ExchangeRateApiConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub database: PostgresConfig,
    pub exchange: ExchangeRateApiConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Requires `DATABASE_URL`; the exchange provider settings have
    /// defaults (free-tier endpoint, 5s timeout).
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            environment: Environment::from_env(),
            database: PostgresConfig::from_env()?,
            exchange: ExchangeRateApiConfig::from_env(),
        })
    }
}
