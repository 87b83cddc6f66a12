//! API configuration loaded from environment variables.

use core_config::server::ServerConfig;
use core_config::{app_info, AppInfo, ConfigError, Environment, FromEnv};
use database::postgres::PostgresConfig;
use domain_currency::ExchangeRateApiConfig;

#[derive(Debug, Clone)]
pub struct Config {
    /// Binary name/version for the /health endpoint
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: PostgresConfig,
    pub exchange: ExchangeRateApiConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Requires `DATABASE_URL`; everything else has defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            app: app_info!(),
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?,
            database: PostgresConfig::from_env()?,
            exchange: ExchangeRateApiConfig::from_env(),
        })
    }
}
