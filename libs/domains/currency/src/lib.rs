//! Currency Domain
//!
//! Exchange-rate cache and converter backing all cost display currency
//! conversions.
//!
//! Rates are stored USD-anchored: one row per currency code carrying the
//! multiplier that takes a local amount into USD. Cross-currency
//! conversions pivot through USD. Rows are created on first lookup miss,
//! refreshed when the 24h cache window lapses (or on explicit refresh),
//! and deactivated rather than deleted.
//!
//! The external rate API is behind the [`ExchangeRateApi`] trait so the
//! converter's degradation chain (fresh cache → fetch → stale cache → 1.0)
//! is testable without a network.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod rates_client;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{CurrencyError, CurrencyResult};
pub use models::{currency_name, currency_symbol, CurrencyRate, RateQuote, RateSource, UpsertCurrencyRate};
pub use postgres::PgCurrencyRepository;
pub use rates_client::{ExchangeRateApi, ExchangeRateApiClient, ExchangeRateApiConfig};
pub use repository::CurrencyRepository;
pub use service::{CurrencyConverter, RateProvider, RefreshSummary, RATE_CACHE_TTL_HOURS};
