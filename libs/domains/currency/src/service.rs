use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::{error, info, warn};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::error::{CurrencyError, CurrencyResult};
use crate::models::{CurrencyRate, RateQuote, RateSource, UpsertCurrencyRate};
use crate::rates_client::ExchangeRateApi;
use crate::repository::CurrencyRepository;

/// How long a cached exchange rate stays fresh
pub const RATE_CACHE_TTL_HOURS: i64 = 24;

/// Initial currencies seeded into an empty rate cache
const DEFAULT_CURRENCIES: [(&str, f64); 6] = [
    ("USD", 1.0),
    ("EUR", 0.85),
    ("GBP", 0.73),
    ("CAD", 1.35),
    ("AUD", 1.55),
    ("JPY", 150.0),
];

/// Narrow conversion contract consumed by the cost engine.
///
/// Separating this from the full converter keeps sibling domains decoupled
/// from the cache/fetch machinery and trivially mockable.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Resolve the rate multiplying a `from` amount into `to`
    async fn exchange_rate(&self, from: &str, to: &str) -> CurrencyResult<f64>;

    /// Convert an amount between currencies
    async fn convert(&self, amount: f64, from: &str, to: &str) -> CurrencyResult<f64>;
}

/// Outcome of a bulk rate refresh
#[derive(Debug, Clone, Default, Serialize, ToSchema, TS)]
#[ts(export)]
pub struct RefreshSummary {
    pub refreshed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Currency converter backed by the rate cache and an external provider.
///
/// Lookup order: identity → fresh cache → external fetch (persisted when
/// USD-anchored) → stale cache → 1.0 last resort. External failures never
/// surface to callers; database failures do.
#[derive(Clone)]
pub struct CurrencyConverter<R: CurrencyRepository, A: ExchangeRateApi> {
    repository: Arc<R>,
    api: Arc<A>,
}

impl<R: CurrencyRepository, A: ExchangeRateApi> CurrencyConverter<R, A> {
    /// Create a new converter
    pub fn new(repository: R, api: A) -> Self {
        Self {
            repository: Arc::new(repository),
            api: Arc::new(api),
        }
    }

    /// Resolve an exchange rate together with its provenance
    pub async fn quote(&self, from: &str, to: &str) -> CurrencyResult<RateQuote> {
        let from = from.to_uppercase();
        let to = to.to_uppercase();

        if from == to {
            return Ok(RateQuote {
                rate: 1.0,
                source: RateSource::Identity,
            });
        }

        if let Some(rate) = self.cached_rate(&from, &to, false).await? {
            return Ok(RateQuote {
                rate,
                source: RateSource::Cache,
            });
        }

        match self.fetch_and_store(&from, &to).await {
            Ok(Some(rate)) => Ok(RateQuote {
                rate,
                source: RateSource::Fetched,
            }),
            Ok(None) => self.stale_or_fallback(&from, &to).await,
            Err(CurrencyError::Database(e)) => Err(CurrencyError::Database(e)),
            Err(e) => {
                error!("Failed to fetch exchange rate for {} to {}: {}", from, to, e);
                self.stale_or_fallback(&from, &to).await
            }
        }
    }

    /// Convert an amount between currencies.
    ///
    /// Zero amounts short-circuit without any lookup.
    pub async fn convert_amount(&self, amount: f64, from: &str, to: &str) -> CurrencyResult<f64> {
        if amount == 0.0 {
            return Ok(0.0);
        }

        let quote = self.quote(from, to).await?;
        Ok(amount * quote.rate)
    }

    /// List all active currencies
    pub async fn supported_currencies(&self) -> CurrencyResult<Vec<CurrencyRate>> {
        self.repository.list_active().await
    }

    /// Mark a currency inactive
    pub async fn deactivate(&self, code: &str) -> CurrencyResult<bool> {
        self.repository.deactivate(code).await
    }

    /// Seed the cache with the default currency set, skipping codes that
    /// already exist
    pub async fn seed_defaults(&self) -> CurrencyResult<usize> {
        let mut seeded = 0;

        for (code, rate) in DEFAULT_CURRENCIES {
            if self.repository.get_by_code(code).await?.is_none() {
                self.repository
                    .upsert_rate(UpsertCurrencyRate {
                        code: code.to_string(),
                        rate_to_usd: rate,
                    })
                    .await?;
                seeded += 1;
            }
        }

        if seeded > 0 {
            info!("Seeded {} default currencies", seeded);
        }
        Ok(seeded)
    }

    /// Refresh the USD rate for the given currency codes from the external
    /// provider. Per-currency failures are logged and counted, never abort
    /// the run.
    pub async fn refresh(&self, codes: &[String]) -> CurrencyResult<RefreshSummary> {
        let mut summary = RefreshSummary::default();

        for code in codes {
            let code = code.to_uppercase();

            // USD is the anchor; its rate is 1.0 by definition
            if code == "USD" {
                summary.skipped += 1;
                continue;
            }

            match self.fetch_usd_rate(&code).await {
                Ok(Some(_)) => summary.refreshed += 1,
                Ok(None) => {
                    warn!("Rate table for {} carried no USD entry", code);
                    summary.failed += 1;
                }
                Err(e) => {
                    error!("Failed to refresh rate for {}: {}", code, e);
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }

    /// Refresh every active currency
    pub async fn refresh_all(&self) -> CurrencyResult<RefreshSummary> {
        let codes: Vec<String> = self
            .repository
            .list_active()
            .await?
            .into_iter()
            .map(|c| c.code)
            .collect();

        self.refresh(&codes).await
    }

    /// Cached rate lookup; pivots through USD for cross-currency pairs.
    ///
    /// The freshness window applies to the `from` row. With
    /// `ignore_expiry`, stale rows are accepted (the degradation path
    /// after an external failure).
    async fn cached_rate(
        &self,
        from: &str,
        to: &str,
        ignore_expiry: bool,
    ) -> CurrencyResult<Option<f64>> {
        let Some(row) = self.repository.get_by_code(from).await? else {
            return Ok(None);
        };

        if !ignore_expiry {
            let age = Utc::now().signed_duration_since(row.last_updated);
            if age > Duration::hours(RATE_CACHE_TTL_HOURS) {
                return Ok(None);
            }
        }

        if to == "USD" {
            return Ok(Some(row.rate_to_usd));
        }

        let Some(target) = self.repository.get_by_code(to).await? else {
            return Ok(None);
        };

        if target.rate_to_usd == 0.0 {
            return Ok(None);
        }

        // from -> USD -> to
        Ok(Some(row.rate_to_usd / target.rate_to_usd))
    }

    /// Fetch the rate table for `from` and extract the `to` rate.
    ///
    /// Only the USD-anchored direction is persisted; other pairs are served
    /// from the fetched table but not separately cached.
    async fn fetch_and_store(&self, from: &str, to: &str) -> CurrencyResult<Option<f64>> {
        let rates = self.api.fetch_rates(from).await?;

        let Some(&rate) = rates.get(to) else {
            warn!("Rate for {} not found in {} table", to, from);
            return Ok(None);
        };

        if to == "USD" {
            self.repository
                .upsert_rate(UpsertCurrencyRate {
                    code: from.to_string(),
                    rate_to_usd: rate,
                })
                .await?;
        }

        Ok(Some(rate))
    }

    /// Fetch and persist `code`'s USD rate
    async fn fetch_usd_rate(&self, code: &str) -> CurrencyResult<Option<f64>> {
        self.fetch_and_store(code, "USD").await
    }

    async fn stale_or_fallback(&self, from: &str, to: &str) -> CurrencyResult<RateQuote> {
        if let Some(rate) = self.cached_rate(from, to, true).await? {
            warn!("Using expired exchange rate for {} to {}", from, to);
            return Ok(RateQuote {
                rate,
                source: RateSource::StaleCache,
            });
        }

        // Known inaccuracy: rates here are informational, so a free
        // conversion beats a failed request. Callers can detect it via
        // the quote source.
        error!("No exchange rate available for {} to {}", from, to);
        Ok(RateQuote {
            rate: 1.0,
            source: RateSource::Fallback,
        })
    }
}

#[async_trait]
impl<R: CurrencyRepository, A: ExchangeRateApi> RateProvider for CurrencyConverter<R, A> {
    async fn exchange_rate(&self, from: &str, to: &str) -> CurrencyResult<f64> {
        Ok(self.quote(from, to).await?.rate)
    }

    async fn convert(&self, amount: f64, from: &str, to: &str) -> CurrencyResult<f64> {
        self.convert_amount(amount, from, to).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CurrencyError;
    use crate::rates_client::MockExchangeRateApi;
    use crate::repository::MockCurrencyRepository;
    use std::collections::HashMap;
    use test_utils::assertions::assert_close;
    use uuid::Uuid;

    fn rate_row(code: &str, rate: f64, age_hours: i64) -> CurrencyRate {
        let now = Utc::now();
        CurrencyRate {
            id: Uuid::now_v7(),
            code: code.to_string(),
            name: crate::models::currency_name(code),
            symbol: crate::models::currency_symbol(code),
            rate_to_usd: rate,
            is_active: true,
            last_updated: now - Duration::hours(age_hours),
            created_at: now,
        }
    }

    #[tokio::test]
    async fn test_identity_rate_makes_no_lookups() {
        let repo = MockCurrencyRepository::new();
        let mut api = MockExchangeRateApi::new();
        api.expect_fetch_rates().times(0);

        let converter = CurrencyConverter::new(repo, api);
        let quote = converter.quote("EUR", "eur").await.unwrap();

        assert_close(quote.rate, 1.0, 1e-12, "identity");
        assert_eq!(quote.source, RateSource::Identity);
    }

    #[tokio::test]
    async fn test_usd_directionality_is_multiplicative() {
        // 100 EUR at a stored rate of 0.85-to-USD must convert to 85 USD.
        let mut repo = MockCurrencyRepository::new();
        repo.expect_get_by_code()
            .returning(|code| match code {
                "EUR" => Ok(Some(rate_row("EUR", 0.85, 1))),
                _ => Ok(None),
            });
        let mut api = MockExchangeRateApi::new();
        api.expect_fetch_rates().times(0);

        let converter = CurrencyConverter::new(repo, api);
        let converted = converter.convert_amount(100.0, "EUR", "USD").await.unwrap();

        assert_close(converted, 85.0, 1e-9, "EUR->USD");
    }

    #[tokio::test]
    async fn test_cross_currency_pivots_through_usd() {
        let mut repo = MockCurrencyRepository::new();
        repo.expect_get_by_code().returning(|code| match code {
            "EUR" => Ok(Some(rate_row("EUR", 0.85, 1))),
            "GBP" => Ok(Some(rate_row("GBP", 0.73, 1))),
            _ => Ok(None),
        });
        let api = MockExchangeRateApi::new();

        let converter = CurrencyConverter::new(repo, api);
        let quote = converter.quote("EUR", "GBP").await.unwrap();

        assert_close(quote.rate, 0.85 / 0.73, 1e-9, "pivot");
        assert_eq!(quote.source, RateSource::Cache);
    }

    #[tokio::test]
    async fn test_expired_cache_triggers_fetch_and_persist() {
        let mut repo = MockCurrencyRepository::new();
        repo.expect_get_by_code()
            .returning(|_| Ok(Some(rate_row("EUR", 0.80, 30))));
        repo.expect_upsert_rate()
            .times(1)
            .withf(|input| input.code == "EUR" && (input.rate_to_usd - 0.86).abs() < 1e-9)
            .returning(|input| {
                Ok(rate_row(&input.code, input.rate_to_usd, 0))
            });

        let mut api = MockExchangeRateApi::new();
        api.expect_fetch_rates().times(1).returning(|_| {
            Ok(HashMap::from([("USD".to_string(), 0.86)]))
        });

        let converter = CurrencyConverter::new(repo, api);
        let quote = converter.quote("EUR", "USD").await.unwrap();

        assert_close(quote.rate, 0.86, 1e-9, "fetched");
        assert_eq!(quote.source, RateSource::Fetched);
    }

    #[tokio::test]
    async fn test_external_failure_falls_back_to_stale_cache() {
        let mut repo = MockCurrencyRepository::new();
        repo.expect_get_by_code()
            .returning(|_| Ok(Some(rate_row("EUR", 0.80, 30))));

        let mut api = MockExchangeRateApi::new();
        api.expect_fetch_rates()
            .returning(|_| Err(CurrencyError::Api("timeout".to_string())));

        let converter = CurrencyConverter::new(repo, api);
        let quote = converter.quote("EUR", "USD").await.unwrap();

        assert_close(quote.rate, 0.80, 1e-9, "stale rate");
        assert_eq!(quote.source, RateSource::StaleCache);
    }

    #[tokio::test]
    async fn test_no_rate_anywhere_falls_back_to_one() {
        let mut repo = MockCurrencyRepository::new();
        repo.expect_get_by_code().returning(|_| Ok(None));

        let mut api = MockExchangeRateApi::new();
        api.expect_fetch_rates()
            .returning(|_| Err(CurrencyError::Api("unreachable".to_string())));

        let converter = CurrencyConverter::new(repo, api);
        let quote = converter.quote("XYZ", "USD").await.unwrap();

        assert_close(quote.rate, 1.0, 1e-12, "fallback");
        assert_eq!(quote.source, RateSource::Fallback);
    }

    #[tokio::test]
    async fn test_zero_amount_short_circuits() {
        let mut repo = MockCurrencyRepository::new();
        repo.expect_get_by_code().times(0);
        let mut api = MockExchangeRateApi::new();
        api.expect_fetch_rates().times(0);

        let converter = CurrencyConverter::new(repo, api);
        let converted = converter.convert_amount(0.0, "EUR", "USD").await.unwrap();

        assert_close(converted, 0.0, 1e-12, "zero");
    }

    #[tokio::test]
    async fn test_missing_target_in_fetched_table_degrades() {
        let mut repo = MockCurrencyRepository::new();
        repo.expect_get_by_code().returning(|_| Ok(None));

        let mut api = MockExchangeRateApi::new();
        api.expect_fetch_rates()
            .returning(|_| Ok(HashMap::from([("GBP".to_string(), 0.86)])));

        let converter = CurrencyConverter::new(repo, api);
        let quote = converter.quote("EUR", "USD").await.unwrap();

        assert_eq!(quote.source, RateSource::Fallback);
    }

    #[tokio::test]
    async fn test_refresh_counts_failures_without_aborting() {
        let mut repo = MockCurrencyRepository::new();
        repo.expect_upsert_rate()
            .returning(|input| Ok(rate_row(&input.code, input.rate_to_usd, 0)));

        let mut api = MockExchangeRateApi::new();
        api.expect_fetch_rates().returning(|base| match base {
            "EUR" => Ok(HashMap::from([("USD".to_string(), 0.86)])),
            _ => Err(CurrencyError::Api("unsupported".to_string())),
        });

        let converter = CurrencyConverter::new(repo, api);
        let codes = vec![
            "USD".to_string(),
            "EUR".to_string(),
            "XXX".to_string(),
        ];
        let summary = converter.refresh(&codes).await.unwrap();

        assert_eq!(summary.refreshed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
    }

    #[tokio::test]
    async fn test_seed_defaults_skips_existing() {
        let mut repo = MockCurrencyRepository::new();
        repo.expect_get_by_code().returning(|code| match code {
            "USD" => Ok(Some(rate_row("USD", 1.0, 0))),
            _ => Ok(None),
        });
        repo.expect_upsert_rate()
            .times(5)
            .returning(|input| Ok(rate_row(&input.code, input.rate_to_usd, 0)));

        let converter = CurrencyConverter::new(repo, MockExchangeRateApi::new());
        let seeded = converter.seed_defaults().await.unwrap();

        assert_eq!(seeded, 5);
    }
}
