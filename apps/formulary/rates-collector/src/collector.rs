//! Rate collection over the currency cache.

use chrono::Utc;
use database::postgres::DatabaseConnection;
use domain_currency::{
    CurrencyConverter, ExchangeRateApiClient, PgCurrencyRepository, RefreshSummary,
    RATE_CACHE_TTL_HOURS,
};
use eyre::Result;
use observability::CostingMetrics;
use serde::Serialize;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::config::Config;

/// Staleness of one cached currency, for `status` output
#[derive(Debug, Serialize)]
pub struct CurrencyStatus {
    pub code: String,
    pub rate_to_usd: f64,
    pub last_updated: String,
    pub age_hours: i64,
    pub stale: bool,
}

/// Refreshes the currency cache from the external rate provider.
#[derive(Clone)]
pub struct RateCollector {
    converter: CurrencyConverter<PgCurrencyRepository, ExchangeRateApiClient>,
}

impl RateCollector {
    pub fn new(db: DatabaseConnection, config: &Config) -> Self {
        let converter = CurrencyConverter::new(
            PgCurrencyRepository::new(db),
            ExchangeRateApiClient::new(config.exchange.clone()),
        );

        Self { converter }
    }

    /// Refresh the given codes, or every active currency when none are
    /// given. Per-currency failures are counted, never abort the run.
    pub async fn refresh(&self, codes: Option<&[String]>) -> Result<RefreshSummary> {
        // Make sure an empty cache still has the default currency set
        self.converter
            .seed_defaults()
            .await
            .map_err(|e| eyre::eyre!("Seeding default currencies failed: {}", e))?;

        let summary = match codes {
            Some(codes) => self.converter.refresh(codes).await,
            None => self.converter.refresh_all().await,
        }
        .map_err(|e| eyre::eyre!("Rate refresh failed: {}", e))?;

        CostingMetrics::record_refresh(summary.refreshed, summary.failed);

        let tracked = self
            .converter
            .supported_currencies()
            .await
            .map(|currencies| currencies.len())
            .unwrap_or(0);
        CostingMetrics::set_tracked_currencies(tracked);

        Ok(summary)
    }

    /// Run refreshes on a cron schedule until interrupted.
    pub async fn run_scheduled(&self, cron: &str) -> Result<()> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| eyre::eyre!("Scheduler init failed: {}", e))?;

        let collector = self.clone();
        let job = Job::new_async(cron, move |_id, _lock| {
            let collector = collector.clone();
            Box::pin(async move {
                match collector.refresh(None).await {
                    Ok(summary) => info!(
                        "Scheduled refresh complete: {} refreshed, {} failed, {} skipped",
                        summary.refreshed, summary.failed, summary.skipped
                    ),
                    Err(e) => error!("Scheduled refresh failed: {}", e),
                }
            })
        })
        .map_err(|e| eyre::eyre!("Invalid cron expression: {}", e))?;

        scheduler
            .add(job)
            .await
            .map_err(|e| eyre::eyre!("Failed to add job: {}", e))?;
        scheduler
            .start()
            .await
            .map_err(|e| eyre::eyre!("Scheduler start failed: {}", e))?;

        info!("Rate refresh scheduled with cron: {}", cron);

        // Run until SIGINT
        tokio::signal::ctrl_c().await?;
        info!("Received Ctrl+C, stopping scheduler");

        Ok(())
    }

    /// Per-currency staleness report.
    pub async fn status(&self) -> Result<Vec<CurrencyStatus>> {
        let now = Utc::now();
        let currencies = self
            .converter
            .supported_currencies()
            .await
            .map_err(|e| eyre::eyre!("Listing currencies failed: {}", e))?;

        Ok(currencies
            .into_iter()
            .map(|currency| {
                let age_hours = now.signed_duration_since(currency.last_updated).num_hours();
                CurrencyStatus {
                    code: currency.code,
                    rate_to_usd: currency.rate_to_usd,
                    last_updated: currency.last_updated.to_rfc3339(),
                    age_hours,
                    stale: age_hours > RATE_CACHE_TTL_HOURS,
                }
            })
            .collect())
    }
}
