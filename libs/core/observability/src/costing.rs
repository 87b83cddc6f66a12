//! Costing and currency metrics.

use metrics::{counter, gauge, histogram};

/// Cost engine metrics recorder
pub struct CostingMetrics;

impl CostingMetrics {
    /// Record a formula cost breakdown computation
    pub fn record_breakdown(currency: &str, missing_count: usize, duration_ms: u64) {
        counter!("cost_breakdowns_total", "currency" => currency.to_string()).increment(1);
        histogram!("cost_breakdown_duration_seconds", "currency" => currency.to_string())
            .record(duration_ms as f64 / 1000.0);

        if missing_count > 0 {
            counter!("cost_missing_ingredients_total").increment(missing_count as u64);
        }

        tracing::debug!(
            currency = currency,
            missing = missing_count,
            duration_ms = duration_ms,
            "Computed cost breakdown"
        );
    }

    /// Record the outcome of a bulk exchange-rate refresh
    pub fn record_refresh(refreshed: usize, failed: usize) {
        counter!("exchange_rate_refreshes_total", "status" => "refreshed")
            .increment(refreshed as u64);
        counter!("exchange_rate_refreshes_total", "status" => "failed").increment(failed as u64);
    }

    /// Set the number of active currencies tracked in the rate cache
    pub fn set_tracked_currencies(count: usize) {
        gauge!("currency_rates_tracked").set(count as f64);
    }
}
