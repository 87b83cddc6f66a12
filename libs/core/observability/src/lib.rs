//! Observability utilities for the formulation platform.
//!
//! This crate provides:
//! - Prometheus metrics recording and export
//! - Custom metrics for composition, costing, and currency operations
//! - Axum middleware for automatic request metrics
//!
//! # Example
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, CostingMetrics};
//!
//! // Initialize metrics recorder
//! init_metrics();
//!
//! // Record costing operations
//! CostingMetrics::record_breakdown("USD", 0, 12);
//!
//! // Add metrics endpoint to router
//! let app = Router::new().route("/metrics", get(metrics_handler));
//! ```

pub mod costing;
pub mod formulation;
pub mod middleware;

pub use costing::CostingMetrics;
pub use formulation::FormulationMetrics;

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge, histogram};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Initialize the Prometheus metrics recorder.
///
/// Should be called once at application startup. Returns the handle used
/// for rendering metrics.
pub fn init_metrics() -> &'static PrometheusHandle {
    METRICS_HANDLE.get_or_init(|| {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .expect("Failed to install Prometheus recorder");

        info!("Prometheus metrics recorder initialized");

        register_metric_descriptions();

        handle
    })
}

/// Get the metrics handle (must call init_metrics first)
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for /metrics endpoint
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

/// Register metric descriptions for documentation
fn register_metric_descriptions() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    // HTTP metrics
    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "Total number of HTTP request errors"
    );

    // Costing metrics
    describe_counter!(
        "cost_breakdowns_total",
        "Total formula cost breakdown computations by target currency"
    );
    describe_histogram!(
        "cost_breakdown_duration_seconds",
        "Cost breakdown computation duration in seconds"
    );
    describe_counter!(
        "cost_missing_ingredients_total",
        "Ingredients encountered without usable cost data"
    );
    describe_counter!(
        "exchange_rate_refreshes_total",
        "Bulk exchange-rate refresh outcomes per currency"
    );
    describe_gauge!(
        "currency_rates_tracked",
        "Number of active currencies in the rate cache"
    );

    // Formulation metrics
    describe_counter!(
        "formula_compositions_total",
        "Formula composition runs by product type and outcome"
    );
    describe_histogram!(
        "formula_composition_duration_seconds",
        "Formula composition duration in seconds"
    );
    describe_counter!(
        "formula_incomplete_phases_total",
        "Phase categories skipped for lack of available ingredients"
    );
}
