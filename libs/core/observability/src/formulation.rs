//! Formula composition metrics.

use metrics::{counter, histogram};

/// Composer metrics recorder
pub struct FormulationMetrics;

impl FormulationMetrics {
    /// Record a completed composition run
    pub fn record_composition(product_type: &str, ingredient_count: usize, duration_ms: u64) {
        counter!(
            "formula_compositions_total",
            "product_type" => product_type.to_string(),
            "outcome" => "ok"
        )
        .increment(1);
        histogram!(
            "formula_composition_duration_seconds",
            "product_type" => product_type.to_string()
        )
        .record(duration_ms as f64 / 1000.0);

        tracing::debug!(
            product_type = product_type,
            ingredients = ingredient_count,
            duration_ms = duration_ms,
            "Composed formula"
        );
    }

    /// Record a composition rejected for an unsupported product type
    pub fn record_unsupported_type(product_type: &str) {
        counter!(
            "formula_compositions_total",
            "product_type" => product_type.to_string(),
            "outcome" => "unsupported"
        )
        .increment(1);
    }

    /// Record phase categories that had no available ingredients
    pub fn record_incomplete_phases(product_type: &str, count: usize) {
        if count > 0 {
            counter!(
                "formula_incomplete_phases_total",
                "product_type" => product_type.to_string()
            )
            .increment(count as u64);
        }
    }
}
