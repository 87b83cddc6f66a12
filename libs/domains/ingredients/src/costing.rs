//! Standardized cost-per-gram derivation for ingredients.
//!
//! Cost-per-gram is the common basis for all downstream cost aggregation.
//! The cached value on an ingredient is trusted for [`COST_FRESHNESS_DAYS`];
//! past that it is re-derived from the purchase record when one exists.

use chrono::{DateTime, Utc};

use crate::models::{CostPerUnit, Ingredient};
use crate::units::{self, GRAMS_PER_KILOGRAM, GRAMS_PER_OUNCE, GRAMS_PER_POUND};

/// How long a cached cost-per-gram stays valid
pub const COST_FRESHNESS_DAYS: i64 = 30;

/// Derive the standardized cost per gram for an ingredient.
///
/// Resolution order:
/// 1. Cached `cost_per_gram` when stamped within the freshness window.
/// 2. Purchase record (`purchase_cost` + `purchase_quantity` +
///    `purchase_unit`, plus optional `shipping_cost`), denominated in the
///    ingredient's recorded currency. Currency conversion is the caller's
///    concern; this function never does I/O.
/// 3. The stored (possibly stale) `cost_per_gram`.
///
/// Returns `None` when no cost data exists at all. Callers must treat
/// `None` as "missing", not zero.
pub fn cost_per_gram(ingredient: &Ingredient, now: DateTime<Utc>) -> Option<f64> {
    if let (Some(cached), Some(stamped)) = (ingredient.cost_per_gram, ingredient.last_updated_cost)
    {
        if now.signed_duration_since(stamped).num_days() <= COST_FRESHNESS_DAYS {
            return Some(cached);
        }
    }

    purchase_cost_per_gram(ingredient).or(ingredient.cost_per_gram)
}

/// Cost per gram derived from the purchase record alone, in the
/// ingredient's recorded currency.
///
/// `None` when any purchase field is missing or the purchased quantity
/// converts to zero grams.
pub fn purchase_cost_per_gram(ingredient: &Ingredient) -> Option<f64> {
    let (cost, quantity, unit) = match (
        ingredient.purchase_cost,
        ingredient.purchase_quantity,
        ingredient.purchase_unit.as_deref(),
    ) {
        (Some(cost), Some(quantity), Some(unit)) => (cost, quantity, unit),
        _ => return None,
    };

    let grams = units::to_grams(quantity, unit);
    if grams <= 0.0 {
        return None;
    }

    let total_cost = cost + ingredient.shipping_cost.unwrap_or(0.0);
    Some(total_cost / grams)
}

/// Cost of the ingredient per common display units, in its recorded
/// currency. `None` when no cost data exists.
pub fn cost_per_unit_options(ingredient: &Ingredient, now: DateTime<Utc>) -> Option<CostPerUnit> {
    let per_gram = cost_per_gram(ingredient, now)?;

    Some(CostPerUnit {
        per_gram,
        per_oz: per_gram * GRAMS_PER_OUNCE,
        per_kg: per_gram * GRAMS_PER_KILOGRAM,
        per_lb: per_gram * GRAMS_PER_POUND,
        currency: ingredient
            .currency
            .clone()
            .unwrap_or_else(|| "USD".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use test_utils::assertions::assert_close;
    use uuid::Uuid;

    fn bare_ingredient() -> Ingredient {
        let now = Utc::now();
        Ingredient {
            id: Uuid::now_v7(),
            name: "Glycerin".to_string(),
            inci_name: Some("Glycerin".to_string()),
            description: String::new(),
            phase: Some("Water Phase".to_string()),
            function: Some("Humectant".to_string()),
            max_percentage: Some(10.0),
            is_premium: false,
            is_professional: false,
            purchase_cost: None,
            purchase_quantity: None,
            purchase_unit: None,
            currency: None,
            shipping_cost: None,
            cost_per_gram: None,
            cost_per_oz: None,
            last_updated_cost: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_purchase_record_with_shipping() {
        // 10 + 2 shipping over 100 g => 0.12 per gram
        let mut ingredient = bare_ingredient();
        ingredient.purchase_cost = Some(10.0);
        ingredient.purchase_quantity = Some(100.0);
        ingredient.purchase_unit = Some("g".to_string());
        ingredient.shipping_cost = Some(2.0);
        ingredient.currency = Some("USD".to_string());

        let result = cost_per_gram(&ingredient, Utc::now());
        assert_close(result.unwrap(), 0.12, 1e-9, "cost per gram");
    }

    #[test]
    fn test_fresh_cache_wins_over_purchase_data() {
        let mut ingredient = bare_ingredient();
        ingredient.cost_per_gram = Some(0.5);
        ingredient.last_updated_cost = Some(Utc::now() - Duration::days(5));
        ingredient.purchase_cost = Some(10.0);
        ingredient.purchase_quantity = Some(100.0);
        ingredient.purchase_unit = Some("g".to_string());

        let result = cost_per_gram(&ingredient, Utc::now());
        assert_close(result.unwrap(), 0.5, 1e-9, "cached value");
    }

    #[test]
    fn test_stale_cache_recomputed_from_purchase_data() {
        let mut ingredient = bare_ingredient();
        ingredient.cost_per_gram = Some(0.5);
        ingredient.last_updated_cost = Some(Utc::now() - Duration::days(45));
        ingredient.purchase_cost = Some(20.0);
        ingredient.purchase_quantity = Some(1.0);
        ingredient.purchase_unit = Some("kg".to_string());

        let result = cost_per_gram(&ingredient, Utc::now());
        assert_close(result.unwrap(), 0.02, 1e-9, "recomputed");
    }

    #[test]
    fn test_stale_cache_used_when_no_purchase_data() {
        let mut ingredient = bare_ingredient();
        ingredient.cost_per_gram = Some(0.5);
        ingredient.last_updated_cost = Some(Utc::now() - Duration::days(45));

        let result = cost_per_gram(&ingredient, Utc::now());
        assert_close(result.unwrap(), 0.5, 1e-9, "stale fallback");
    }

    #[test]
    fn test_no_cost_data_is_none() {
        assert!(cost_per_gram(&bare_ingredient(), Utc::now()).is_none());
    }

    #[test]
    fn test_purchase_in_ounces() {
        let mut ingredient = bare_ingredient();
        ingredient.purchase_cost = Some(28.3495);
        ingredient.purchase_quantity = Some(1.0);
        ingredient.purchase_unit = Some("oz".to_string());

        let result = purchase_cost_per_gram(&ingredient);
        assert_close(result.unwrap(), 1.0, 1e-9, "per gram from oz");
    }

    #[test]
    fn test_zero_quantity_is_none() {
        let mut ingredient = bare_ingredient();
        ingredient.purchase_cost = Some(10.0);
        ingredient.purchase_quantity = Some(0.0);
        ingredient.purchase_unit = Some("g".to_string());

        assert!(purchase_cost_per_gram(&ingredient).is_none());
    }

    #[test]
    fn test_cost_per_unit_options() {
        let mut ingredient = bare_ingredient();
        ingredient.cost_per_gram = Some(0.1);
        ingredient.last_updated_cost = Some(Utc::now());
        ingredient.currency = Some("EUR".to_string());

        let options = cost_per_unit_options(&ingredient, Utc::now()).unwrap();
        assert_close(options.per_gram, 0.1, 1e-9, "per gram");
        assert_close(options.per_oz, 2.83495, 1e-9, "per oz");
        assert_close(options.per_kg, 100.0, 1e-9, "per kg");
        assert_close(options.per_lb, 45.3592, 1e-9, "per lb");
        assert_eq!(options.currency, "EUR");
    }

    #[test]
    fn test_cost_per_unit_options_missing_data() {
        assert!(cost_per_unit_options(&bare_ingredient(), Utc::now()).is_none());
    }
}
