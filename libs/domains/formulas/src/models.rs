use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Allowed drift of an association percentage sum from 100 before writes
/// renormalize
pub const PERCENT_SUM_TOLERANCE: f64 = 0.5;

/// A stored formula (header row; associations fetched separately)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct Formula {
    /// Unique identifier
    #[ts(as = "String")]
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Description
    pub description: String,
    /// Product category (e.g., "Serum", "Cream")
    pub product_type: String,
    /// Default production batch size
    pub batch_size: Option<f64>,
    /// Unit of the batch size (defaults to grams downstream)
    pub batch_unit: Option<String>,
    /// Legacy total weight, used as a batch-size fallback
    pub total_weight: Option<f64>,
    /// Whether the formula is publicly visible
    pub is_public: bool,
    /// Creation timestamp
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// An ingredient association carried by a formula
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, TS)]
#[ts(export)]
pub struct FormulaIngredient {
    #[ts(as = "String")]
    pub ingredient_id: Uuid,
    /// Share of the batch, 0-100
    #[validate(range(min = 0.0, max = 100.0))]
    pub percentage: f64,
    /// Position within the formula
    pub sort_order: i32,
}

/// A manufacturing step carried by a formula
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, TS)]
#[ts(export)]
pub struct FormulaStep {
    #[validate(length(min = 1))]
    pub description: String,
    /// Position within the instruction sequence
    pub sort_order: i32,
}

/// DTO for creating a new formula with its associations
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, TS)]
#[ts(export)]
pub struct CreateFormula {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, max = 100))]
    pub product_type: String,
    #[validate(range(min = 0.0))]
    pub batch_size: Option<f64>,
    #[validate(length(max = 20))]
    pub batch_unit: Option<String>,
    #[validate(range(min = 0.0))]
    pub total_weight: Option<f64>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    #[validate(nested)]
    pub ingredients: Vec<FormulaIngredient>,
    #[serde(default)]
    #[validate(nested)]
    pub steps: Vec<FormulaStep>,
}

/// DTO for updating a formula's header fields
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, Default, TS)]
#[ts(export)]
pub struct UpdateFormula {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub batch_size: Option<f64>,
    #[validate(length(max = 20))]
    pub batch_unit: Option<String>,
    pub is_public: Option<bool>,
}

/// Query filters for listing formulas
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, IntoParams, Default)]
pub struct FormulaFilter {
    /// Exact product type match
    pub product_type: Option<String>,
    /// Substring match on the name
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

/// Proportionally rescale percentages to sum to 100 when the sum drifts
/// beyond [`PERCENT_SUM_TOLERANCE`]. Rescaled values are rounded to one
/// decimal.
pub fn normalize_percentages(ingredients: &mut [FormulaIngredient]) {
    let total: f64 = ingredients.iter().map(|i| i.percentage).sum();
    if total <= 0.0 || (total - 100.0).abs() <= PERCENT_SUM_TOLERANCE {
        return;
    }

    let factor = 100.0 / total;
    for ingredient in ingredients.iter_mut() {
        ingredient.percentage = (ingredient.percentage * factor * 10.0).round() / 10.0;
    }
}

/// Per-ingredient line of a cost breakdown, in the target currency
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct IngredientCostLine {
    #[ts(as = "String")]
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    /// Share of the batch, 0-100
    pub percentage: f64,
    /// Quantity needed for the batch, in grams
    pub quantity_needed: f64,
    /// Unit of `quantity_needed` (always grams)
    pub quantity_unit: String,
    /// Cost per gram in the target currency
    pub cost_per_unit: f64,
    /// Line total in the target currency
    pub total_cost: f64,
    pub currency: String,
}

/// Complete cost breakdown for one formula batch.
///
/// Recomputed per request, never persisted. Missing cost data degrades the
/// totals rather than failing them: affected ingredients contribute zero
/// and are listed in `missing_cost_ingredients`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct FormulaCostBreakdown {
    #[ts(as = "String")]
    pub formula_id: Uuid,
    pub formula_name: String,
    pub batch_size: f64,
    pub batch_unit: String,
    pub ingredient_costs: Vec<IngredientCostLine>,
    pub total_batch_cost: f64,
    pub cost_per_gram: f64,
    pub cost_per_oz: f64,
    pub currency: String,
    #[ts(as = "String")]
    pub calculation_date: DateTime<Utc>,
    /// Ingredients that contributed zero cost for lack of data
    pub missing_cost_ingredients: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assertions::assert_close;

    fn assoc(percentage: f64, sort_order: i32) -> FormulaIngredient {
        FormulaIngredient {
            ingredient_id: Uuid::now_v7(),
            percentage,
            sort_order,
        }
    }

    #[test]
    fn test_normalize_leaves_compliant_sums_alone() {
        let mut ingredients = vec![assoc(60.0, 1), assoc(40.2, 2)];
        normalize_percentages(&mut ingredients);
        assert_close(ingredients[0].percentage, 60.0, 1e-9, "unchanged");
        assert_close(ingredients[1].percentage, 40.2, 1e-9, "unchanged");
    }

    #[test]
    fn test_normalize_rescales_drifting_sums() {
        let mut ingredients = vec![assoc(60.0, 1), assoc(60.0, 2)];
        normalize_percentages(&mut ingredients);

        let total: f64 = ingredients.iter().map(|i| i.percentage).sum();
        assert_close(total, 100.0, 0.1, "rescaled sum");
        assert_close(ingredients[0].percentage, 50.0, 1e-9, "first");
    }

    #[test]
    fn test_normalize_ignores_empty_and_zero() {
        let mut empty: Vec<FormulaIngredient> = vec![];
        normalize_percentages(&mut empty);

        let mut zeroed = vec![assoc(0.0, 1)];
        normalize_percentages(&mut zeroed);
        assert_close(zeroed[0].percentage, 0.0, 1e-12, "zero stays");
    }
}
