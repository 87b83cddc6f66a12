//! Batch cost engine.
//!
//! Joins a formula's ingredient associations with ingredient cost records,
//! normalizes everything to cost-per-gram in USD, and scales to the
//! requested batch in the requested display currency.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use domain_currency::RateProvider;
use domain_ingredients::costing::{purchase_cost_per_gram, COST_FRESHNESS_DAYS};
use domain_ingredients::units::{to_grams, GRAMS_PER_OUNCE};
use domain_ingredients::{Ingredient, IngredientRepository};

use crate::error::{FormulaError, FormulaResult};
use crate::models::{FormulaCostBreakdown, IngredientCostLine};
use crate::repository::FormulaRepository;

/// Batch size assumed when a formula specifies none
const DEFAULT_BATCH_GRAMS: f64 = 100.0;

/// Grams of an ingredient needed for a batch.
///
/// `percentage` is expected in [0, 100]; out-of-range values are a caller
/// error and are not clamped here.
pub fn quantity_needed(percentage: f64, batch_size: f64, batch_unit: &str) -> f64 {
    let batch_size_grams = to_grams(batch_size, batch_unit);
    (percentage / 100.0) * batch_size_grams
}

/// Cost calculator over formulas, ingredients, and the currency converter
pub struct CostCalculator<F, I, P>
where
    F: FormulaRepository,
    I: IngredientRepository,
    P: RateProvider,
{
    formulas: Arc<F>,
    ingredients: Arc<I>,
    rates: Arc<P>,
}

impl<F, I, P> CostCalculator<F, I, P>
where
    F: FormulaRepository,
    I: IngredientRepository,
    P: RateProvider,
{
    pub fn new(formulas: Arc<F>, ingredients: Arc<I>, rates: Arc<P>) -> Self {
        Self {
            formulas,
            ingredients,
            rates,
        }
    }

    /// Cost per gram in USD for one ingredient.
    ///
    /// The async counterpart of the cached derivation: fresh cached values
    /// are returned as-is, purchase-derived values in a foreign currency
    /// are converted to USD through the rate provider, and `None` means no
    /// cost data exists anywhere.
    pub async fn cost_per_gram_usd(&self, ingredient: &Ingredient) -> FormulaResult<Option<f64>> {
        if let (Some(cached), Some(stamped)) =
            (ingredient.cost_per_gram, ingredient.last_updated_cost)
        {
            let age_days = Utc::now().signed_duration_since(stamped).num_days();
            if age_days <= COST_FRESHNESS_DAYS {
                return Ok(Some(cached));
            }
        }

        if let Some(local) = purchase_cost_per_gram(ingredient) {
            let currency = ingredient.currency.as_deref().unwrap_or("USD");
            if !currency.eq_ignore_ascii_case("USD") {
                let usd = self.rates.convert(local, currency, "USD").await?;
                return Ok(Some(usd));
            }
            return Ok(Some(local));
        }

        Ok(ingredient.cost_per_gram)
    }

    /// Complete cost breakdown for a formula batch.
    ///
    /// Batch size and unit default to the formula's own, then to
    /// `total_weight` in grams, then to 100 g. An unknown formula id is an
    /// error; an ingredient without cost data contributes zero and is
    /// listed in `missing_cost_ingredients` instead of failing the
    /// breakdown.
    pub async fn formula_cost_breakdown(
        &self,
        formula_id: Uuid,
        batch_size: Option<f64>,
        batch_unit: Option<String>,
        target_currency: &str,
    ) -> FormulaResult<FormulaCostBreakdown> {
        let formula = self
            .formulas
            .get_by_id(formula_id)
            .await?
            .ok_or_else(|| FormulaError::NotFound(formula_id.to_string()))?;

        let batch_size = batch_size
            .or(formula.batch_size)
            .or(formula.total_weight)
            .unwrap_or(DEFAULT_BATCH_GRAMS);
        let batch_unit = batch_unit
            .or_else(|| formula.batch_unit.clone())
            .unwrap_or_else(|| "g".to_string());
        let target_currency = target_currency.to_uppercase();

        let associations = self.formulas.ingredient_associations(formula_id).await?;

        let ids: Vec<Uuid> = associations.iter().map(|a| a.ingredient_id).collect();
        let ingredients: HashMap<Uuid, Ingredient> = self
            .ingredients
            .get_many(ids)
            .await?
            .into_iter()
            .map(|i| (i.id, i))
            .collect();

        let mut ingredient_costs = Vec::with_capacity(associations.len());
        let mut total_batch_cost = 0.0;
        let mut missing_cost_ingredients = Vec::new();

        for assoc in &associations {
            // Orphaned associations are skipped, matching the lenient
            // read path everywhere else in this engine.
            let Some(ingredient) = ingredients.get(&assoc.ingredient_id) else {
                continue;
            };

            let grams_needed = quantity_needed(assoc.percentage, batch_size, &batch_unit);

            let cost_per_gram_usd = match self.cost_per_gram_usd(ingredient).await {
                Ok(Some(value)) => value,
                Ok(None) => {
                    missing_cost_ingredients.push(ingredient.name.clone());
                    0.0
                }
                Err(e) => {
                    warn!(
                        ingredient_id = %ingredient.id,
                        "Cost lookup failed, counting as missing: {}",
                        e
                    );
                    missing_cost_ingredients.push(ingredient.name.clone());
                    0.0
                }
            };

            let line_total_usd = grams_needed * cost_per_gram_usd;

            let (cost_per_unit, total_cost) = if target_currency != "USD" {
                let per_unit = self
                    .rates
                    .convert(cost_per_gram_usd, "USD", &target_currency)
                    .await?;
                let total = self
                    .rates
                    .convert(line_total_usd, "USD", &target_currency)
                    .await?;
                (per_unit, total)
            } else {
                (cost_per_gram_usd, line_total_usd)
            };

            total_batch_cost += total_cost;

            ingredient_costs.push(IngredientCostLine {
                ingredient_id: ingredient.id,
                ingredient_name: ingredient.name.clone(),
                percentage: assoc.percentage,
                quantity_needed: grams_needed,
                quantity_unit: "g".to_string(),
                cost_per_unit,
                total_cost,
                currency: target_currency.clone(),
            });
        }

        let batch_size_grams = to_grams(batch_size, &batch_unit);
        let cost_per_gram = if batch_size_grams > 0.0 {
            total_batch_cost / batch_size_grams
        } else {
            0.0
        };

        Ok(FormulaCostBreakdown {
            formula_id: formula.id,
            formula_name: formula.name,
            batch_size,
            batch_unit,
            ingredient_costs,
            total_batch_cost,
            cost_per_gram,
            cost_per_oz: cost_per_gram * GRAMS_PER_OUNCE,
            currency: target_currency,
            calculation_date: Utc::now(),
            missing_cost_ingredients,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Formula, FormulaIngredient};
    use crate::repository::MockFormulaRepository;
    use async_trait::async_trait;
    use domain_currency::CurrencyResult;
    use domain_ingredients::models::{
        CreateIngredient, IngredientFilter, UpdateIngredient, UpdateIngredientCost,
    };
    use domain_ingredients::IngredientResult;
    use mockall::mock;
    use test_utils::assertions::assert_close;

    mock! {
        IngredientRepo {}

        #[async_trait]
        impl IngredientRepository for IngredientRepo {
            async fn create(&self, input: CreateIngredient) -> IngredientResult<Ingredient>;
            async fn get_by_id(&self, id: Uuid) -> IngredientResult<Option<Ingredient>>;
            async fn get_many(&self, ids: Vec<Uuid>) -> IngredientResult<Vec<Ingredient>>;
            async fn list(&self, filter: IngredientFilter) -> IngredientResult<Vec<Ingredient>>;
            async fn update(&self, id: Uuid, input: UpdateIngredient) -> IngredientResult<Ingredient>;
            async fn update_cost(
                &self,
                id: Uuid,
                input: UpdateIngredientCost,
            ) -> IngredientResult<Ingredient>;
            async fn delete(&self, id: Uuid) -> IngredientResult<bool>;
            async fn count(&self) -> IngredientResult<usize>;
        }
    }

    mock! {
        Rates {}

        #[async_trait]
        impl RateProvider for Rates {
            async fn exchange_rate(&self, from: &str, to: &str) -> CurrencyResult<f64>;
            async fn convert(&self, amount: f64, from: &str, to: &str) -> CurrencyResult<f64>;
        }
    }

    fn formula_header(id: Uuid) -> Formula {
        let now = Utc::now();
        Formula {
            id,
            name: "Night Serum".to_string(),
            description: String::new(),
            product_type: "Serum".to_string(),
            batch_size: Some(200.0),
            batch_unit: Some("g".to_string()),
            total_weight: Some(100.0),
            is_public: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn costed_ingredient(id: Uuid, name: &str, per_gram: f64) -> Ingredient {
        let now = Utc::now();
        Ingredient {
            id,
            name: name.to_string(),
            inci_name: None,
            description: String::new(),
            phase: Some("Water Phase".to_string()),
            function: Some("Humectant".to_string()),
            max_percentage: None,
            is_premium: false,
            is_professional: false,
            purchase_cost: None,
            purchase_quantity: None,
            purchase_unit: None,
            currency: Some("USD".to_string()),
            shipping_cost: None,
            cost_per_gram: Some(per_gram),
            cost_per_oz: Some(per_gram * GRAMS_PER_OUNCE),
            last_updated_cost: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    fn uncosted_ingredient(id: Uuid, name: &str) -> Ingredient {
        let mut ingredient = costed_ingredient(id, name, 0.0);
        ingredient.cost_per_gram = None;
        ingredient.cost_per_oz = None;
        ingredient.last_updated_cost = None;
        ingredient.currency = None;
        ingredient
    }

    fn no_rates() -> Arc<MockRates> {
        let mut rates = MockRates::new();
        rates.expect_convert().times(0);
        Arc::new(rates)
    }

    #[test]
    fn test_quantity_needed_scenario() {
        assert_close(quantity_needed(10.0, 200.0, "g"), 20.0, 1e-9, "10% of 200g");
    }

    #[test]
    fn test_quantity_needed_converts_batch_unit() {
        assert_close(
            quantity_needed(50.0, 1.0, "kg"),
            500.0,
            1e-9,
            "50% of 1kg",
        );
    }

    #[tokio::test]
    async fn test_breakdown_unknown_formula_is_not_found() {
        let mut formulas = MockFormulaRepository::new();
        formulas.expect_get_by_id().returning(|_| Ok(None));

        let calculator = CostCalculator::new(
            Arc::new(formulas),
            Arc::new(MockIngredientRepo::new()),
            no_rates(),
        );

        let result = calculator
            .formula_cost_breakdown(Uuid::now_v7(), None, None, "USD")
            .await;

        assert!(matches!(result, Err(FormulaError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_breakdown_aggregation_consistency() {
        let formula_id = Uuid::now_v7();
        let water_id = Uuid::now_v7();
        let glycerin_id = Uuid::now_v7();

        let mut formulas = MockFormulaRepository::new();
        formulas
            .expect_get_by_id()
            .returning(move |id| Ok(Some(formula_header(id))));
        formulas.expect_ingredient_associations().returning(move |_| {
            Ok(vec![
                FormulaIngredient {
                    ingredient_id: water_id,
                    percentage: 90.0,
                    sort_order: 1,
                },
                FormulaIngredient {
                    ingredient_id: glycerin_id,
                    percentage: 10.0,
                    sort_order: 2,
                },
            ])
        });

        let mut ingredients = MockIngredientRepo::new();
        ingredients.expect_get_many().returning(move |_| {
            Ok(vec![
                costed_ingredient(water_id, "Distilled Water", 0.001),
                costed_ingredient(glycerin_id, "Glycerin", 0.02),
            ])
        });

        let calculator =
            CostCalculator::new(Arc::new(formulas), Arc::new(ingredients), no_rates());

        let breakdown = calculator
            .formula_cost_breakdown(formula_id, None, None, "USD")
            .await
            .unwrap();

        // Formula default batch: 200 g. Water: 180g * 0.001; glycerin: 20g * 0.02.
        assert_close(breakdown.batch_size, 200.0, 1e-9, "batch size");
        assert_close(breakdown.total_batch_cost, 0.18 + 0.4, 1e-9, "total");

        let summed: f64 = breakdown.ingredient_costs.iter().map(|l| l.total_cost).sum();
        assert_close(breakdown.total_batch_cost, summed, 1e-9, "sum of lines");

        assert_close(
            breakdown.cost_per_gram,
            breakdown.total_batch_cost / 200.0,
            1e-9,
            "per gram",
        );
        assert_close(
            breakdown.cost_per_oz,
            breakdown.cost_per_gram * GRAMS_PER_OUNCE,
            1e-9,
            "per oz",
        );
        assert!(breakdown.missing_cost_ingredients.is_empty());
    }

    #[tokio::test]
    async fn test_breakdown_missing_cost_degrades_to_zero() {
        let formula_id = Uuid::now_v7();
        let water_id = Uuid::now_v7();
        let mystery_id = Uuid::now_v7();

        let mut formulas = MockFormulaRepository::new();
        formulas
            .expect_get_by_id()
            .returning(move |id| Ok(Some(formula_header(id))));
        formulas.expect_ingredient_associations().returning(move |_| {
            Ok(vec![
                FormulaIngredient {
                    ingredient_id: water_id,
                    percentage: 95.0,
                    sort_order: 1,
                },
                FormulaIngredient {
                    ingredient_id: mystery_id,
                    percentage: 5.0,
                    sort_order: 2,
                },
            ])
        });

        let mut ingredients = MockIngredientRepo::new();
        ingredients.expect_get_many().returning(move |_| {
            Ok(vec![
                costed_ingredient(water_id, "Distilled Water", 0.001),
                uncosted_ingredient(mystery_id, "Rare Extract"),
            ])
        });

        let calculator =
            CostCalculator::new(Arc::new(formulas), Arc::new(ingredients), no_rates());

        let breakdown = calculator
            .formula_cost_breakdown(formula_id, None, None, "USD")
            .await
            .unwrap();

        assert_eq!(
            breakdown.missing_cost_ingredients,
            vec!["Rare Extract".to_string()]
        );

        let mystery_line = breakdown
            .ingredient_costs
            .iter()
            .find(|l| l.ingredient_name == "Rare Extract")
            .unwrap();
        assert_close(mystery_line.total_cost, 0.0, 1e-12, "zero contribution");
        assert_close(breakdown.total_batch_cost, 190.0 * 0.001, 1e-9, "undercounted total");
    }

    #[tokio::test]
    async fn test_breakdown_converts_to_target_currency() {
        let formula_id = Uuid::now_v7();
        let water_id = Uuid::now_v7();

        let mut formulas = MockFormulaRepository::new();
        formulas
            .expect_get_by_id()
            .returning(move |id| Ok(Some(formula_header(id))));
        formulas.expect_ingredient_associations().returning(move |_| {
            Ok(vec![FormulaIngredient {
                ingredient_id: water_id,
                percentage: 100.0,
                sort_order: 1,
            }])
        });

        let mut ingredients = MockIngredientRepo::new();
        ingredients
            .expect_get_many()
            .returning(move |_| Ok(vec![costed_ingredient(water_id, "Distilled Water", 0.01)]));

        let mut rates = MockRates::new();
        rates
            .expect_convert()
            .returning(|amount, _, _| Ok(amount * 0.9));

        let calculator = CostCalculator::new(
            Arc::new(formulas),
            Arc::new(ingredients),
            Arc::new(rates),
        );

        let breakdown = calculator
            .formula_cost_breakdown(formula_id, None, None, "eur")
            .await
            .unwrap();

        assert_eq!(breakdown.currency, "EUR");
        // 200 g * 0.01 USD/g = 2 USD -> 1.8 EUR
        assert_close(breakdown.total_batch_cost, 1.8, 1e-9, "converted total");
    }

    #[tokio::test]
    async fn test_breakdown_custom_batch_overrides_formula() {
        let formula_id = Uuid::now_v7();
        let water_id = Uuid::now_v7();

        let mut formulas = MockFormulaRepository::new();
        formulas
            .expect_get_by_id()
            .returning(move |id| Ok(Some(formula_header(id))));
        formulas.expect_ingredient_associations().returning(move |_| {
            Ok(vec![FormulaIngredient {
                ingredient_id: water_id,
                percentage: 100.0,
                sort_order: 1,
            }])
        });

        let mut ingredients = MockIngredientRepo::new();
        ingredients
            .expect_get_many()
            .returning(move |_| Ok(vec![costed_ingredient(water_id, "Distilled Water", 0.01)]));

        let calculator =
            CostCalculator::new(Arc::new(formulas), Arc::new(ingredients), no_rates());

        let breakdown = calculator
            .formula_cost_breakdown(formula_id, Some(1.0), Some("kg".to_string()), "USD")
            .await
            .unwrap();

        // 1 kg = 1000 g at 0.01 USD/g
        assert_close(breakdown.total_batch_cost, 10.0, 1e-9, "kg batch");
        assert_close(breakdown.cost_per_gram, 0.01, 1e-9, "per gram");
    }

    #[tokio::test]
    async fn test_breakdown_zero_batch_guards_division() {
        let formula_id = Uuid::now_v7();

        let mut formulas = MockFormulaRepository::new();
        formulas
            .expect_get_by_id()
            .returning(move |id| Ok(Some(formula_header(id))));
        formulas
            .expect_ingredient_associations()
            .returning(|_| Ok(vec![]));

        let mut ingredients = MockIngredientRepo::new();
        ingredients.expect_get_many().returning(|_| Ok(vec![]));

        let calculator =
            CostCalculator::new(Arc::new(formulas), Arc::new(ingredients), no_rates());

        let breakdown = calculator
            .formula_cost_breakdown(formula_id, Some(0.0), None, "USD")
            .await
            .unwrap();

        assert_close(breakdown.cost_per_gram, 0.0, 1e-12, "guarded");
        assert_close(breakdown.cost_per_oz, 0.0, 1e-12, "guarded oz");
    }

    #[tokio::test]
    async fn test_cost_per_gram_usd_converts_foreign_purchase() {
        let mut rates = MockRates::new();
        rates
            .expect_convert()
            .withf(|_, from, to| from == "EUR" && to == "USD")
            .returning(|amount, _, _| Ok(amount / 0.85));

        let calculator = CostCalculator::new(
            Arc::new(MockFormulaRepository::new()),
            Arc::new(MockIngredientRepo::new()),
            Arc::new(rates),
        );

        let mut ingredient = uncosted_ingredient(Uuid::now_v7(), "Imported Extract");
        ingredient.purchase_cost = Some(85.0);
        ingredient.purchase_quantity = Some(100.0);
        ingredient.purchase_unit = Some("g".to_string());
        ingredient.currency = Some("EUR".to_string());

        let result = calculator.cost_per_gram_usd(&ingredient).await.unwrap();
        assert_close(result.unwrap(), 1.0, 1e-9, "converted to USD");
    }
}
