//! Rule-based formula composer.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use domain_ingredients::{Ingredient, IngredientFilter, IngredientRepository};

use crate::error::{FormulationError, FormulationResult};
use crate::models::{ComposeRequest, ComposedFormula, ComposedIngredient};
use crate::rules::FormulationRules;
use crate::steps;

/// Upper bound on the availability fetch; the whole catalog is expected to
/// fit well under this
const AVAILABILITY_FETCH_LIMIT: usize = 10_000;

/// At most this many ingredients fill one base phase category
const MAX_PER_PHASE: usize = 2;

/// A selected ingredient with its working percentage
#[derive(Debug, Clone)]
pub struct Selection {
    pub ingredient: Ingredient,
    pub percentage: f64,
}

/// Composes formulas from the rule table and the available ingredient
/// catalog.
///
/// Pipeline per request: availability filter (tier) → base selection per
/// phase category → concern-driven active selection → percentage
/// normalization → step generation. No stage mutates shared state; the
/// accumulating selection list is local to one call.
pub struct FormulaComposer<R: IngredientRepository> {
    ingredients: Arc<R>,
    rules: Arc<FormulationRules>,
}

impl<R: IngredientRepository> FormulaComposer<R> {
    pub fn new(ingredients: Arc<R>, rules: Arc<FormulationRules>) -> Self {
        Self { ingredients, rules }
    }

    /// Compose a formula for the requested product type and concerns.
    ///
    /// An unsupported product type fails fast before any selection work.
    /// A phase category with no available ingredients is skipped and
    /// reported in `incomplete_phases`; an entirely empty catalog yields
    /// an empty-but-valid formula, never an error.
    pub async fn compose(&self, request: ComposeRequest) -> FormulationResult<ComposedFormula> {
        let requested = request.product_type.trim().to_lowercase();
        let resolved = self
            .rules
            .resolve_product_type(&requested)
            .ok_or_else(|| {
                FormulationError::UnsupportedProductType(request.product_type.clone())
            })?
            .to_string();

        let available = self
            .ingredients
            .list(IngredientFilter {
                tier: Some(request.tier),
                limit: AVAILABILITY_FETCH_LIMIT,
                ..Default::default()
            })
            .await?;

        debug!(
            product_type = %resolved,
            tier = %request.tier,
            available = available.len(),
            "Composing formula"
        );

        let by_phase = group_by_phase(available);

        let mut selections: Vec<Selection> = Vec::new();
        let mut incomplete_phases: Vec<String> = Vec::new();

        self.select_base(
            &resolved,
            &by_phase,
            &request,
            &mut selections,
            &mut incomplete_phases,
        );
        self.select_actives(&request.skin_concerns, &by_phase, &request, &mut selections);
        adjust_percentages(&mut selections);

        let step_list = steps::generate_steps(&selections, &resolved, &self.rules);

        info!(
            product_type = %resolved,
            ingredients = selections.len(),
            steps = step_list.len(),
            incomplete = incomplete_phases.len(),
            "Composed formula"
        );

        let display_type = title_case(&requested);
        let concerns = if request.skin_concerns.is_empty() {
            "general use".to_string()
        } else {
            request.skin_concerns.join(", ")
        };

        Ok(ComposedFormula {
            name: format!("Composed {}", display_type),
            description: format!("A {} formulated for {}", requested, concerns),
            product_type: display_type,
            total_weight: 100.0,
            ingredients: selections
                .iter()
                .enumerate()
                .map(|(index, selection)| ComposedIngredient {
                    ingredient_id: selection.ingredient.id,
                    name: selection.ingredient.name.clone(),
                    phase: selection.ingredient.phase.clone(),
                    percentage: selection.percentage,
                    sort_order: (index + 1) as i32,
                })
                .collect(),
            steps: step_list,
            incomplete_phases,
        })
    }

    /// Fill each required phase category with up to two ingredients, each
    /// receiving an equal share of the category's midpoint percentage.
    /// Avoided ingredients are dropped entirely, not deprioritized.
    fn select_base(
        &self,
        resolved_type: &str,
        by_phase: &HashMap<String, Vec<Ingredient>>,
        request: &ComposeRequest,
        selections: &mut Vec<Selection>,
        incomplete_phases: &mut Vec<String>,
    ) {
        for requirement in self.rules.base_requirements(resolved_type) {
            let labels = self.rules.phase_labels(&requirement.category);

            let mut candidates: Vec<&Ingredient> = labels
                .iter()
                .filter_map(|label| by_phase.get(label))
                .flatten()
                .filter(|i| !request.avoided_ingredients.contains(&i.id))
                .filter(|i| !selections.iter().any(|s| s.ingredient.id == i.id))
                .collect();

            if candidates.is_empty() {
                incomplete_phases.push(requirement.category.clone());
                continue;
            }

            candidates.sort_by_key(|i| {
                (
                    !request.preferred_ingredients.contains(&i.id),
                    i.name.clone(),
                )
            });

            let count = candidates.len().min(MAX_PER_PHASE);
            let share = requirement.midpoint() / count as f64;

            for candidate in candidates.into_iter().take(count) {
                selections.push(Selection {
                    ingredient: candidate.clone(),
                    percentage: share,
                });
            }
        }
    }

    /// Pick one ingredient per concern recommendation, at a fixed
    /// percentage by priority. Already-selected ids and known incompatible
    /// pairings are excluded so no ingredient appears twice.
    fn select_actives(
        &self,
        skin_concerns: &[String],
        by_phase: &HashMap<String, Vec<Ingredient>>,
        request: &ComposeRequest,
        selections: &mut Vec<Selection>,
    ) {
        for concern in skin_concerns {
            let Some(recommendations) = self.rules.recommendations(&concern.to_lowercase())
            else {
                continue;
            };

            for recommendation in recommendations {
                let labels = self.rules.function_labels(&recommendation.function);

                let mut candidates: Vec<&Ingredient> = by_phase
                    .values()
                    .flatten()
                    .filter(|i| !selections.iter().any(|s| s.ingredient.id == i.id))
                    .filter(|i| !request.avoided_ingredients.contains(&i.id))
                    .filter(|i| {
                        i.function
                            .as_deref()
                            .is_some_and(|f| labels.iter().any(|label| f.contains(label.as_str())))
                    })
                    .filter(|i| {
                        !selections
                            .iter()
                            .any(|s| self.rules.are_incompatible(&s.ingredient.name, &i.name))
                    })
                    .collect();

                if candidates.is_empty() {
                    continue;
                }

                candidates.sort_by_key(|i| {
                    (
                        !request.preferred_ingredients.contains(&i.id),
                        i.name.clone(),
                    )
                });

                selections.push(Selection {
                    ingredient: candidates[0].clone(),
                    percentage: recommendation.priority.default_percentage(),
                });
            }
        }
    }
}

/// Group ingredients by their phase label
fn group_by_phase(ingredients: Vec<Ingredient>) -> HashMap<String, Vec<Ingredient>> {
    let mut by_phase: HashMap<String, Vec<Ingredient>> = HashMap::new();

    for ingredient in ingredients {
        let phase = ingredient
            .phase
            .clone()
            .unwrap_or_else(|| "Uncategorized".to_string());
        by_phase.entry(phase).or_default().push(ingredient);
    }

    by_phase
}

/// The single normalization point: rescale so percentages sum to 100,
/// rounding to one decimal. Earlier stages never emit normalized output.
fn adjust_percentages(selections: &mut [Selection]) {
    let total: f64 = selections.iter().map(|s| s.percentage).sum();
    if total <= 0.0 || (total - 100.0).abs() <= 0.01 {
        return;
    }

    let factor = 100.0 / total;
    for selection in selections.iter_mut() {
        selection.percentage = (selection.percentage * factor * 10.0).round() / 10.0;
    }
}

/// "face_mask" -> "Face Mask"
fn title_case(value: &str) -> String {
    value
        .split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
