//! Manufacturing-step generation from a composed ingredient set.
//!
//! Steps derive from the selected ingredients' phases and the product-type
//! family. The sequence is fixed once generated; numbering starts at 1.

use std::collections::HashMap;

use crate::composer::Selection;
use crate::models::ComposedStep;
use crate::rules::FormulationRules;

/// Accumulates numbered steps in order
struct StepList {
    steps: Vec<ComposedStep>,
}

impl StepList {
    fn new() -> Self {
        Self { steps: Vec::new() }
    }

    fn push(&mut self, description: String) {
        let sort_order = (self.steps.len() + 1) as i32;
        self.steps.push(ComposedStep {
            description,
            sort_order,
        });
    }
}

/// Generate the ordered manufacturing instructions for a selection set.
///
/// Branching: cleanser-family products get gentle surfactant handling;
/// products with both a water and an oil phase get the heat-and-emulsify
/// sequence; single-phase products get a plain combination step. The pH
/// check and packaging steps are always emitted.
pub fn generate_steps(
    selections: &[Selection],
    product_type: &str,
    rules: &FormulationRules,
) -> Vec<ComposedStep> {
    let by_phase = group_names_by_phase(selections);

    let water_names = phase_names(&by_phase, "Water Phase");
    let oil_names = phase_names(&by_phase, "Oil Phase");
    let is_emulsion = !water_names.is_empty() && !oil_names.is_empty();
    let is_cleanser = product_type.contains("cleanser") || product_type.contains("shampoo");

    let mut steps = StepList::new();

    if is_cleanser {
        if !water_names.is_empty() {
            steps.push(format!(
                "In a clean beaker, combine water phase ingredients ({}).",
                water_names.join(", ")
            ));
        }

        let surfactant_names = names_with_function(selections, &["Surfactant", "Cleansing"]);
        if !surfactant_names.is_empty() {
            steps.push(format!(
                "Add surfactants ({}) and mix gently to avoid excessive foaming.",
                surfactant_names.join(", ")
            ));
        }
    } else if is_emulsion {
        steps.push(format!(
            "Heat water phase ingredients ({}) to 70-75\u{b0}C.",
            water_names.join(", ")
        ));
        steps.push(format!(
            "In a separate container, heat oil phase ingredients ({}) to 70-75\u{b0}C.",
            oil_names.join(", ")
        ));
        steps.push(
            "Slowly add the oil phase to the water phase while stirring continuously."
                .to_string(),
        );
        steps.push(
            "Use a high-shear mixer and homogenize for 3-5 minutes to ensure proper emulsification."
                .to_string(),
        );
        steps.push("Continue mixing while cooling the emulsion to room temperature.".to_string());
    } else if !oil_names.is_empty() {
        steps.push(format!(
            "Heat oil phase ingredients ({}) to 60-65\u{b0}C in a double boiler and stir until homogeneous.",
            oil_names.join(", ")
        ));
    } else if !water_names.is_empty() {
        steps.push(format!(
            "In a clean beaker, combine water phase ingredients ({}) and stir until fully dissolved.",
            water_names.join(", ")
        ));
    }

    let thickener_names = names_with_function(selections, &["Thickener"]);
    if !thickener_names.is_empty() {
        steps.push(format!(
            "Sprinkle thickeners ({}) in slowly while mixing to avoid clumping.",
            thickener_names.join(", ")
        ));
    }

    // Heat-sensitive additions after the mixture cools
    let mut cool_down_names = phase_names(&by_phase, "Cool Down Phase");
    cool_down_names.extend(phase_names(&by_phase, "Active"));
    if !cool_down_names.is_empty() {
        steps.push(format!(
            "Once cooled to below 40\u{b0}C, add heat-sensitive ingredients ({}) one by one, mixing gently after each addition.",
            cool_down_names.join(", ")
        ));
    }

    let preservative_names = names_with_function(selections, &["Preservative"]);
    if !preservative_names.is_empty() {
        steps.push(format!(
            "Add preservatives ({}) and mix thoroughly to ensure even distribution.",
            preservative_names.join(", ")
        ));
    }

    steps.push(format!(
        "Check the final pH and adjust if necessary to {}.",
        rules.ideal_ph_range(product_type)
    ));

    let container = if product_type.contains("cream") || product_type.contains("balm") {
        "jars"
    } else {
        "bottles"
    };
    steps.push(format!(
        "Transfer to clean {} and store in a cool, dry place away from direct sunlight.",
        container
    ));

    steps.steps
}

fn group_names_by_phase(selections: &[Selection]) -> HashMap<String, Vec<String>> {
    let mut by_phase: HashMap<String, Vec<String>> = HashMap::new();

    for selection in selections {
        let phase = selection
            .ingredient
            .phase
            .clone()
            .unwrap_or_else(|| "Uncategorized".to_string());
        by_phase
            .entry(phase)
            .or_default()
            .push(selection.ingredient.name.clone());
    }

    by_phase
}

fn phase_names(by_phase: &HashMap<String, Vec<String>>, phase: &str) -> Vec<String> {
    by_phase.get(phase).cloned().unwrap_or_default()
}

fn names_with_function(selections: &[Selection], keywords: &[&str]) -> Vec<String> {
    selections
        .iter()
        .filter(|s| {
            s.ingredient
                .function
                .as_deref()
                .is_some_and(|f| keywords.iter().any(|keyword| f.contains(keyword)))
        })
        .map(|s| s.ingredient.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain_ingredients::Ingredient;
    use uuid::Uuid;

    fn selection(name: &str, phase: &str, function: &str, percentage: f64) -> Selection {
        let now = Utc::now();
        Selection {
            ingredient: Ingredient {
                id: Uuid::now_v7(),
                name: name.to_string(),
                inci_name: None,
                description: String::new(),
                phase: Some(phase.to_string()),
                function: Some(function.to_string()),
                max_percentage: None,
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
            },
            percentage,
        }
    }

    fn emulsion_selections() -> Vec<Selection> {
        vec![
            selection("Distilled Water", "Water Phase", "Solvent", 70.0),
            selection("Shea Butter", "Oil Phase", "Emollient", 20.0),
            selection("Niacinamide", "Cool Down Phase", "Active", 4.0),
            selection("Xanthan Gum", "Water Phase", "Thickener", 0.5),
            selection("Phenoxyethanol", "Preservative", "Preservative", 1.0),
        ]
    }

    #[test]
    fn test_emulsion_gets_heat_and_homogenize_steps() {
        let rules = FormulationRules::standard();
        let steps = generate_steps(&emulsion_selections(), "cream", &rules);

        let text = steps
            .iter()
            .map(|s| s.description.as_str())
            .collect::<Vec<_>>()
            .join(" | ");

        assert!(text.contains("Heat water phase ingredients"));
        assert!(text.contains("heat oil phase ingredients"));
        assert!(text.contains("homogenize"));
        assert!(text.contains("Sprinkle thickeners (Xanthan Gum)"));
        assert!(text.contains("Add preservatives (Phenoxyethanol)"));
        assert!(text.contains("adjust if necessary to 5.0-6.0"));
        assert!(text.contains("Transfer to clean jars"));
    }

    #[test]
    fn test_steps_are_sequentially_numbered() {
        let rules = FormulationRules::standard();
        let steps = generate_steps(&emulsion_selections(), "cream", &rules);

        for (index, step) in steps.iter().enumerate() {
            assert_eq!(step.sort_order, (index + 1) as i32);
        }
    }

    #[test]
    fn test_cleanser_branch_handles_surfactants_gently() {
        let rules = FormulationRules::standard();
        let selections = vec![
            selection("Distilled Water", "Water Phase", "Solvent", 60.0),
            selection("Coco Glucoside", "Surfactant", "Surfactant", 20.0),
            selection("Phenoxyethanol", "Preservative", "Preservative", 1.0),
        ];

        let steps = generate_steps(&selections, "cleanser", &rules);
        let text = steps
            .iter()
            .map(|s| s.description.as_str())
            .collect::<Vec<_>>()
            .join(" | ");

        assert!(text.contains("mix gently to avoid excessive foaming"));
        assert!(text.contains("adjust if necessary to 4.5-5.5"));
        assert!(!text.contains("homogenize"));
    }

    #[test]
    fn test_water_only_product_gets_combine_step() {
        let rules = FormulationRules::standard();
        let selections = vec![
            selection("Rose Hydrosol", "Water Phase", "Solvent", 95.0),
            selection("Phenoxyethanol", "Preservative", "Preservative", 1.0),
        ];

        let steps = generate_steps(&selections, "toner", &rules);
        let text = steps
            .iter()
            .map(|s| s.description.as_str())
            .collect::<Vec<_>>()
            .join(" | ");

        assert!(text.contains("combine water phase ingredients (Rose Hydrosol)"));
        assert!(text.contains("adjust if necessary to 4.0-5.5"));
        assert!(text.contains("Transfer to clean bottles"));
    }

    #[test]
    fn test_empty_selection_still_emits_ph_and_packaging() {
        let rules = FormulationRules::standard();
        let steps = generate_steps(&[], "serum", &rules);

        assert_eq!(steps.len(), 2);
        assert!(steps[0].description.contains("Check the final pH"));
        assert!(steps[1].description.contains("Transfer to clean bottles"));
    }

    #[test]
    fn test_preservative_step_only_when_present() {
        let rules = FormulationRules::standard();
        let selections = vec![selection("Rose Hydrosol", "Water Phase", "Solvent", 100.0)];

        let steps = generate_steps(&selections, "toner", &rules);
        assert!(!steps
            .iter()
            .any(|s| s.description.contains("Add preservatives")));
    }
}
