use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use domain_ingredients::Tier;

/// Request to compose a formula
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, TS)]
#[ts(export)]
pub struct ComposeRequest {
    /// Requested product type (aliases like "moisturizer" are accepted)
    #[validate(length(min = 1, max = 100))]
    pub product_type: String,
    /// Skin concerns driving active selection; unknown concerns are
    /// ignored
    #[serde(default)]
    pub skin_concerns: Vec<String>,
    /// Subscription tier gating ingredient availability
    #[serde(default)]
    pub tier: Tier,
    /// Ingredients to favor during selection
    #[serde(default)]
    #[ts(as = "Vec<String>")]
    pub preferred_ingredients: Vec<Uuid>,
    /// Ingredients excluded from selection entirely
    #[serde(default)]
    #[ts(as = "Vec<String>")]
    pub avoided_ingredients: Vec<Uuid>,
}

/// One selected ingredient in a composed formula
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct ComposedIngredient {
    #[ts(as = "String")]
    pub ingredient_id: Uuid,
    pub name: String,
    /// Phase label the ingredient belongs to
    pub phase: Option<String>,
    /// Share of the batch after normalization, 0-100
    pub percentage: f64,
    /// Position within the formula
    pub sort_order: i32,
}

/// One manufacturing instruction in a composed formula
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct ComposedStep {
    pub description: String,
    /// Position within the instruction sequence, numbered from 1
    pub sort_order: i32,
}

/// The composer's output artifact.
///
/// Not persisted here; the caller hands it to the formulas API when the
/// user keeps it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct ComposedFormula {
    /// Generated display name
    pub name: String,
    /// Generated description
    pub description: String,
    /// Requested product type (pre-alias), title-cased for display
    pub product_type: String,
    /// Nominal batch weight the percentages describe
    pub total_weight: f64,
    pub ingredients: Vec<ComposedIngredient>,
    pub steps: Vec<ComposedStep>,
    /// Required phase categories that had no available ingredients.
    /// A non-empty list marks the formula as incomplete rather than
    /// failing composition.
    pub incomplete_phases: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_request_defaults() {
        let request: ComposeRequest =
            serde_json::from_str(r#"{"product_type": "serum"}"#).unwrap();

        assert_eq!(request.product_type, "serum");
        assert!(request.skin_concerns.is_empty());
        assert_eq!(request.tier, Tier::Free);
        assert!(request.preferred_ingredients.is_empty());
        assert!(request.avoided_ingredients.is_empty());
    }
}
