use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Subscription tier gating ingredient access
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
    TS,
    Hash,
)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tier {
    #[default]
    Free,
    Premium,
    Professional,
}

impl Tier {
    /// Whether an ingredient with the given access flags is visible to this tier
    pub fn allows(&self, is_premium: bool, is_professional: bool) -> bool {
        match self {
            Tier::Free => !is_premium && !is_professional,
            Tier::Premium => !is_professional,
            Tier::Professional => true,
        }
    }
}

/// A cosmetic ingredient with formulation labels and cost data
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct Ingredient {
    /// Unique identifier
    #[ts(as = "String")]
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Standardized INCI label
    pub inci_name: Option<String>,
    /// Description
    pub description: String,
    /// Formulation phase label (e.g., "Water Phase", "Oil Phase")
    pub phase: Option<String>,
    /// Role label (e.g., "Humectant", "Preservative")
    pub function: Option<String>,
    /// Maximum recommended usage percentage
    pub max_percentage: Option<f64>,
    /// Requires a premium subscription
    pub is_premium: bool,
    /// Requires a professional subscription
    pub is_professional: bool,
    /// Purchase price for the recorded quantity
    pub purchase_cost: Option<f64>,
    /// Purchased quantity in `purchase_unit`
    pub purchase_quantity: Option<f64>,
    /// Unit the quantity was purchased in (g, oz, kg, lb, ml, l)
    pub purchase_unit: Option<String>,
    /// Currency code the purchase was made in (3-letter)
    pub currency: Option<String>,
    /// Shipping cost added to the purchase price
    pub shipping_cost: Option<f64>,
    /// Cached standardized cost per gram (valid for 30 days)
    pub cost_per_gram: Option<f64>,
    /// Cached cost per ounce, derived from cost per gram
    pub cost_per_oz: Option<f64>,
    /// When the cost cache was last refreshed
    #[ts(as = "Option<String>")]
    pub last_updated_cost: Option<DateTime<Utc>>,
    /// Creation timestamp
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new ingredient
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, TS)]
#[ts(export)]
pub struct CreateIngredient {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 255))]
    pub inci_name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[validate(length(max = 100))]
    pub phase: Option<String>,
    #[validate(length(max = 100))]
    pub function: Option<String>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub max_percentage: Option<f64>,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub is_professional: bool,
    #[validate(range(min = 0.0))]
    pub purchase_cost: Option<f64>,
    #[validate(range(min = 0.0))]
    pub purchase_quantity: Option<f64>,
    #[validate(length(max = 20))]
    pub purchase_unit: Option<String>,
    #[validate(length(min = 3, max = 3))]
    pub currency: Option<String>,
    #[validate(range(min = 0.0))]
    pub shipping_cost: Option<f64>,
}

/// DTO for updating an existing ingredient's descriptive fields
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, Default, TS)]
#[ts(export)]
pub struct UpdateIngredient {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 255))]
    pub inci_name: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 100))]
    pub phase: Option<String>,
    #[validate(length(max = 100))]
    pub function: Option<String>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub max_percentage: Option<f64>,
    pub is_premium: Option<bool>,
    pub is_professional: Option<bool>,
}

/// DTO for a partial cost update
///
/// Only the provided fields are applied; the cost-per-gram cache is
/// recomputed when any purchase field is present.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, Default, TS)]
#[ts(export)]
pub struct UpdateIngredientCost {
    #[validate(range(min = 0.0))]
    pub purchase_cost: Option<f64>,
    #[validate(range(min = 0.0))]
    pub purchase_quantity: Option<f64>,
    #[validate(length(max = 20))]
    pub purchase_unit: Option<String>,
    #[validate(length(min = 3, max = 3))]
    pub currency: Option<String>,
    #[validate(range(min = 0.0))]
    pub shipping_cost: Option<f64>,
}

impl UpdateIngredientCost {
    /// Whether the update touches any of the purchase fields that feed the
    /// cost-per-gram cache
    pub fn touches_purchase_data(&self) -> bool {
        self.purchase_cost.is_some()
            || self.purchase_quantity.is_some()
            || self.purchase_unit.is_some()
    }
}

/// Query filters for listing ingredients
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, IntoParams, Default)]
pub struct IngredientFilter {
    /// Subscription tier; restricts premium/professional ingredients
    pub tier: Option<Tier>,
    /// Exact phase label match
    pub phase: Option<String>,
    /// Substring match on the function label
    pub function: Option<String>,
    /// Substring match on name or INCI name
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    200
}

/// Cost of one ingredient expressed per common display units
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct CostPerUnit {
    pub per_gram: f64,
    pub per_oz: f64,
    pub per_kg: f64,
    pub per_lb: f64,
    /// Currency the values are denominated in
    pub currency: String,
}
