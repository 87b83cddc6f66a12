use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

/// Sea-ORM Entity for the ingredients table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ingredients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "String(StringLen::N(255))")]
    pub name: String,
    #[sea_orm(column_type = "String(StringLen::N(255))", nullable)]
    pub inci_name: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "String(StringLen::N(100))", nullable)]
    pub phase: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(100))", nullable)]
    pub function: Option<String>,
    pub max_percentage: Option<f64>,
    pub is_premium: bool,
    pub is_professional: bool,
    pub purchase_cost: Option<f64>,
    pub purchase_quantity: Option<f64>,
    #[sea_orm(column_type = "String(StringLen::N(20))", nullable)]
    pub purchase_unit: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(3))", nullable)]
    pub currency: Option<String>,
    pub shipping_cost: Option<f64>,
    /// Cached standardized cost, refreshed on cost updates
    pub cost_per_gram: Option<f64>,
    pub cost_per_oz: Option<f64>,
    pub last_updated_cost: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// Conversion from Sea-ORM Model to domain Ingredient
impl From<Model> for crate::models::Ingredient {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            inci_name: model.inci_name,
            description: model.description,
            phase: model.phase,
            function: model.function,
            max_percentage: model.max_percentage,
            is_premium: model.is_premium,
            is_professional: model.is_professional,
            purchase_cost: model.purchase_cost,
            purchase_quantity: model.purchase_quantity,
            purchase_unit: model.purchase_unit,
            currency: model.currency,
            shipping_cost: model.shipping_cost,
            cost_per_gram: model.cost_per_gram,
            cost_per_oz: model.cost_per_oz,
            last_updated_cost: model.last_updated_cost.map(Into::into),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

// Conversion from domain CreateIngredient to Sea-ORM ActiveModel
impl From<crate::models::CreateIngredient> for ActiveModel {
    fn from(input: crate::models::CreateIngredient) -> Self {
        let now = chrono::Utc::now();

        // Seed the cost cache when a complete purchase record is supplied
        let cost_per_gram = match (
            input.purchase_cost,
            input.purchase_quantity,
            input.purchase_unit.as_deref(),
        ) {
            (Some(cost), Some(quantity), Some(unit)) => {
                let grams = crate::units::to_grams(quantity, unit);
                (grams > 0.0)
                    .then(|| (cost + input.shipping_cost.unwrap_or(0.0)) / grams)
            }
            _ => None,
        };

        ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name),
            inci_name: Set(input.inci_name),
            description: Set(input.description),
            phase: Set(input.phase),
            function: Set(input.function),
            max_percentage: Set(input.max_percentage),
            is_premium: Set(input.is_premium),
            is_professional: Set(input.is_professional),
            purchase_cost: Set(input.purchase_cost),
            purchase_quantity: Set(input.purchase_quantity),
            purchase_unit: Set(input.purchase_unit),
            currency: Set(input.currency.map(|c| c.to_uppercase())),
            shipping_cost: Set(input.shipping_cost),
            cost_per_gram: Set(cost_per_gram),
            cost_per_oz: Set(cost_per_gram.map(|v| v * crate::units::GRAMS_PER_OUNCE)),
            last_updated_cost: Set(cost_per_gram.map(|_| now.into())),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }
}
