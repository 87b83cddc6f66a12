use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

/// Sea-ORM Entity for the currencies table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "currencies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "String(StringLen::N(3))", unique)]
    pub code: String,
    #[sea_orm(column_type = "String(StringLen::N(100))")]
    pub name: String,
    #[sea_orm(column_type = "String(StringLen::N(8))")]
    pub symbol: String,
    /// Multiplier taking a local amount into USD
    pub rate_to_usd: f64,
    pub is_active: bool,
    pub last_updated: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// Conversion from Sea-ORM Model to domain CurrencyRate
impl From<Model> for crate::models::CurrencyRate {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            name: model.name,
            symbol: model.symbol,
            rate_to_usd: model.rate_to_usd,
            is_active: model.is_active,
            last_updated: model.last_updated.into(),
            created_at: model.created_at.into(),
        }
    }
}

// Conversion from domain UpsertCurrencyRate to a fresh ActiveModel
impl From<crate::models::UpsertCurrencyRate> for ActiveModel {
    fn from(input: crate::models::UpsertCurrencyRate) -> Self {
        let now = chrono::Utc::now();
        let code = input.code.to_uppercase();

        ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(crate::models::currency_name(&code)),
            symbol: Set(crate::models::currency_symbol(&code)),
            code: Set(code),
            rate_to_usd: Set(input.rate_to_usd),
            is_active: Set(true),
            last_updated: Set(now.into()),
            created_at: Set(now.into()),
        }
    }
}
