use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entity::{ActiveModel, Column, Entity};
use crate::error::CurrencyResult;
use crate::models::{CurrencyRate, UpsertCurrencyRate};
use crate::repository::CurrencyRepository;

/// PostgreSQL implementation of CurrencyRepository
#[derive(Clone)]
pub struct PgCurrencyRepository {
    db: DatabaseConnection,
}

impl PgCurrencyRepository {
    /// Create a new PostgreSQL currency repository
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_by_code(&self, code: &str) -> CurrencyResult<Option<crate::entity::Model>> {
        let result = Entity::find()
            .filter(Column::Code.eq(code.to_uppercase()))
            .one(&self.db)
            .await?;
        Ok(result)
    }
}

#[async_trait]
impl CurrencyRepository for PgCurrencyRepository {
    async fn get_by_code(&self, code: &str) -> CurrencyResult<Option<CurrencyRate>> {
        let result = Entity::find()
            .filter(Column::Code.eq(code.to_uppercase()))
            .filter(Column::IsActive.eq(true))
            .one(&self.db)
            .await?
            .map(Into::into);
        Ok(result)
    }

    async fn list_active(&self) -> CurrencyResult<Vec<CurrencyRate>> {
        let results = Entity::find()
            .filter(Column::IsActive.eq(true))
            .order_by_asc(Column::Code)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        Ok(results)
    }

    async fn upsert_rate(&self, input: UpsertCurrencyRate) -> CurrencyResult<CurrencyRate> {
        // Inactive rows are refreshed too; deactivation is a display
        // concern, not a staleness marker.
        if let Some(existing) = self.find_by_code(&input.code).await? {
            let mut model: ActiveModel = existing.into();
            model.rate_to_usd = Set(input.rate_to_usd);
            model.last_updated = Set(chrono::Utc::now().into());
            let result = model.update(&self.db).await?.into();
            return Ok(result);
        }

        let model: ActiveModel = input.into();
        let result = model.insert(&self.db).await?.into();
        Ok(result)
    }

    async fn deactivate(&self, code: &str) -> CurrencyResult<bool> {
        let Some(existing) = self.find_by_code(code).await? else {
            return Ok(false);
        };

        let mut model: ActiveModel = existing.into();
        model.is_active = Set(false);
        model.update(&self.db).await?;
        Ok(true)
    }
}
