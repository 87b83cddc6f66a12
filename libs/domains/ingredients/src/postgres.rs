use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::costing;
use crate::entity::{ActiveModel, Column, Entity};
use crate::error::{IngredientError, IngredientResult};
use crate::models::{
    CreateIngredient, Ingredient, IngredientFilter, Tier, UpdateIngredient, UpdateIngredientCost,
};
use crate::repository::IngredientRepository;
use crate::units::GRAMS_PER_OUNCE;

/// PostgreSQL implementation of IngredientRepository
#[derive(Clone)]
pub struct PgIngredientRepository {
    db: DatabaseConnection,
}

impl PgIngredientRepository {
    /// Create a new PostgreSQL ingredient repository
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IngredientRepository for PgIngredientRepository {
    async fn create(&self, input: CreateIngredient) -> IngredientResult<Ingredient> {
        let model: ActiveModel = input.into();
        let result = model.insert(&self.db).await?.into();
        Ok(result)
    }

    async fn get_by_id(&self, id: Uuid) -> IngredientResult<Option<Ingredient>> {
        let result = Entity::find_by_id(id).one(&self.db).await?.map(Into::into);
        Ok(result)
    }

    async fn get_many(&self, ids: Vec<Uuid>) -> IngredientResult<Vec<Ingredient>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = Entity::find()
            .filter(Column::Id.is_in(ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(results)
    }

    async fn list(&self, filter: IngredientFilter) -> IngredientResult<Vec<Ingredient>> {
        let mut query = Entity::find();

        // Tier filtering: free sees neither flag, premium sees non-professional
        match filter.tier {
            Some(Tier::Free) => {
                query = query
                    .filter(Column::IsPremium.eq(false))
                    .filter(Column::IsProfessional.eq(false));
            }
            Some(Tier::Premium) => {
                query = query.filter(Column::IsProfessional.eq(false));
            }
            Some(Tier::Professional) | None => {}
        }

        if let Some(phase) = filter.phase {
            query = query.filter(Column::Phase.eq(phase));
        }

        if let Some(function) = filter.function {
            query = query.filter(Column::Function.contains(&function));
        }

        if let Some(search) = filter.search {
            query = query.filter(
                Condition::any()
                    .add(Column::Name.contains(&search))
                    .add(Column::InciName.contains(&search)),
            );
        }

        let results = query
            .order_by_asc(Column::Name)
            .offset(filter.offset as u64)
            .limit(filter.limit as u64)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(results)
    }

    async fn update(&self, id: Uuid, input: UpdateIngredient) -> IngredientResult<Ingredient> {
        let existing = Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| IngredientError::NotFound(id.to_string()))?;

        let mut model: ActiveModel = existing.into();

        if let Some(name) = input.name {
            model.name = Set(name);
        }

        if let Some(inci_name) = input.inci_name {
            model.inci_name = Set(Some(inci_name));
        }

        if let Some(description) = input.description {
            model.description = Set(description);
        }

        if let Some(phase) = input.phase {
            model.phase = Set(Some(phase));
        }

        if let Some(function) = input.function {
            model.function = Set(Some(function));
        }

        if let Some(max_percentage) = input.max_percentage {
            model.max_percentage = Set(Some(max_percentage));
        }

        if let Some(is_premium) = input.is_premium {
            model.is_premium = Set(is_premium);
        }

        if let Some(is_professional) = input.is_professional {
            model.is_professional = Set(is_professional);
        }

        model.updated_at = Set(chrono::Utc::now().into());

        let result = model.update(&self.db).await?.into();
        Ok(result)
    }

    async fn update_cost(
        &self,
        id: Uuid,
        input: UpdateIngredientCost,
    ) -> IngredientResult<Ingredient> {
        let existing = Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| IngredientError::NotFound(id.to_string()))?;

        let recompute = input.touches_purchase_data();
        let now = chrono::Utc::now();

        // Apply the partial update to a domain copy first so the cache can
        // be re-derived from the patched purchase record.
        let mut patched: Ingredient = existing.clone().into();
        if let Some(purchase_cost) = input.purchase_cost {
            patched.purchase_cost = Some(purchase_cost);
        }
        if let Some(purchase_quantity) = input.purchase_quantity {
            patched.purchase_quantity = Some(purchase_quantity);
        }
        if let Some(purchase_unit) = input.purchase_unit {
            patched.purchase_unit = Some(purchase_unit);
        }
        if let Some(currency) = input.currency {
            patched.currency = Some(currency.to_uppercase());
        }
        if let Some(shipping_cost) = input.shipping_cost {
            patched.shipping_cost = Some(shipping_cost);
        }

        let mut model: ActiveModel = existing.into();
        model.purchase_cost = Set(patched.purchase_cost);
        model.purchase_quantity = Set(patched.purchase_quantity);
        model.purchase_unit = Set(patched.purchase_unit.clone());
        model.currency = Set(patched.currency.clone());
        model.shipping_cost = Set(patched.shipping_cost);

        if recompute {
            if let Some(per_gram) = costing::purchase_cost_per_gram(&patched) {
                model.cost_per_gram = Set(Some(per_gram));
                model.cost_per_oz = Set(Some(per_gram * GRAMS_PER_OUNCE));
            }
        }

        model.last_updated_cost = Set(Some(now.into()));
        model.updated_at = Set(now.into());

        let result = model.update(&self.db).await?.into();
        Ok(result)
    }

    async fn delete(&self, id: Uuid) -> IngredientResult<bool> {
        let result = Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn count(&self) -> IngredientResult<usize> {
        let count = Entity::find().count(&self.db).await?;
        Ok(count as usize)
    }
}
