use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::{formula, formula_ingredient, formula_step};
use crate::error::{FormulaError, FormulaResult};
use crate::models::{
    CreateFormula, Formula, FormulaFilter, FormulaIngredient, FormulaStep, UpdateFormula,
};
use crate::repository::FormulaRepository;

/// PostgreSQL implementation of FormulaRepository
#[derive(Clone)]
pub struct PgFormulaRepository {
    db: DatabaseConnection,
}

impl PgFormulaRepository {
    /// Create a new PostgreSQL formula repository
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FormulaRepository for PgFormulaRepository {
    async fn create(&self, input: CreateFormula) -> FormulaResult<Formula> {
        let txn = self.db.begin().await?;

        let header: formula::ActiveModel = (&input).into();
        let created = header.insert(&txn).await?;

        if !input.ingredients.is_empty() {
            let rows = input.ingredients.iter().map(|assoc| {
                formula_ingredient::ActiveModel {
                    formula_id: Set(created.id),
                    ingredient_id: Set(assoc.ingredient_id),
                    percentage: Set(assoc.percentage),
                    sort_order: Set(assoc.sort_order),
                }
            });
            formula_ingredient::Entity::insert_many(rows)
                .exec(&txn)
                .await?;
        }

        if !input.steps.is_empty() {
            let rows = input.steps.iter().map(|step| formula_step::ActiveModel {
                formula_id: Set(created.id),
                sort_order: Set(step.sort_order),
                description: Set(step.description.clone()),
            });
            formula_step::Entity::insert_many(rows).exec(&txn).await?;
        }

        txn.commit().await?;
        Ok(created.into())
    }

    async fn get_by_id(&self, id: Uuid) -> FormulaResult<Option<Formula>> {
        let result = formula::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Into::into);
        Ok(result)
    }

    async fn list(&self, filter: FormulaFilter) -> FormulaResult<Vec<Formula>> {
        let mut query = formula::Entity::find();

        if let Some(product_type) = filter.product_type {
            query = query.filter(formula::Column::ProductType.eq(product_type));
        }

        if let Some(search) = filter.search {
            query = query.filter(formula::Column::Name.contains(&search));
        }

        let results = query
            .order_by_desc(formula::Column::UpdatedAt)
            .offset(filter.offset as u64)
            .limit(filter.limit as u64)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(results)
    }

    async fn update(&self, id: Uuid, input: UpdateFormula) -> FormulaResult<Formula> {
        let existing = formula::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| FormulaError::NotFound(id.to_string()))?;

        let mut model: formula::ActiveModel = existing.into();

        if let Some(name) = input.name {
            model.name = Set(name);
        }

        if let Some(description) = input.description {
            model.description = Set(description);
        }

        if let Some(batch_size) = input.batch_size {
            model.batch_size = Set(Some(batch_size));
        }

        if let Some(batch_unit) = input.batch_unit {
            model.batch_unit = Set(Some(batch_unit));
        }

        if let Some(is_public) = input.is_public {
            model.is_public = Set(is_public);
        }

        model.updated_at = Set(chrono::Utc::now().into());

        let result = model.update(&self.db).await?.into();
        Ok(result)
    }

    async fn delete(&self, id: Uuid) -> FormulaResult<bool> {
        let result = formula::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn ingredient_associations(
        &self,
        formula_id: Uuid,
    ) -> FormulaResult<Vec<FormulaIngredient>> {
        let results = formula_ingredient::Entity::find()
            .filter(formula_ingredient::Column::FormulaId.eq(formula_id))
            .order_by_asc(formula_ingredient::Column::SortOrder)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(results)
    }

    async fn steps(&self, formula_id: Uuid) -> FormulaResult<Vec<FormulaStep>> {
        let results = formula_step::Entity::find()
            .filter(formula_step::Column::FormulaId.eq(formula_id))
            .order_by_asc(formula_step::Column::SortOrder)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(results)
    }
}
