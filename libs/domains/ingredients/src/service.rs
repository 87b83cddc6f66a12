use std::sync::Arc;

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::costing;
use crate::error::{IngredientError, IngredientResult};
use crate::models::{
    CostPerUnit, CreateIngredient, Ingredient, IngredientFilter, UpdateIngredient,
    UpdateIngredientCost,
};
use crate::repository::IngredientRepository;

/// Service for managing ingredients and their cost data
#[derive(Clone)]
pub struct IngredientService<R: IngredientRepository> {
    repository: Arc<R>,
}

impl<R: IngredientRepository> IngredientService<R> {
    /// Create a new ingredient service
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Access the underlying repository (shared with sibling engines)
    pub fn repository(&self) -> Arc<R> {
        Arc::clone(&self.repository)
    }

    /// Create a new ingredient
    pub async fn create(&self, input: CreateIngredient) -> IngredientResult<Ingredient> {
        self.repository.create(input).await
    }

    /// Get an ingredient by ID
    pub async fn get_by_id(&self, id: Uuid) -> IngredientResult<Ingredient> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| IngredientError::NotFound(id.to_string()))
    }

    /// List ingredients with filters
    pub async fn list(&self, filter: IngredientFilter) -> IngredientResult<Vec<Ingredient>> {
        self.repository.list(filter).await
    }

    /// Update an ingredient's descriptive fields
    pub async fn update(&self, id: Uuid, input: UpdateIngredient) -> IngredientResult<Ingredient> {
        self.repository.update(id, input).await
    }

    /// Delete an ingredient
    pub async fn delete(&self, id: Uuid) -> IngredientResult<bool> {
        self.repository.delete(id).await
    }

    /// Apply a partial cost update.
    ///
    /// Returns `false` when the ingredient does not exist or the write
    /// fails; callers translate that into a not-found/server-error
    /// distinction. Cost updates never raise.
    pub async fn update_cost(&self, id: Uuid, input: UpdateIngredientCost) -> bool {
        match self.repository.update_cost(id, input).await {
            Ok(_) => true,
            Err(IngredientError::NotFound(_)) => false,
            Err(e) => {
                warn!(ingredient_id = %id, "Cost update failed: {}", e);
                false
            }
        }
    }

    /// Cost of an ingredient per common display units, `None` when no cost
    /// data exists
    pub async fn cost_options(&self, id: Uuid) -> IngredientResult<Option<CostPerUnit>> {
        let ingredient = self.get_by_id(id).await?;
        Ok(costing::cost_per_unit_options(&ingredient, Utc::now()))
    }

    /// Total ingredient count
    pub async fn count(&self) -> IngredientResult<usize> {
        self.repository.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockIngredientRepository;

    fn sample_ingredient(id: Uuid) -> Ingredient {
        let now = Utc::now();
        Ingredient {
            id,
            name: "Niacinamide".to_string(),
            inci_name: Some("Niacinamide".to_string()),
            description: String::new(),
            phase: Some("Cool Down Phase".to_string()),
            function: Some("Active".to_string()),
            max_percentage: Some(5.0),
            is_premium: false,
            is_professional: false,
            purchase_cost: Some(15.0),
            purchase_quantity: Some(50.0),
            purchase_unit: Some("g".to_string()),
            currency: Some("USD".to_string()),
            shipping_cost: None,
            cost_per_gram: Some(0.3),
            cost_per_oz: Some(8.5),
            last_updated_cost: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let mut repo = MockIngredientRepository::new();
        repo.expect_get_by_id().returning(|_| Ok(None));

        let service = IngredientService::new(repo);
        let result = service.get_by_id(Uuid::now_v7()).await;

        assert!(matches!(result, Err(IngredientError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_cost_missing_ingredient_returns_false() {
        let mut repo = MockIngredientRepository::new();
        repo.expect_update_cost()
            .returning(|id, _| Err(IngredientError::NotFound(id.to_string())));

        let service = IngredientService::new(repo);
        let ok = service
            .update_cost(Uuid::now_v7(), UpdateIngredientCost::default())
            .await;

        assert!(!ok);
    }

    #[tokio::test]
    async fn test_update_cost_database_failure_returns_false() {
        let mut repo = MockIngredientRepository::new();
        repo.expect_update_cost().returning(|_, _| {
            Err(IngredientError::Database(sea_orm::DbErr::Custom(
                "write failed".to_string(),
            )))
        });

        let service = IngredientService::new(repo);
        let ok = service
            .update_cost(Uuid::now_v7(), UpdateIngredientCost::default())
            .await;

        assert!(!ok);
    }

    #[tokio::test]
    async fn test_update_cost_success_returns_true() {
        let id = Uuid::now_v7();
        let mut repo = MockIngredientRepository::new();
        repo.expect_update_cost()
            .returning(move |id, _| Ok(sample_ingredient(id)));

        let service = IngredientService::new(repo);
        let ok = service
            .update_cost(
                id,
                UpdateIngredientCost {
                    purchase_cost: Some(20.0),
                    ..Default::default()
                },
            )
            .await;

        assert!(ok);
    }

    #[tokio::test]
    async fn test_cost_options_for_ingredient_with_cache() {
        let id = Uuid::now_v7();
        let mut repo = MockIngredientRepository::new();
        repo.expect_get_by_id()
            .returning(move |id| Ok(Some(sample_ingredient(id))));

        let service = IngredientService::new(repo);
        let options = service.cost_options(id).await.unwrap().unwrap();

        assert!((options.per_gram - 0.3).abs() < 1e-9);
        assert_eq!(options.currency, "USD");
    }
}
