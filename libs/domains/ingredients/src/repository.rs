use async_trait::async_trait;
use uuid::Uuid;

use crate::error::IngredientResult;
use crate::models::{
    CreateIngredient, Ingredient, IngredientFilter, UpdateIngredient, UpdateIngredientCost,
};

/// Repository trait for Ingredient persistence
///
/// This trait defines the data access interface for ingredient data.
/// Implementations can use different storage backends (PostgreSQL, etc.)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngredientRepository: Send + Sync {
    /// Create a new ingredient
    async fn create(&self, input: CreateIngredient) -> IngredientResult<Ingredient>;

    /// Get an ingredient by ID
    async fn get_by_id(&self, id: Uuid) -> IngredientResult<Option<Ingredient>>;

    /// Get several ingredients by ID, preserving only the ones that exist
    async fn get_many(&self, ids: Vec<Uuid>) -> IngredientResult<Vec<Ingredient>>;

    /// List ingredients with optional filters
    async fn list(&self, filter: IngredientFilter) -> IngredientResult<Vec<Ingredient>>;

    /// Update an ingredient's descriptive fields
    async fn update(&self, id: Uuid, input: UpdateIngredient) -> IngredientResult<Ingredient>;

    /// Apply a partial cost update, recomputing the cost-per-gram cache
    /// when purchase fields changed and stamping `last_updated_cost`
    async fn update_cost(
        &self,
        id: Uuid,
        input: UpdateIngredientCost,
    ) -> IngredientResult<Ingredient>;

    /// Delete an ingredient by ID
    async fn delete(&self, id: Uuid) -> IngredientResult<bool>;

    /// Count all ingredients
    async fn count(&self) -> IngredientResult<usize>;
}
