use async_trait::async_trait;
use uuid::Uuid;

use crate::error::FormulaResult;
use crate::models::{
    CreateFormula, Formula, FormulaFilter, FormulaIngredient, FormulaStep, UpdateFormula,
};

/// Repository trait for Formula persistence
///
/// Creation writes the formula header plus its ingredient and step
/// associations atomically.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormulaRepository: Send + Sync {
    /// Create a formula together with its associations
    async fn create(&self, input: CreateFormula) -> FormulaResult<Formula>;

    /// Get a formula header by ID
    async fn get_by_id(&self, id: Uuid) -> FormulaResult<Option<Formula>>;

    /// List formulas with optional filters
    async fn list(&self, filter: FormulaFilter) -> FormulaResult<Vec<Formula>>;

    /// Update a formula's header fields
    async fn update(&self, id: Uuid, input: UpdateFormula) -> FormulaResult<Formula>;

    /// Delete a formula (associations cascade)
    async fn delete(&self, id: Uuid) -> FormulaResult<bool>;

    /// Ordered ingredient associations for a formula
    async fn ingredient_associations(&self, formula_id: Uuid)
        -> FormulaResult<Vec<FormulaIngredient>>;

    /// Ordered manufacturing steps for a formula
    async fn steps(&self, formula_id: Uuid) -> FormulaResult<Vec<FormulaStep>>;
}
