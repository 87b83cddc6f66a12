use std::sync::Arc;

use uuid::Uuid;

use crate::error::{FormulaError, FormulaResult};
use crate::models::{
    normalize_percentages, CreateFormula, Formula, FormulaFilter, FormulaIngredient, FormulaStep,
    UpdateFormula,
};
use crate::repository::FormulaRepository;

/// Service for managing formulas
#[derive(Clone)]
pub struct FormulaService<R: FormulaRepository> {
    repository: Arc<R>,
}

impl<R: FormulaRepository> FormulaService<R> {
    /// Create a new formula service
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Access the underlying repository (shared with the cost engine)
    pub fn repository(&self) -> Arc<R> {
        Arc::clone(&self.repository)
    }

    /// Create a formula. Association percentages drifting from a 100 sum
    /// beyond the tolerance are proportionally renormalized before the
    /// write.
    pub async fn create(&self, mut input: CreateFormula) -> FormulaResult<Formula> {
        normalize_percentages(&mut input.ingredients);
        self.repository.create(input).await
    }

    /// Get a formula by ID
    pub async fn get_by_id(&self, id: Uuid) -> FormulaResult<Formula> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| FormulaError::NotFound(id.to_string()))
    }

    /// List formulas with filters
    pub async fn list(&self, filter: FormulaFilter) -> FormulaResult<Vec<Formula>> {
        self.repository.list(filter).await
    }

    /// Update a formula's header fields
    pub async fn update(&self, id: Uuid, input: UpdateFormula) -> FormulaResult<Formula> {
        self.repository.update(id, input).await
    }

    /// Delete a formula
    pub async fn delete(&self, id: Uuid) -> FormulaResult<bool> {
        self.repository.delete(id).await
    }

    /// Ordered ingredient associations for a formula
    pub async fn ingredient_associations(&self, id: Uuid) -> FormulaResult<Vec<FormulaIngredient>> {
        self.repository.ingredient_associations(id).await
    }

    /// Ordered manufacturing steps for a formula
    pub async fn steps(&self, id: Uuid) -> FormulaResult<Vec<FormulaStep>> {
        self.repository.steps(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockFormulaRepository;
    use chrono::Utc;
    use test_utils::assertions::assert_close;

    fn header(id: Uuid, name: &str) -> Formula {
        let now = Utc::now();
        Formula {
            id,
            name: name.to_string(),
            description: String::new(),
            product_type: "Serum".to_string(),
            batch_size: Some(100.0),
            batch_unit: Some("g".to_string()),
            total_weight: Some(100.0),
            is_public: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_renormalizes_drifting_percentages() {
        let mut repo = MockFormulaRepository::new();
        repo.expect_create()
            .withf(|input| {
                let total: f64 = input.ingredients.iter().map(|i| i.percentage).sum();
                (total - 100.0).abs() <= 0.1
            })
            .returning(|input| {
                let id = Uuid::now_v7();
                Ok(header(id, &input.name))
            });

        let service = FormulaService::new(repo);
        let input = CreateFormula {
            name: "Hydrating Serum".to_string(),
            description: String::new(),
            product_type: "Serum".to_string(),
            batch_size: Some(100.0),
            batch_unit: Some("g".to_string()),
            total_weight: None,
            is_public: false,
            ingredients: vec![
                FormulaIngredient {
                    ingredient_id: Uuid::now_v7(),
                    percentage: 80.0,
                    sort_order: 1,
                },
                FormulaIngredient {
                    ingredient_id: Uuid::now_v7(),
                    percentage: 40.0,
                    sort_order: 2,
                },
            ],
            steps: vec![],
        };

        assert!(service.create(input).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_preserves_compliant_percentages() {
        let mut repo = MockFormulaRepository::new();
        repo.expect_create()
            .withf(|input| {
                assert_close(input.ingredients[0].percentage, 60.0, 1e-9, "kept");
                assert_close(input.ingredients[1].percentage, 39.8, 1e-9, "kept");
                true
            })
            .returning(|input| Ok(header(Uuid::now_v7(), &input.name)));

        let service = FormulaService::new(repo);
        let input = CreateFormula {
            name: "Light Cream".to_string(),
            description: String::new(),
            product_type: "Cream".to_string(),
            batch_size: None,
            batch_unit: None,
            total_weight: None,
            is_public: false,
            ingredients: vec![
                FormulaIngredient {
                    ingredient_id: Uuid::now_v7(),
                    percentage: 60.0,
                    sort_order: 1,
                },
                FormulaIngredient {
                    ingredient_id: Uuid::now_v7(),
                    percentage: 39.8,
                    sort_order: 2,
                },
            ],
            steps: vec![],
        };

        assert!(service.create(input).await.is_ok());
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let mut repo = MockFormulaRepository::new();
        repo.expect_get_by_id().returning(|_| Ok(None));

        let service = FormulaService::new(repo);
        let result = service.get_by_id(Uuid::now_v7()).await;

        assert!(matches!(result, Err(FormulaError::NotFound(_))));
    }
}
