use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = Result<T, FormulaError>;

/// Errors that can occur in the formulas domain
#[derive(Debug, Error)]
pub enum FormulaError {
    /// Formula not found
    #[error("Formula not found: {0}")]
    NotFound(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Error from the ingredients domain
    #[error("Ingredient error: {0}")]
    Ingredient(#[from] domain_ingredients::IngredientError),

    /// Error from the currency domain
    #[error("Currency error: {0}")]
    Currency(#[from] domain_currency::CurrencyError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for FormulaError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            FormulaError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            FormulaError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            FormulaError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),
            FormulaError::Ingredient(_) | FormulaError::Currency(_) | FormulaError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}
