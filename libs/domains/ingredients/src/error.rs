use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type for ingredient operations
pub type IngredientResult<T> = Result<T, IngredientError>;

/// Errors that can occur in the ingredients domain
#[derive(Debug, Error)]
pub enum IngredientError {
    /// Ingredient not found
    #[error("Ingredient not found: {0}")]
    NotFound(String),

    /// Duplicate ingredient name
    #[error("Duplicate ingredient: {0}")]
    Duplicate(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for IngredientError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            IngredientError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            IngredientError::Duplicate(_) => (StatusCode::CONFLICT, self.to_string()),
            IngredientError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            IngredientError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),
            IngredientError::Internal(_) => (
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
