use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type for formulation operations
pub type FormulationResult<T> = Result<T, FormulationError>;

/// Errors that can occur in the formulation domain
#[derive(Debug, Error)]
pub enum FormulationError {
    /// Product type absent from the rule table; composition fails fast
    #[error("Unsupported product type: {0}")]
    UnsupportedProductType(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error from the ingredients domain
    #[error("Ingredient error: {0}")]
    Ingredient(#[from] domain_ingredients::IngredientError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for FormulationError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            FormulationError::UnsupportedProductType(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            FormulationError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            FormulationError::Ingredient(_) | FormulationError::Internal(_) => (
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
