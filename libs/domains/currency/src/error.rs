use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type for currency operations
pub type CurrencyResult<T> = Result<T, CurrencyError>;

/// Errors that can occur in the currency domain
#[derive(Debug, Error)]
pub enum CurrencyError {
    /// Currency not found
    #[error("Currency not found: {0}")]
    NotFound(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// External rate API failure
    #[error("Exchange rate API error: {0}")]
    Api(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for CurrencyError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CurrencyError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            CurrencyError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            CurrencyError::Api(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            CurrencyError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),
            CurrencyError::Internal(_) => (
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
