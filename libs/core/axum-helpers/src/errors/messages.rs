//! Standard error messages for consistent error responses.

pub const VALIDATION_FAILED: &str = "Request validation failed";
pub const INVALID_UUID: &str = "Invalid UUID format";
pub const NOT_FOUND_RESOURCE: &str = "Requested resource was not found";
pub const INTERNAL_ERROR: &str = "An unexpected error occurred";
pub const DB_ERROR: &str = "A database error occurred";
