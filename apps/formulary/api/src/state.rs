//! Application state shared with request handlers.

use database::postgres::DatabaseConnection;

/// Shared application state.
///
/// Cloned per handler; the database connection is an inexpensive
/// Arc-backed pool handle.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: DatabaseConnection,
}
