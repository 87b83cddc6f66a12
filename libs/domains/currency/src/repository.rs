use async_trait::async_trait;

use crate::error::CurrencyResult;
use crate::models::{CurrencyRate, UpsertCurrencyRate};

/// Repository trait for the currency rate cache
///
/// Writes are last-writer-wins: a lost update only costs an extra refetch
/// on the next expiry check, never a wrong answer, so no locking is layered
/// on top of the store's single-row atomicity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CurrencyRepository: Send + Sync {
    /// Get an active currency by code (case-insensitive)
    async fn get_by_code(&self, code: &str) -> CurrencyResult<Option<CurrencyRate>>;

    /// List all active currencies
    async fn list_active(&self) -> CurrencyResult<Vec<CurrencyRate>>;

    /// Insert a new currency row or refresh an existing one's rate and
    /// `last_updated` stamp
    async fn upsert_rate(&self, input: UpsertCurrencyRate) -> CurrencyResult<CurrencyRate>;

    /// Mark a currency inactive (currencies are never deleted)
    async fn deactivate(&self, code: &str) -> CurrencyResult<bool>;
}
