use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A cached exchange rate for one currency, anchored to USD.
///
/// `rate_to_usd` multiplies a local amount into USD: 100 EUR at a rate of
/// 0.85 converts to 85 USD.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct CurrencyRate {
    /// Unique identifier
    #[ts(as = "String")]
    pub id: Uuid,
    /// 3-letter currency code (uppercase)
    pub code: String,
    /// Display name (e.g., "Euro")
    pub name: String,
    /// Display symbol (e.g., "€")
    pub symbol: String,
    /// Multiplier taking a local amount into USD
    pub rate_to_usd: f64,
    /// Inactive currencies are hidden from lookups but never deleted
    pub is_active: bool,
    /// When the rate was last refreshed
    #[ts(as = "String")]
    pub last_updated: DateTime<Utc>,
    /// Creation timestamp
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// DTO for inserting or refreshing a currency's USD rate
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, TS)]
#[ts(export)]
pub struct UpsertCurrencyRate {
    #[validate(length(min = 3, max = 3))]
    pub code: String,
    pub rate_to_usd: f64,
}

/// How an exchange rate was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RateSource {
    /// Same-currency conversion, no lookup performed
    Identity,
    /// Fresh cached rate (within the 24h window)
    Cache,
    /// Fetched from the external rate API
    Fetched,
    /// Expired cached rate used after an external failure
    StaleCache,
    /// No rate available anywhere; 1.0 substituted
    Fallback,
}

/// An exchange rate together with its provenance.
///
/// Callers that care whether a rate is real or the 1.0 last resort inspect
/// `source` instead of guessing from the value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct RateQuote {
    pub rate: f64,
    pub source: RateSource,
}

/// Display name for a currency code, for rows created on first lookup miss
pub fn currency_name(code: &str) -> String {
    let name = match code.to_uppercase().as_str() {
        "USD" => "US Dollar",
        "EUR" => "Euro",
        "GBP" => "British Pound",
        "CAD" => "Canadian Dollar",
        "AUD" => "Australian Dollar",
        "JPY" => "Japanese Yen",
        "CHF" => "Swiss Franc",
        "CNY" => "Chinese Yuan",
        "INR" => "Indian Rupee",
        "BRL" => "Brazilian Real",
        "MXN" => "Mexican Peso",
        "ZAR" => "South African Rand",
        "SEK" => "Swedish Krona",
        "NOK" => "Norwegian Krone",
        "DKK" => "Danish Krone",
        "PLN" => "Polish Zloty",
        "CZK" => "Czech Koruna",
        "HUF" => "Hungarian Forint",
        "TRY" => "Turkish Lira",
        "KRW" => "South Korean Won",
        "SGD" => "Singapore Dollar",
        "HKD" => "Hong Kong Dollar",
        "NZD" => "New Zealand Dollar",
        "THB" => "Thai Baht",
        "MYR" => "Malaysian Ringgit",
        "PHP" => "Philippine Peso",
        "IDR" => "Indonesian Rupiah",
        "VND" => "Vietnamese Dong",
        _ => return format!("{} Currency", code.to_uppercase()),
    };
    name.to_string()
}

/// Display symbol for a currency code
pub fn currency_symbol(code: &str) -> String {
    let symbol = match code.to_uppercase().as_str() {
        "USD" | "MXN" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "CAD" => "C$",
        "AUD" => "A$",
        "JPY" | "CNY" => "¥",
        "CHF" => "CHF",
        "INR" => "₹",
        "BRL" => "R$",
        "ZAR" => "R",
        "SEK" | "NOK" | "DKK" => "kr",
        "PLN" => "zł",
        "CZK" => "Kč",
        "HUF" => "Ft",
        "TRY" => "₺",
        "KRW" => "₩",
        "SGD" => "S$",
        "HKD" => "HK$",
        "NZD" => "NZ$",
        "THB" => "฿",
        "MYR" => "RM",
        "PHP" => "₱",
        "IDR" => "Rp",
        "VND" => "₫",
        _ => return code.to_uppercase(),
    };
    symbol.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_currency_name_and_symbol() {
        assert_eq!(currency_name("eur"), "Euro");
        assert_eq!(currency_symbol("EUR"), "€");
    }

    #[test]
    fn test_unknown_currency_falls_back_to_code() {
        assert_eq!(currency_name("xyz"), "XYZ Currency");
        assert_eq!(currency_symbol("xyz"), "XYZ");
    }

    #[test]
    fn test_rate_source_serializes_snake_case() {
        assert_eq!(RateSource::StaleCache.to_string(), "stale_cache");
    }
}
