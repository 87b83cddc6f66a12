//! HTTP handlers for the currency domain

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use axum_helpers::errors::responses::{InternalServerErrorResponse, NotFoundResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::error::{CurrencyError, CurrencyResult};
use crate::models::{CurrencyRate, RateQuote, RateSource};
use crate::rates_client::ExchangeRateApi;
use crate::repository::CurrencyRepository;
use crate::service::{CurrencyConverter, RefreshSummary};

pub const TAG: &str = "currencies";

/// OpenAPI documentation for the currency API
#[derive(OpenApi)]
#[openapi(
    paths(list_currencies, convert_amount, refresh_rates, deactivate_currency),
    components(
        schemas(
            CurrencyRate,
            RateQuote,
            RateSource,
            ConvertQuery,
            ConversionResponse,
            RefreshSummary,
        ),
        responses(InternalServerErrorResponse, NotFoundResponse)
    ),
    tags(
        (name = TAG, description = "Currency cache and conversion endpoints")
    )
)]
pub struct ApiDoc;

/// Create the currency router with all HTTP endpoints
pub fn router<R, A>(converter: CurrencyConverter<R, A>) -> Router
where
    R: CurrencyRepository + 'static,
    A: ExchangeRateApi + 'static,
{
    let shared = Arc::new(converter);

    Router::new()
        .route("/", get(list_currencies))
        .route("/convert", get(convert_amount))
        .route("/refresh", post(refresh_rates))
        .route("/{code}", delete(deactivate_currency))
        .with_state(shared)
}

/// Query parameters for a conversion
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct ConvertQuery {
    /// Amount in the source currency
    pub amount: f64,
    /// Source currency code
    pub from: String,
    /// Target currency code (defaults to USD)
    #[serde(default = "default_target")]
    pub to: String,
}

fn default_target() -> String {
    "USD".to_string()
}

/// Result of a currency conversion
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConversionResponse {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub rate: f64,
    pub converted: f64,
    /// How the rate was resolved; `fallback` marks the 1.0 last resort
    pub source: RateSource,
}

/// List active currencies
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "Active currencies", body = Vec<CurrencyRate>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_currencies<R, A>(
    State(converter): State<Arc<CurrencyConverter<R, A>>>,
) -> CurrencyResult<Json<Vec<CurrencyRate>>>
where
    R: CurrencyRepository + 'static,
    A: ExchangeRateApi + 'static,
{
    let currencies = converter.supported_currencies().await?;
    Ok(Json(currencies))
}

/// Convert an amount between currencies
#[utoipa::path(
    get,
    path = "/convert",
    tag = TAG,
    params(ConvertQuery),
    responses(
        (status = 200, description = "Conversion result", body = ConversionResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn convert_amount<R, A>(
    State(converter): State<Arc<CurrencyConverter<R, A>>>,
    Query(query): Query<ConvertQuery>,
) -> CurrencyResult<Json<ConversionResponse>>
where
    R: CurrencyRepository + 'static,
    A: ExchangeRateApi + 'static,
{
    let quote = converter.quote(&query.from, &query.to).await?;

    Ok(Json(ConversionResponse {
        amount: query.amount,
        from: query.from.to_uppercase(),
        to: query.to.to_uppercase(),
        rate: quote.rate,
        converted: query.amount * quote.rate,
        source: quote.source,
    }))
}

/// Refresh every active currency's USD rate from the external provider
#[utoipa::path(
    post,
    path = "/refresh",
    tag = TAG,
    responses(
        (status = 200, description = "Refresh summary", body = RefreshSummary),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn refresh_rates<R, A>(
    State(converter): State<Arc<CurrencyConverter<R, A>>>,
) -> CurrencyResult<Json<RefreshSummary>>
where
    R: CurrencyRepository + 'static,
    A: ExchangeRateApi + 'static,
{
    let summary = converter.refresh_all().await?;
    observability::CostingMetrics::record_refresh(summary.refreshed, summary.failed);
    Ok(Json(summary))
}

/// Deactivate a currency. Rows are hidden from lookups, never deleted.
#[utoipa::path(
    delete,
    path = "/{code}",
    tag = TAG,
    params(
        ("code" = String, Path, description = "3-letter currency code")
    ),
    responses(
        (status = 204, description = "Currency deactivated"),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn deactivate_currency<R, A>(
    State(converter): State<Arc<CurrencyConverter<R, A>>>,
    Path(code): Path<String>,
) -> CurrencyResult<impl IntoResponse>
where
    R: CurrencyRepository + 'static,
    A: ExchangeRateApi + 'static,
{
    if converter.deactivate(&code).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CurrencyError::NotFound(code))
    }
}
