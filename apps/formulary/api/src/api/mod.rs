use axum::Router;
use std::sync::Arc;

pub mod health;

use domain_currency::{CurrencyConverter, ExchangeRateApiClient, PgCurrencyRepository};
use domain_formulas::{CostCalculator, FormulaService, PgFormulaRepository};
use domain_formulation::{FormulaComposer, FormulationRules};
use domain_ingredients::{IngredientService, PgIngredientRepository};

/// Creates the API routes without the `/api` prefix (added by
/// `create_router`).
///
/// Each domain router applies its own state; only cheap Arc clones remain
/// when the routers extract their services.
pub fn routes(state: &crate::state::AppState) -> Router {
    let db = state.db.clone();

    let ingredient_service = IngredientService::new(PgIngredientRepository::new(db.clone()));
    let formula_service = FormulaService::new(PgFormulaRepository::new(db.clone()));

    let converter = CurrencyConverter::new(
        PgCurrencyRepository::new(db),
        ExchangeRateApiClient::new(state.config.exchange.clone()),
    );

    // The cost engine joins formulas, ingredient cost records, and the
    // currency converter
    let calculator = CostCalculator::new(
        formula_service.repository(),
        ingredient_service.repository(),
        Arc::new(converter.clone()),
    );

    let composer = FormulaComposer::new(
        ingredient_service.repository(),
        Arc::new(FormulationRules::standard()),
    );

    Router::new()
        .nest(
            "/ingredients",
            domain_ingredients::handlers::router(ingredient_service),
        )
        .nest(
            "/formulas",
            domain_formulas::handlers::router(formula_service, calculator),
        )
        .nest("/currencies", domain_currency::handlers::router(converter))
        .nest(
            "/formulation",
            domain_formulation::handlers::router(composer),
        )
        .layer(axum::middleware::from_fn(
            observability::middleware::metrics_middleware,
        ))
}

/// Creates a router with the /ready endpoint performing real health
/// checks.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
