use utoipa::OpenApi;

/// Combined OpenAPI document for every domain router.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Formulary API",
        description = "Cosmetic formulation backend: ingredient catalog, formulas, batch costing, currency conversion, and rule-based composition"
    ),
    nest(
        (path = "/api/ingredients", api = domain_ingredients::handlers::ApiDoc),
        (path = "/api/formulas", api = domain_formulas::handlers::ApiDoc),
        (path = "/api/currencies", api = domain_currency::handlers::ApiDoc),
        (path = "/api/formulation", api = domain_formulation::handlers::ApiDoc),
    )
)]
pub struct ApiDoc;
