//! HTTP handlers for the formulas domain

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
    UuidPath, ValidatedJson,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi, ToSchema};

use domain_currency::RateProvider;
use domain_ingredients::IngredientRepository;

use crate::cost_calculator::CostCalculator;
use crate::error::FormulaResult;
use crate::models::{
    CreateFormula, Formula, FormulaCostBreakdown, FormulaFilter, FormulaIngredient, FormulaStep,
    IngredientCostLine, UpdateFormula,
};
use crate::repository::FormulaRepository;
use crate::service::FormulaService;

pub const TAG: &str = "formulas";

/// OpenAPI documentation for the formulas API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_formulas,
        create_formula,
        get_formula,
        update_formula,
        delete_formula,
        get_formula_ingredients,
        get_formula_steps,
        get_formula_cost,
    ),
    components(
        schemas(
            Formula,
            CreateFormula,
            UpdateFormula,
            FormulaFilter,
            FormulaIngredient,
            FormulaStep,
            FormulaCostBreakdown,
            IngredientCostLine,
            CostQuery,
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Formula management and batch costing endpoints")
    )
)]
pub struct ApiDoc;

/// Create the formulas router with all HTTP endpoints
pub fn router<F, I, P>(
    service: FormulaService<F>,
    calculator: CostCalculator<F, I, P>,
) -> Router
where
    F: FormulaRepository + 'static,
    I: IngredientRepository + 'static,
    P: RateProvider + 'static,
{
    let shared_service = Arc::new(service);
    let shared_calculator = Arc::new(calculator);

    Router::new()
        .route("/", get(list_formulas).post(create_formula))
        .route(
            "/{id}",
            get(get_formula).put(update_formula).delete(delete_formula),
        )
        .route("/{id}/ingredients", get(get_formula_ingredients))
        .route("/{id}/steps", get(get_formula_steps))
        .with_state(shared_service)
        .route("/{id}/cost", get(get_formula_cost))
        .with_state(shared_calculator)
}

/// List formulas with optional filters
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(FormulaFilter),
    responses(
        (status = 200, description = "List of formulas", body = Vec<Formula>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_formulas<F: FormulaRepository>(
    State(service): State<Arc<FormulaService<F>>>,
    Query(filter): Query<FormulaFilter>,
) -> FormulaResult<Json<Vec<Formula>>> {
    let formulas = service.list(filter).await?;
    Ok(Json(formulas))
}

/// Create a new formula
///
/// Ingredient percentages drifting from a 100 sum beyond the tolerance are
/// proportionally renormalized before the write.
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateFormula,
    responses(
        (status = 201, description = "Formula created successfully", body = Formula),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_formula<F: FormulaRepository>(
    State(service): State<Arc<FormulaService<F>>>,
    ValidatedJson(input): ValidatedJson<CreateFormula>,
) -> FormulaResult<impl IntoResponse> {
    let formula = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(formula)))
}

/// Get a formula by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Formula ID")
    ),
    responses(
        (status = 200, description = "Formula found", body = Formula),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_formula<F: FormulaRepository>(
    State(service): State<Arc<FormulaService<F>>>,
    UuidPath(id): UuidPath,
) -> FormulaResult<Json<Formula>> {
    let formula = service.get_by_id(id).await?;
    Ok(Json(formula))
}

/// Update a formula's header fields
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Formula ID")
    ),
    request_body = UpdateFormula,
    responses(
        (status = 200, description = "Formula updated successfully", body = Formula),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_formula<F: FormulaRepository>(
    State(service): State<Arc<FormulaService<F>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateFormula>,
) -> FormulaResult<Json<Formula>> {
    let formula = service.update(id, input).await?;
    Ok(Json(formula))
}

/// Delete a formula
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Formula ID")
    ),
    responses(
        (status = 204, description = "Formula deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_formula<F: FormulaRepository>(
    State(service): State<Arc<FormulaService<F>>>,
    UuidPath(id): UuidPath,
) -> FormulaResult<impl IntoResponse> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Ordered ingredient associations for a formula
#[utoipa::path(
    get,
    path = "/{id}/ingredients",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Formula ID")
    ),
    responses(
        (status = 200, description = "Ingredient associations", body = Vec<FormulaIngredient>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_formula_ingredients<F: FormulaRepository>(
    State(service): State<Arc<FormulaService<F>>>,
    UuidPath(id): UuidPath,
) -> FormulaResult<Json<Vec<FormulaIngredient>>> {
    let associations = service.ingredient_associations(id).await?;
    Ok(Json(associations))
}

/// Ordered manufacturing steps for a formula
#[utoipa::path(
    get,
    path = "/{id}/steps",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Formula ID")
    ),
    responses(
        (status = 200, description = "Manufacturing steps", body = Vec<FormulaStep>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_formula_steps<F: FormulaRepository>(
    State(service): State<Arc<FormulaService<F>>>,
    UuidPath(id): UuidPath,
) -> FormulaResult<Json<Vec<FormulaStep>>> {
    let steps = service.steps(id).await?;
    Ok(Json(steps))
}

/// Query parameters for a cost breakdown
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct CostQuery {
    /// Custom batch size (defaults to the formula's own)
    pub batch_size: Option<f64>,
    /// Unit for the batch size (defaults to the formula's own, then grams)
    pub batch_unit: Option<String>,
    /// Display currency (defaults to USD)
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Batch cost breakdown for a formula
///
/// Ingredients without cost data contribute zero and are listed in
/// `missing_cost_ingredients`; the request never fails over missing
/// pricing.
#[utoipa::path(
    get,
    path = "/{id}/cost",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Formula ID"),
        CostQuery
    ),
    responses(
        (status = 200, description = "Cost breakdown", body = FormulaCostBreakdown),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_formula_cost<F, I, P>(
    State(calculator): State<Arc<CostCalculator<F, I, P>>>,
    UuidPath(id): UuidPath,
    Query(query): Query<CostQuery>,
) -> FormulaResult<Json<FormulaCostBreakdown>>
where
    F: FormulaRepository + 'static,
    I: IngredientRepository + 'static,
    P: RateProvider + 'static,
{
    let start = std::time::Instant::now();
    let breakdown = calculator
        .formula_cost_breakdown(id, query.batch_size, query.batch_unit, &query.currency)
        .await?;

    observability::CostingMetrics::record_breakdown(
        &breakdown.currency,
        breakdown.missing_cost_ingredients.len(),
        start.elapsed().as_millis() as u64,
    );

    Ok(Json(breakdown))
}
