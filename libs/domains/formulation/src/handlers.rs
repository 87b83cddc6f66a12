//! HTTP handlers for the formulation domain

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{BadRequestValidationResponse, InternalServerErrorResponse},
    ValidatedJson,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use domain_ingredients::IngredientRepository;
use observability::FormulationMetrics;

use crate::composer::FormulaComposer;
use crate::error::FormulationResult;
use crate::models::{ComposeRequest, ComposedFormula, ComposedIngredient, ComposedStep};
use crate::rules::{FormulationRules, Priority};

pub const TAG: &str = "formulation";

/// OpenAPI documentation for the formulation API
#[derive(OpenApi)]
#[openapi(
    paths(compose_formula, list_options),
    components(
        schemas(
            ComposeRequest,
            ComposedFormula,
            ComposedIngredient,
            ComposedStep,
            ComposerOptions,
            Priority,
        ),
        responses(BadRequestValidationResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = TAG, description = "Rule-based formula composition endpoints")
    )
)]
pub struct ApiDoc;

/// Create the formulation router
pub fn router<R: IngredientRepository + 'static>(composer: FormulaComposer<R>) -> Router {
    let shared = Arc::new(composer);

    Router::new()
        .route("/compose", post(compose_formula))
        .route("/options", get(list_options))
        .with_state(shared)
}

/// Supported product types and concerns
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ComposerOptions {
    pub product_types: Vec<String>,
    pub skin_concerns: Vec<String>,
}

/// Compose a formula from the rule table
///
/// Returns 422 for an unsupported product type. A thin catalog produces an
/// incomplete formula (see `incomplete_phases`), not an error.
#[utoipa::path(
    post,
    path = "/compose",
    tag = TAG,
    request_body = ComposeRequest,
    responses(
        (status = 200, description = "Composed formula", body = ComposedFormula),
        (status = 400, response = BadRequestValidationResponse),
        (status = 422, description = "Unsupported product type"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn compose_formula<R: IngredientRepository>(
    State(composer): State<Arc<FormulaComposer<R>>>,
    ValidatedJson(request): ValidatedJson<ComposeRequest>,
) -> FormulationResult<Json<ComposedFormula>> {
    let start = std::time::Instant::now();
    let requested_type = request.product_type.clone();

    match composer.compose(request).await {
        Ok(formula) => {
            FormulationMetrics::record_composition(
                &formula.product_type,
                formula.ingredients.len(),
                start.elapsed().as_millis() as u64,
            );
            FormulationMetrics::record_incomplete_phases(
                &formula.product_type,
                formula.incomplete_phases.len(),
            );
            Ok(Json(formula))
        }
        Err(e) => {
            if matches!(e, crate::error::FormulationError::UnsupportedProductType(_)) {
                FormulationMetrics::record_unsupported_type(&requested_type);
            }
            Err(e)
        }
    }
}

/// List the product types and skin concerns the rule table supports
#[utoipa::path(
    get,
    path = "/options",
    tag = TAG,
    responses(
        (status = 200, description = "Composer options", body = ComposerOptions)
    )
)]
async fn list_options() -> Json<ComposerOptions> {
    let rules = FormulationRules::standard();

    Json(ComposerOptions {
        product_types: rules
            .supported_types()
            .into_iter()
            .map(String::from)
            .collect(),
        skin_concerns: rules
            .supported_concerns()
            .into_iter()
            .map(String::from)
            .collect(),
    })
}
