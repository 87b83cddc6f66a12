//! HTTP handlers for the ingredients domain

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
    UuidPath, ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::IngredientResult;
use crate::models::{
    CostPerUnit, CreateIngredient, Ingredient, IngredientFilter, Tier, UpdateIngredient,
    UpdateIngredientCost,
};
use crate::repository::IngredientRepository;
use crate::service::IngredientService;

pub const TAG: &str = "ingredients";

/// OpenAPI documentation for the ingredients API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_ingredients,
        create_ingredient,
        get_ingredient,
        update_ingredient,
        delete_ingredient,
        update_ingredient_cost,
        get_ingredient_cost,
    ),
    components(
        schemas(
            Ingredient,
            CreateIngredient,
            UpdateIngredient,
            UpdateIngredientCost,
            IngredientFilter,
            CostPerUnit,
            Tier,
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Ingredient catalog and cost data endpoints")
    )
)]
pub struct ApiDoc;

/// Create the ingredients router with all HTTP endpoints
pub fn router<R: IngredientRepository + 'static>(service: IngredientService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_ingredients).post(create_ingredient))
        .route(
            "/{id}",
            get(get_ingredient)
                .put(update_ingredient)
                .delete(delete_ingredient),
        )
        .route(
            "/{id}/cost",
            put(update_ingredient_cost).get(get_ingredient_cost),
        )
        .with_state(shared_service)
}

/// List ingredients with optional filters
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(IngredientFilter),
    responses(
        (status = 200, description = "List of ingredients", body = Vec<Ingredient>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_ingredients<R: IngredientRepository>(
    State(service): State<Arc<IngredientService<R>>>,
    Query(filter): Query<IngredientFilter>,
) -> IngredientResult<Json<Vec<Ingredient>>> {
    let ingredients = service.list(filter).await?;
    Ok(Json(ingredients))
}

/// Create a new ingredient
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateIngredient,
    responses(
        (status = 201, description = "Ingredient created successfully", body = Ingredient),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_ingredient<R: IngredientRepository>(
    State(service): State<Arc<IngredientService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateIngredient>,
) -> IngredientResult<impl IntoResponse> {
    let ingredient = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(ingredient)))
}

/// Get an ingredient by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Ingredient ID")
    ),
    responses(
        (status = 200, description = "Ingredient found", body = Ingredient),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_ingredient<R: IngredientRepository>(
    State(service): State<Arc<IngredientService<R>>>,
    UuidPath(id): UuidPath,
) -> IngredientResult<Json<Ingredient>> {
    let ingredient = service.get_by_id(id).await?;
    Ok(Json(ingredient))
}

/// Update an ingredient's descriptive fields
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Ingredient ID")
    ),
    request_body = UpdateIngredient,
    responses(
        (status = 200, description = "Ingredient updated successfully", body = Ingredient),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_ingredient<R: IngredientRepository>(
    State(service): State<Arc<IngredientService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateIngredient>,
) -> IngredientResult<Json<Ingredient>> {
    let ingredient = service.update(id, input).await?;
    Ok(Json(ingredient))
}

/// Delete an ingredient
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Ingredient ID")
    ),
    responses(
        (status = 204, description = "Ingredient deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_ingredient<R: IngredientRepository>(
    State(service): State<Arc<IngredientService<R>>>,
    UuidPath(id): UuidPath,
) -> IngredientResult<impl IntoResponse> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Apply a partial cost update to an ingredient
///
/// The cost-per-gram cache is recomputed when any purchase field changes.
/// A missing ingredient or failed write maps to 404.
#[utoipa::path(
    put,
    path = "/{id}/cost",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Ingredient ID")
    ),
    request_body = UpdateIngredientCost,
    responses(
        (status = 200, description = "Cost data updated"),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_ingredient_cost<R: IngredientRepository>(
    State(service): State<Arc<IngredientService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateIngredientCost>,
) -> impl IntoResponse {
    if service.update_cost(id, input).await {
        StatusCode::OK.into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": format!("Ingredient not found or cost update failed: {}", id),
                "code": 404
            })),
        )
            .into_response()
    }
}

/// Get an ingredient's cost per common display units
#[utoipa::path(
    get,
    path = "/{id}/cost",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Ingredient ID")
    ),
    responses(
        (status = 200, description = "Cost per unit options", body = CostPerUnit),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_ingredient_cost<R: IngredientRepository>(
    State(service): State<Arc<IngredientService<R>>>,
    UuidPath(id): UuidPath,
) -> IngredientResult<impl IntoResponse> {
    match service.cost_options(id).await? {
        Some(options) => Ok(Json(options).into_response()),
        None => Ok((
            StatusCode::OK,
            Json(serde_json::json!({
                "message": "No cost data recorded for this ingredient"
            })),
        )
            .into_response()),
    }
}
