use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::domain::{DomainError, RecipeFilter};
use crate::infrastructure::AppState;
use crate::services::recipe_service::{self, ClassifyRequest, RecipeRequest};

/// `?tag=` filters on an exact tag, `?q=` searches name, notes and location
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(filter): Query<RecipeFilter>,
) -> Result<impl IntoResponse, DomainError> {
    let recipes = recipe_service::list_recipes(state.recipe_context(), filter).await?;
    Ok(Json(json!({
        "total": recipes.len(),
        "recipes": recipes,
    })))
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    responses(
        (status = 201, description = "Recipe created"),
        (status = 400, description = "Invalid name, rating or classification code")
    )
)]
pub async fn create_recipe(
    State(state): State<AppState>,
    Json(payload): Json<RecipeRequest>,
) -> Result<impl IntoResponse, DomainError> {
    let recipe = recipe_service::create_recipe(state.recipe_context(), payload).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    params(("id" = i32, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe found"),
        (status = 404, description = "Recipe not found")
    )
)]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let recipe = recipe_service::get_recipe(state.recipe_context(), id).await?;
    Ok(Json(recipe))
}

#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    params(("id" = i32, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe updated"),
        (status = 404, description = "Recipe not found")
    )
)]
pub async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<RecipeRequest>,
) -> Result<impl IntoResponse, DomainError> {
    let recipe = recipe_service::update_recipe(state.recipe_context(), id, payload).await?;
    Ok(Json(recipe))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    params(("id" = i32, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe deleted"),
        (status = 404, description = "Recipe not found")
    )
)]
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    recipe_service::delete_recipe(state.recipe_context(), id).await?;
    Ok(Json(json!({ "message": "Recipe deleted" })))
}

/// `{"code": "641.5"}` to classify, `{"code": null}` to clear
#[utoipa::path(
    put,
    path = "/api/recipes/{id}/classification",
    params(("id" = i32, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Classification and hierarchy tags updated"),
        (status = 400, description = "Malformed classification code"),
        (status = 404, description = "Recipe not found"),
        (status = 422, description = "No sequence numbers left under the selected category")
    )
)]
pub async fn classify_recipe(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ClassifyRequest>,
) -> Result<impl IntoResponse, DomainError> {
    let recipe =
        recipe_service::classify_recipe(state.recipe_context(), id, payload.code.as_deref())
            .await?;
    Ok(Json(recipe))
}
