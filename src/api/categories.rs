use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::services::category_service::{
    self, CreateCategoryRequest, UpdateCategoryRequest,
};

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "All categories, active and inactive, ordered by code")
    )
)]
pub async fn list_categories(State(state): State<AppState>) -> Result<impl IntoResponse, DomainError> {
    let categories = category_service::list_categories(state.category_repo.as_ref()).await?;
    Ok(Json(json!({
        "total": categories.len(),
        "categories": categories,
    })))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    responses(
        (status = 201, description = "Category created"),
        (status = 400, description = "Malformed code or empty name"),
        (status = 409, description = "Code already exists")
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, DomainError> {
    let category = category_service::create_category(
        state.category_repo.as_ref(),
        &state.category_cache,
        payload,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category found"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let category = category_service::get_category(state.category_repo.as_ref(), id).await?;
    Ok(Json(category))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category updated"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Code taken, or children still reference the old code")
    )
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<impl IntoResponse, DomainError> {
    let category = category_service::update_category(
        state.category_repo.as_ref(),
        state.recipe_repo.as_ref(),
        &state.category_cache,
        id,
        payload,
    )
    .await?;
    Ok(Json(category))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Other categories still name it as parent")
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    category_service::delete_category(state.category_repo.as_ref(), &state.category_cache, id)
        .await?;
    Ok(Json(json!({ "message": "Category deleted" })))
}

#[utoipa::path(
    get,
    path = "/api/categories/tree",
    responses(
        (status = 200, description = "Active roots with nested active children")
    )
)]
pub async fn category_tree(State(state): State<AppState>) -> Result<impl IntoResponse, DomainError> {
    let roots =
        category_service::category_tree(state.category_repo.as_ref(), &state.category_cache)
            .await?;
    Ok(Json(roots))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}/children",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Active children, ordered by code"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn list_children(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let children =
        category_service::children_of(state.category_repo.as_ref(), &state.category_cache, id)
            .await?;
    Ok(Json(children))
}

#[utoipa::path(
    get,
    path = "/api/categories/integrity",
    responses(
        (status = 200, description = "Broken parent links and stored levels that disagree with the code")
    )
)]
pub async fn integrity_report(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, DomainError> {
    let report =
        category_service::integrity_report(state.category_repo.as_ref(), &state.category_cache)
            .await?;
    Ok(Json(report))
}

/// Raw text body, one or more `"<code> <name>"` fields per line
#[utoipa::path(
    post,
    path = "/api/categories/import",
    responses(
        (status = 200, description = "Imported and errored entry counts")
    )
)]
pub async fn import_categories(
    State(state): State<AppState>,
    body: String,
) -> Result<impl IntoResponse, DomainError> {
    if body.trim().is_empty() {
        return Err(DomainError::Validation("Import text is empty".to_string()));
    }

    let summary = category_service::import_categories(
        state.category_repo.as_ref(),
        &state.category_cache,
        &body,
    )
    .await?;
    Ok(Json(summary))
}
