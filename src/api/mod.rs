pub mod categories;
pub mod classification;
pub mod export;
pub mod health;
pub mod recipes;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::json;

use crate::domain::{ClassificationError, DomainError};
use crate::infrastructure::AppState;

impl DomainError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DomainError::NotFound => StatusCode::NOT_FOUND,
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Conflict(_) | DomainError::HasChildren { .. } => StatusCode::CONFLICT,
            DomainError::Classification(ClassificationError::OutOfSequenceSpace { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            DomainError::Classification(_) => StatusCode::BAD_REQUEST,
            DomainError::Database(_) | DomainError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Categories
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route("/categories/tree", get(categories::category_tree))
        .route("/categories/integrity", get(categories::integrity_report))
        .route("/categories/import", post(categories::import_categories))
        .route(
            "/categories/:id",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route("/categories/:id/children", get(categories::list_children))
        // Classification
        .route("/classification/next", get(classification::next_code))
        // Recipes
        .route(
            "/recipes",
            get(recipes::list_recipes).post(recipes::create_recipe),
        )
        .route(
            "/recipes/:id",
            get(recipes::get_recipe)
                .put(recipes::update_recipe)
                .delete(recipes::delete_recipe),
        )
        .route(
            "/recipes/:id/classification",
            put(recipes::classify_recipe),
        )
        // Export
        .route("/export", get(export::export_data))
        .route("/export/recipes.csv", get(export::export_recipes_csv))
        .with_state(state)
}
