use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use serde::Serialize;

use crate::domain::{Category, DomainError, Recipe, RecipeFilter};
use crate::infrastructure::AppState;

#[derive(Serialize)]
pub struct BackupData {
    pub version: String,
    pub timestamp: String,
    pub categories: Vec<Category>,
    pub recipes: Vec<Recipe>,
}

/// One CSV row per recipe; tags are joined with `;`
#[derive(Serialize)]
struct RecipeRow<'a> {
    id: Option<i32>,
    name: &'a str,
    location: Option<&'a str>,
    notes: Option<&'a str>,
    rating: Option<i32>,
    classification_code: Option<&'a str>,
    tags: String,
}

fn attachment_headers(content_type: &'static str, filename: &str) -> Result<HeaderMap, DomainError> {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    Ok(headers)
}

#[utoipa::path(
    get,
    path = "/api/export",
    responses(
        (status = 200, description = "JSON backup of all categories and recipes")
    )
)]
pub async fn export_data(State(state): State<AppState>) -> Result<impl IntoResponse, DomainError> {
    let categories = state.category_repo.list_all().await?;
    let recipes = state.recipe_repo.find_all(RecipeFilter::default()).await?;

    let backup = BackupData {
        version: "1.0".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        categories,
        recipes,
    };

    let filename = format!(
        "recipes_backup_{}.json",
        chrono::Utc::now().format("%Y-%m-%d")
    );
    let headers = attachment_headers("application/json", &filename)?;

    Ok((StatusCode::OK, headers, Json(backup)))
}

#[utoipa::path(
    get,
    path = "/api/export/recipes.csv",
    responses(
        (status = 200, description = "Recipes as CSV, tags joined with ';'")
    )
)]
pub async fn export_recipes_csv(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, DomainError> {
    let recipes = state.recipe_repo.find_all(RecipeFilter::default()).await?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    for recipe in &recipes {
        writer
            .serialize(RecipeRow {
                id: recipe.id,
                name: &recipe.name,
                location: recipe.location.as_deref(),
                notes: recipe.notes.as_deref(),
                rating: recipe.rating,
                classification_code: recipe.classification_code.as_deref(),
                tags: recipe.tags.join(";"),
            })
            .map_err(|e| DomainError::Internal(format!("CSV write error: {}", e)))?;
    }
    let body = writer
        .into_inner()
        .map_err(|e| DomainError::Internal(format!("CSV write error: {}", e)))?;

    tracing::info!("Exported {} recipes as CSV", recipes.len());

    let filename = format!("recipes_{}.csv", chrono::Utc::now().format("%Y-%m-%d"));
    let headers = attachment_headers("text/csv; charset=utf-8", &filename)?;

    Ok((StatusCode::OK, headers, body))
}
