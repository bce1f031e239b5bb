use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::services::recipe_service;

#[derive(Debug, Deserialize)]
pub struct NextCodeQuery {
    pub base: String,
}

/// Code the next recipe filed under `?base=` would receive
pub async fn next_code(
    State(state): State<AppState>,
    Query(query): Query<NextCodeQuery>,
) -> Result<impl IntoResponse, DomainError> {
    let next = recipe_service::next_code(state.recipe_context(), &query.base).await?;
    Ok(Json(next))
}
