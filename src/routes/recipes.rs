use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{RecipeDetail, RecipeId, RecipeSummary},
    routes::AppState,
    services::recipes::{self, RecipeFilter},
};

/// Lists recipes, optionally filtered by category, meal slot and text
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<RecipeFilter>,
) -> AppResult<Json<Vec<RecipeSummary>>> {
    let summaries = recipes::list_recipes(&state.lookups, &state.normalizer, &filter).await?;
    Ok(Json(summaries))
}

/// Recipe detail with numbered ingredients and steps
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecipeId>,
) -> AppResult<Json<RecipeDetail>> {
    let detail = recipes::get_recipe_detail(&state.lookups, &state.normalizer, id).await?;
    Ok(Json(detail))
}
