use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{error::AppResult, models::Disease, routes::AppState};

/// All disease categories ordered by name
pub async fn list(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Disease>>> {
    let categories = state.lookups.categories.list_categories().await?;
    Ok(Json(categories))
}
