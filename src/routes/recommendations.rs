use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::RecommendationResponse,
    routes::AppState,
    services::recommendations,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    /// Member email
    pub member: Option<String>,
    pub limit: Option<usize>,
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    let member = params
        .member
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Missing member parameter".to_string()))?;
    let limit = state.resolve_limit(params.limit)?;

    tracing::info!(
        request_id = %request_id,
        member = %member,
        limit,
        "Processing recommendation request"
    );

    let response =
        recommendations::get_recommendations(&state.lookups, &state.normalizer, member, limit)
            .await?;

    tracing::info!(
        request_id = %request_id,
        returned = response.recommendations.len(),
        tier = ?response.tier,
        "Recommendations returned"
    );

    Ok(Json(response))
}
