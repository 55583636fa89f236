use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    error::{AppError, AppResult},
    middleware::{assign_request_id, make_span_with_request_id},
    services::{catalog::Lookups, tags::TagNormalizer},
};

pub mod comments;
pub mod diseases;
pub mod members;
pub mod recipes;
pub mod recommendations;
pub mod tools;

/// State shared by every handler
pub struct AppState {
    pub lookups: Lookups,
    pub normalizer: TagNormalizer,
    pub default_limit: usize,
    pub max_limit: usize,
}

impl AppState {
    pub fn new(
        lookups: Lookups,
        normalizer: TagNormalizer,
        default_limit: usize,
        max_limit: usize,
    ) -> Self {
        Self {
            lookups,
            normalizer,
            default_limit,
            max_limit,
        }
    }

    /// Applies the default to a missing limit and clamps large ones
    pub fn resolve_limit(&self, requested: Option<usize>) -> AppResult<usize> {
        match requested {
            None => Ok(self.default_limit.clamp(1, self.max_limit.max(1))),
            Some(0) => Err(AppError::InvalidInput(
                "limit must be a positive integer".to_string(),
            )),
            Some(limit) => Ok(limit.min(self.max_limit.max(1))),
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(assign_request_id))
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/recommendations", get(recommendations::recommend))
        .route("/recipes", get(recipes::list))
        .route("/recipes/:id", get(recipes::get))
        .route("/diseases", get(diseases::list))
        .route(
            "/recipes/:id/comments",
            get(comments::list).post(comments::create),
        )
        .route("/comments/:id", put(comments::update).delete(comments::delete))
        .route(
            "/members/:email/interests",
            get(members::interests).put(members::update_interests),
        )
        .route(
            "/members/:email/bookmarks",
            get(members::list_bookmarks).post(members::add_bookmark),
        )
        .route(
            "/members/:email/bookmarks/:recipe_id",
            get(members::bookmark_status).delete(members::remove_bookmark),
        )
        .route("/tools/decode-list", post(tools::decode_list))
        .route("/tools/normalize-tags", post(tools::normalize_tags))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
