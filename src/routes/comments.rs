use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::ActingMember,
    models::{CommentId, CommentPage, CommentView, RecipeId},
    routes::AppState,
    services::comments::{self, CommentQuery},
};

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    pub body: String,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(recipe_id): Path<RecipeId>,
    Query(query): Query<CommentQuery>,
) -> AppResult<Json<CommentPage>> {
    Ok(Json(
        comments::list_comments(&state.lookups, recipe_id, &query).await?,
    ))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Path(recipe_id): Path<RecipeId>,
    ActingMember(actor): ActingMember,
    Json(request): Json<CommentBody>,
) -> AppResult<(StatusCode, Json<CommentView>)> {
    let comment = comments::add_comment(&state.lookups, recipe_id, &actor, &request.body).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CommentId>,
    ActingMember(actor): ActingMember,
    Json(request): Json<CommentBody>,
) -> AppResult<Json<CommentView>> {
    Ok(Json(
        comments::edit_comment(&state.lookups, id, &actor, &request.body).await?,
    ))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CommentId>,
    ActingMember(actor): ActingMember,
) -> AppResult<StatusCode> {
    comments::delete_comment(&state.lookups, id, &actor).await?;
    Ok(StatusCode::NO_CONTENT)
}
