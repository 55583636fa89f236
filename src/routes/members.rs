use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{BookmarkStatus, MemberInterests, RecipeId, RecipeSummary},
    routes::AppState,
    services::{bookmarks, members},
};

/// Declared interests of one member
pub async fn interests(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> AppResult<Json<MemberInterests>> {
    Ok(Json(members::get_interests(&state.lookups, &email).await?))
}

#[derive(Debug, Deserialize)]
pub struct UpdateInterestsRequest {
    pub diseases: Vec<String>,
}

pub async fn update_interests(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    Json(request): Json<UpdateInterestsRequest>,
) -> AppResult<Json<MemberInterests>> {
    let updated = members::update_interests(&state.lookups, &email, &request.diseases).await?;
    Ok(Json(updated))
}

#[derive(Debug, Deserialize)]
pub struct BookmarkQuery {
    /// Tag text the bookmarked recipes must carry
    pub disease: Option<String>,
}

pub async fn list_bookmarks(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    Query(query): Query<BookmarkQuery>,
) -> AppResult<Json<Vec<RecipeSummary>>> {
    let summaries = bookmarks::list_bookmarks(
        &state.lookups,
        &state.normalizer,
        &email,
        query.disease.as_deref(),
    )
    .await?;
    Ok(Json(summaries))
}

#[derive(Debug, Deserialize)]
pub struct AddBookmarkRequest {
    pub recipe_id: RecipeId,
}

/// 201 when the bookmark is new, 200 when it already existed
pub async fn add_bookmark(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    Json(request): Json<AddBookmarkRequest>,
) -> AppResult<(StatusCode, Json<BookmarkStatus>)> {
    let status = bookmarks::add_bookmark(&state.lookups, &email, request.recipe_id).await?;
    let code = if status.changed {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((code, Json(status)))
}

pub async fn bookmark_status(
    State(state): State<Arc<AppState>>,
    Path((email, recipe_id)): Path<(String, RecipeId)>,
) -> AppResult<Json<BookmarkStatus>> {
    Ok(Json(
        bookmarks::bookmark_status(&state.lookups, &email, recipe_id).await?,
    ))
}

pub async fn remove_bookmark(
    State(state): State<Arc<AppState>>,
    Path((email, recipe_id)): Path<(String, RecipeId)>,
) -> AppResult<Json<BookmarkStatus>> {
    Ok(Json(
        bookmarks::remove_bookmark(&state.lookups, &email, recipe_id).await?,
    ))
}
