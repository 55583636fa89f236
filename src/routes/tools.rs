//! Stateless decoding helpers for recipe editing and detail screens

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{routes::AppState, services::list_field};

#[derive(Debug, Deserialize)]
pub struct DecodeListRequest {
    pub raw: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DecodeListResponse {
    pub items: Vec<String>,
}

pub async fn decode_list(Json(request): Json<DecodeListRequest>) -> Json<DecodeListResponse> {
    Json(DecodeListResponse {
        items: list_field::decode(request.raw.as_deref()),
    })
}

#[derive(Debug, Deserialize)]
pub struct NormalizeTagsRequest {
    #[serde(default)]
    pub category_names: Vec<String>,
    #[serde(default)]
    pub free_text_names: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct NormalizeTagsResponse {
    pub tags: Vec<String>,
}

pub async fn normalize_tags(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NormalizeTagsRequest>,
) -> Json<NormalizeTagsResponse> {
    Json(NormalizeTagsResponse {
        tags: state
            .normalizer
            .merge(&request.category_names, &request.free_text_names),
    })
}
