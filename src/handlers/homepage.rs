use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;

use crate::database::models::HomepageSection;
use crate::error::ApiError;
use crate::repository::CrudRepository;

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/homepage", get(list))
        .route("/api/homepage/:key", get(get_by_key))
        .route("/api/admin/homepage/:key", put(update_content))
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<HomepageSection>>, ApiError> {
    let ctx = state.repos.context();
    Ok(Json(state.repos.homepage_sections.get_all(&ctx).await?))
}

async fn get_by_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<HomepageSection>, ApiError> {
    let ctx = state.repos.context();
    Ok(Json(
        state.repos.homepage_sections.get_by_key(&ctx, &key).await?,
    ))
}

#[derive(Debug, Deserialize)]
struct ContentPayload {
    title: String,
    content: String,
}

async fn update_content(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(payload): Json<ContentPayload>,
) -> Result<Json<HomepageSection>, ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::bad_request("title is required"));
    }
    if payload.content.trim().is_empty() {
        return Err(ApiError::bad_request("content is required"));
    }

    let ctx = state.repos.context();
    state
        .repos
        .homepage_sections
        .update_content_by_key(&ctx, &key, &payload.title, &payload.content)
        .await?;
    Ok(Json(
        state.repos.homepage_sections.get_by_key(&ctx, &key).await?,
    ))
}
