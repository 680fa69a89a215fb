use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::database::models::News;
use crate::error::ApiError;
use crate::repository::CrudRepository;

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/news", get(list_published))
        .route("/api/news/:id", get(get_one))
        .route("/api/admin/news", get(list_all).post(create))
        .route("/api/admin/news/drafts", get(drafts))
        .route("/api/admin/news/:id", put(update).delete(delete_one))
        .route("/api/admin/news/:id/publish", post(publish))
        .route("/api/admin/news/:id/unpublish", post(unpublish))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<i64>,
}

async fn list_published(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<News>>, ApiError> {
    let limit = query.limit.unwrap_or(state.config.news_default_limit);
    if limit <= 0 {
        return Err(ApiError::bad_request("limit must be positive"));
    }
    let ctx = state.repos.context();
    Ok(Json(state.repos.news.get_published(&ctx, limit).await?))
}

/// Public single-item view; drafts and scheduled items 404 here.
async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<News>, ApiError> {
    let ctx = state.repos.context();
    let item = state.repos.news.get_by_id(&ctx, id).await?;
    if !item.is_published_now() {
        return Err(ApiError::not_found("resource not found"));
    }
    Ok(Json(item))
}

async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<News>>, ApiError> {
    let ctx = state.repos.context();
    Ok(Json(state.repos.news.get_all(&ctx).await?))
}

async fn drafts(State(state): State<AppState>) -> Result<Json<Vec<News>>, ApiError> {
    let ctx = state.repos.context();
    Ok(Json(state.repos.news.get_drafts(&ctx).await?))
}

#[derive(Debug, Deserialize)]
struct NewsPayload {
    title: String,
    content: String,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    is_published: bool,
}

impl NewsPayload {
    fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::bad_request("title is required"));
        }
        if self.content.trim().is_empty() {
            return Err(ApiError::bad_request("content is required"));
        }
        Ok(())
    }

    fn into_news(self, id: i64) -> News {
        News {
            id,
            title: self.title,
            content: self.content,
            published_at: self.published_at,
            is_published: self.is_published,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewsPayload>,
) -> Result<(StatusCode, Json<News>), ApiError> {
    payload.validate()?;
    let ctx = state.repos.context();
    let item = state.repos.news.create(&ctx, &payload.into_news(0)).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<NewsPayload>,
) -> Result<Json<News>, ApiError> {
    payload.validate()?;
    let ctx = state.repos.context();
    let item = state.repos.news.update(&ctx, &payload.into_news(id)).await?;
    Ok(Json(item))
}

async fn delete_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let ctx = state.repos.context();
    state.repos.news.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn publish(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let ctx = state.repos.context();
    state.repos.news.publish(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn unpublish(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let ctx = state.repos.context();
    state.repos.news.unpublish(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
