use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;

use crate::database::models::{Project, ProjectStatus, ProjectWithRelations};
use crate::error::ApiError;
use crate::repository::CrudRepository;

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/projects", get(list))
        .route("/api/projects/:id", get(get_one))
        .route("/api/admin/projects", post(create))
        .route("/api/admin/projects/:id", put(update).delete(delete_one))
        .route(
            "/api/admin/projects/:id/members/:member_id",
            post(link_member).delete(unlink_member),
        )
        .route(
            "/api/admin/projects/:id/publications/:publication_id",
            post(link_publication).delete(unlink_publication),
        )
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    status: Option<ProjectStatus>,
}

async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Project>>, ApiError> {
    let ctx = state.repos.context();
    let projects = match query.status {
        Some(status) => state.repos.projects.get_by_status(&ctx, status).await?,
        None => state.repos.projects.get_all(&ctx).await?,
    };
    Ok(Json(projects))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProjectWithRelations>, ApiError> {
    let ctx = state.repos.context();
    Ok(Json(
        state.repos.projects.get_with_relations(&ctx, id).await?,
    ))
}

#[derive(Debug, Deserialize)]
struct ProjectPayload {
    title: String,
    description: String,
    status: ProjectStatus,
}

impl ProjectPayload {
    fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::bad_request("title is required"));
        }
        if self.description.trim().is_empty() {
            return Err(ApiError::bad_request("description is required"));
        }
        Ok(())
    }

    fn into_project(self, id: i64) -> Project {
        Project {
            id,
            title: self.title,
            description: self.description,
            status: self.status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ProjectPayload>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    payload.validate()?;
    let ctx = state.repos.context();
    let project = state
        .repos
        .projects
        .create(&ctx, &payload.into_project(0))
        .await?;
    Ok((StatusCode::CREATED, Json(project)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProjectPayload>,
) -> Result<Json<Project>, ApiError> {
    payload.validate()?;
    let ctx = state.repos.context();
    let project = state
        .repos
        .projects
        .update(&ctx, &payload.into_project(id))
        .await?;
    Ok(Json(project))
}

async fn delete_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let ctx = state.repos.context();
    state.repos.projects.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn map_link_error(e: crate::database::DbError) -> ApiError {
    if e.is_foreign_key_violation() {
        ApiError::not_found("linked entity not found")
    } else {
        e.into()
    }
}

async fn link_member(
    State(state): State<AppState>,
    Path((id, member_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    let ctx = state.repos.context();
    state
        .repos
        .projects
        .link_member(&ctx, id, member_id)
        .await
        .map_err(map_link_error)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn unlink_member(
    State(state): State<AppState>,
    Path((id, member_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    let ctx = state.repos.context();
    state.repos.projects.unlink_member(&ctx, id, member_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn link_publication(
    State(state): State<AppState>,
    Path((id, publication_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    let ctx = state.repos.context();
    state
        .repos
        .projects
        .link_publication(&ctx, id, publication_id)
        .await
        .map_err(map_link_error)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn unlink_publication(
    State(state): State<AppState>,
    Path((id, publication_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    let ctx = state.repos.context();
    state
        .repos
        .projects
        .unlink_publication(&ctx, id, publication_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
