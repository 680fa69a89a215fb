use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;

use crate::database::models::{LabMember, LabMemberRole, Publication};
use crate::error::ApiError;
use crate::repository::CrudRepository;

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/members", get(list))
        .route("/api/members/alumni", get(alumni))
        .route("/api/members/:id", get(get_one))
        .route("/api/members/:id/publications", get(publications))
        .route("/api/admin/members", post(create))
        .route(
            "/api/admin/members/:id",
            put(update).delete(delete_one),
        )
        .route("/api/admin/members/:id/alumni", put(mark_alumni))
        .route("/api/admin/members/:id/photo", put(update_photo))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    role: Option<LabMemberRole>,
}

async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<LabMember>>, ApiError> {
    let ctx = state.repos.context();
    let members = match query.role {
        Some(role) => state.repos.lab_members.get_by_role(&ctx, role).await?,
        None => state.repos.lab_members.get_all(&ctx).await?,
    };
    Ok(Json(members))
}

async fn alumni(State(state): State<AppState>) -> Result<Json<Vec<LabMember>>, ApiError> {
    let ctx = state.repos.context();
    Ok(Json(state.repos.lab_members.get_alumni(&ctx).await?))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LabMember>, ApiError> {
    let ctx = state.repos.context();
    Ok(Json(state.repos.lab_members.get_by_id(&ctx, id).await?))
}

async fn publications(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Publication>>, ApiError> {
    let ctx = state.repos.context();
    // 404 for an unknown member rather than an empty list
    state.repos.lab_members.get_by_id(&ctx, id).await?;
    Ok(Json(state.repos.publications.get_by_member(&ctx, id).await?))
}

#[derive(Debug, Deserialize)]
struct MemberPayload {
    name: String,
    role: LabMemberRole,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    bio: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
    #[serde(default)]
    personal_page_content: Option<String>,
    #[serde(default)]
    research_interests: Option<String>,
    #[serde(default)]
    is_alumni: bool,
    #[serde(default)]
    display_order: i64,
}

impl MemberPayload {
    fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::bad_request("name is required"));
        }
        Ok(())
    }

    fn into_member(self, id: i64) -> LabMember {
        LabMember {
            id,
            name: self.name,
            role: self.role,
            email: self.email,
            bio: self.bio,
            photo_url: self.photo_url,
            personal_page_content: self.personal_page_content,
            research_interests: self.research_interests,
            is_alumni: self.is_alumni,
            display_order: self.display_order,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

async fn create(
    State(state): State<AppState>,
    Json(payload): Json<MemberPayload>,
) -> Result<(StatusCode, Json<LabMember>), ApiError> {
    payload.validate()?;
    let ctx = state.repos.context();
    let member = state
        .repos
        .lab_members
        .create(&ctx, &payload.into_member(0))
        .await?;
    Ok((StatusCode::CREATED, Json(member)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<MemberPayload>,
) -> Result<Json<LabMember>, ApiError> {
    payload.validate()?;
    let ctx = state.repos.context();
    let member = state
        .repos
        .lab_members
        .update(&ctx, &payload.into_member(id))
        .await?;
    Ok(Json(member))
}

async fn delete_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let ctx = state.repos.context();
    state.repos.lab_members.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct AlumniPayload {
    is_alumni: bool,
}

async fn mark_alumni(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<AlumniPayload>,
) -> Result<StatusCode, ApiError> {
    let ctx = state.repos.context();
    state
        .repos
        .lab_members
        .mark_as_alumni(&ctx, id, payload.is_alumni)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct PhotoPayload {
    photo_url: String,
}

async fn update_photo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<PhotoPayload>,
) -> Result<StatusCode, ApiError> {
    if payload.photo_url.trim().is_empty() {
        return Err(ApiError::bad_request("photo_url is required"));
    }
    let ctx = state.repos.context();
    state
        .repos
        .lab_members
        .update_photo_url(&ctx, id, &payload.photo_url)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
