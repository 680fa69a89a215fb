use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;

use crate::database::models::{User, UserRole};
use crate::error::ApiError;

use super::AppState;

// User creation and password changes belong to the auth collaborator;
// this surface manages email and role only and never sees credentials.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/users", get(list))
        .route(
            "/api/admin/users/:id",
            get(get_one).put(update).delete(delete_one),
        )
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let ctx = state.repos.context();
    Ok(Json(state.repos.users.get_all(&ctx).await?))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    let ctx = state.repos.context();
    Ok(Json(state.repos.users.get_by_id(&ctx, id).await?))
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    email: String,
    role: UserRole,
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserPayload>,
) -> Result<Json<User>, ApiError> {
    if payload.email.trim().is_empty() || !payload.email.contains('@') {
        return Err(ApiError::bad_request("a valid email is required"));
    }
    let ctx = state.repos.context();
    let user = User {
        id,
        email: payload.email,
        role: payload.role,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    Ok(Json(state.repos.users.update(&ctx, &user).await?))
}

async fn delete_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let ctx = state.repos.context();
    state.repos.users.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
