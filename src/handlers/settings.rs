use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;

use crate::database::models::LabSetting;
use crate::error::ApiError;
use crate::repository::CrudRepository;

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/settings", get(list))
        .route("/api/settings/:key", get(get_by_key))
        .route(
            "/api/admin/settings/:key",
            put(upsert).delete(delete_by_key),
        )
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<LabSetting>>, ApiError> {
    let ctx = state.repos.context();
    Ok(Json(state.repos.lab_settings.get_all(&ctx).await?))
}

async fn get_by_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<LabSetting>, ApiError> {
    let ctx = state.repos.context();
    Ok(Json(state.repos.lab_settings.get_by_key(&ctx, &key).await?))
}

#[derive(Debug, Deserialize)]
struct SettingPayload {
    value: String,
}

async fn upsert(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(payload): Json<SettingPayload>,
) -> Result<Json<LabSetting>, ApiError> {
    if key.trim().is_empty() {
        return Err(ApiError::bad_request("setting key is required"));
    }
    let ctx = state.repos.context();
    Ok(Json(
        state
            .repos
            .lab_settings
            .upsert(&ctx, &key, &payload.value)
            .await?,
    ))
}

async fn delete_by_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<StatusCode, ApiError> {
    let ctx = state.repos.context();
    state.repos.lab_settings.delete_by_key(&ctx, &key).await?;
    Ok(StatusCode::NO_CONTENT)
}
