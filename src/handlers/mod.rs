//! Thin HTTP layer over the repository factory.
//!
//! Public read routes live under `/api`; admin mutations under
//! `/api/admin` (authentication middleware is mounted by the deployment,
//! not here). Handlers validate input shape, call repositories, and map
//! `DbError` onto HTTP statuses via `ApiError`.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::repository::RepositoryFactory;

pub mod homepage;
pub mod members;
pub mod news;
pub mod projects;
pub mod publications;
pub mod settings;
pub mod users;

#[derive(Clone)]
pub struct AppState {
    pub repos: RepositoryFactory,
    pub config: AppConfig,
}

pub fn router(repos: RepositoryFactory, config: &AppConfig) -> Router {
    let state = AppState {
        repos,
        config: config.clone(),
    };

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(members::routes())
        .merge(publications::routes())
        .merge(projects::routes())
        .merge(news::routes())
        .merge(homepage::routes())
        .merge(settings::routes())
        .merge(users::routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Lab CMS API",
            "version": version,
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "members": "/api/members (public), /api/admin/members (admin)",
                "publications": "/api/publications (public), /api/admin/publications (admin)",
                "projects": "/api/projects (public), /api/admin/projects (admin)",
                "news": "/api/news (public), /api/admin/news (admin)",
                "homepage": "/api/homepage (public), /api/admin/homepage (admin)",
                "settings": "/api/settings (public), /api/admin/settings (admin)",
                "users": "/api/admin/users (admin)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.repos.manager().ping().await {
        Ok(()) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
