use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;

use crate::database::models::publication::{MAX_YEAR, MIN_YEAR};
use crate::database::models::{Publication, PublicationWithAuthors};
use crate::error::ApiError;
use crate::repository::CrudRepository;

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/publications", get(list))
        .route("/api/publications/:id", get(get_one))
        .route("/api/admin/publications", post(create))
        .route(
            "/api/admin/publications/:id",
            put(update).delete(delete_one),
        )
        .route(
            "/api/admin/publications/:id/authors/:member_id",
            post(link_author).delete(unlink_author),
        )
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    year: Option<i64>,
}

async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Publication>>, ApiError> {
    let ctx = state.repos.context();
    let publications = match query.year {
        Some(year) => state.repos.publications.get_by_year(&ctx, year).await?,
        None => state.repos.publications.get_all(&ctx).await?,
    };
    Ok(Json(publications))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PublicationWithAuthors>, ApiError> {
    let ctx = state.repos.context();
    Ok(Json(
        state.repos.publications.get_with_authors(&ctx, id).await?,
    ))
}

#[derive(Debug, Deserialize)]
struct PublicationPayload {
    title: String,
    authors_text: String,
    #[serde(default)]
    venue: Option<String>,
    year: i64,
    #[serde(default)]
    url: Option<String>,
    /// Lab members to link as authors on create, atomically.
    #[serde(default)]
    author_ids: Vec<i64>,
}

impl PublicationPayload {
    fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::bad_request("title is required"));
        }
        if self.authors_text.trim().is_empty() {
            return Err(ApiError::bad_request("authors_text is required"));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&self.year) {
            return Err(ApiError::bad_request(format!(
                "year must be between {MIN_YEAR} and {MAX_YEAR}"
            )));
        }
        Ok(())
    }

    fn into_publication(self, id: i64) -> (Publication, Vec<i64>) {
        let publication = Publication {
            id,
            title: self.title,
            authors_text: self.authors_text,
            venue: self.venue,
            year: self.year,
            url: self.url,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        (publication, self.author_ids)
    }
}

/// Create a publication and link the given authors in one transaction; a
/// bad author id rolls the whole thing back.
async fn create(
    State(state): State<AppState>,
    Json(payload): Json<PublicationPayload>,
) -> Result<(StatusCode, Json<Publication>), ApiError> {
    payload.validate()?;
    let (publication, author_ids) = payload.into_publication(0);

    let repo = state.repos.publications;
    let ctx = state.repos.context();
    let created = state
        .repos
        .run_in_transaction(&ctx, move |txc| async move {
            let created = repo.create(&txc, &publication).await?;
            for member_id in author_ids {
                repo.link_author(&txc, created.id, member_id).await?;
            }
            Ok(created)
        })
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<PublicationPayload>,
) -> Result<Json<Publication>, ApiError> {
    payload.validate()?;
    let (publication, _) = payload.into_publication(id);
    let ctx = state.repos.context();
    Ok(Json(
        state.repos.publications.update(&ctx, &publication).await?,
    ))
}

async fn delete_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let ctx = state.repos.context();
    state.repos.publications.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn link_author(
    State(state): State<AppState>,
    Path((id, member_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    let ctx = state.repos.context();
    state
        .repos
        .publications
        .link_author(&ctx, id, member_id)
        .await
        .map_err(|e| {
            if e.is_foreign_key_violation() {
                ApiError::not_found("publication or member not found")
            } else {
                e.into()
            }
        })?;
    Ok(StatusCode::NO_CONTENT)
}

async fn unlink_author(
    State(state): State<AppState>,
    Path((id, member_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    let ctx = state.repos.context();
    state
        .repos
        .publications
        .unlink_author(&ctx, id, member_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
