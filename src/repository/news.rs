use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::database::models::News;
use crate::database::{check_rows_affected, DbContext, DbError};

use super::CrudRepository;

const COLUMNS: &str = "id, title, content, published_at, is_published, created_at, updated_at";

/// Data access for news items and their publish workflow.
///
/// Caller-supplied `published_at` values are normalized to the store's
/// `%Y-%m-%d %H:%M:%S` UTC format on write, so SQL comparisons against
/// `datetime('now')` are well-defined.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewsRepository;

impl NewsRepository {
    pub fn new() -> Self {
        Self
    }

    /// Publicly visible items: published, with no publish timestamp or one
    /// not in the future, newest effective publish time first. A negative
    /// limit returns everything.
    pub async fn get_published(&self, ctx: &DbContext, limit: i64) -> Result<Vec<News>, DbError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM news \
             WHERE is_published = 1 \
               AND (published_at IS NULL OR published_at <= datetime('now')) \
             ORDER BY COALESCE(published_at, created_at) DESC \
             LIMIT ?1"
        );
        ctx.fetch_all("get published news", sqlx::query_as(&sql).bind(limit))
            .await
    }

    pub async fn get_drafts(&self, ctx: &DbContext) -> Result<Vec<News>, DbError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM news WHERE is_published = 0 ORDER BY created_at DESC"
        );
        ctx.fetch_all("get draft news", sqlx::query_as(&sql)).await
    }

    /// Mark an item published, stamping `published_at` with the current
    /// time.
    pub async fn publish(&self, ctx: &DbContext, id: i64) -> Result<(), DbError> {
        let result = ctx
            .execute(
                "publish news",
                sqlx::query(
                    "UPDATE news \
                     SET is_published = 1, published_at = datetime('now'), \
                         updated_at = datetime('now') \
                     WHERE id = ?1",
                )
                .bind(id),
            )
            .await?;
        check_rows_affected(result.rows_affected(), 1)
    }

    /// Mark an item unpublished. The publish timestamp is kept so
    /// republishing history stays inspectable.
    pub async fn unpublish(&self, ctx: &DbContext, id: i64) -> Result<(), DbError> {
        let result = ctx
            .execute(
                "unpublish news",
                sqlx::query(
                    "UPDATE news SET is_published = 0, updated_at = datetime('now') WHERE id = ?1",
                )
                .bind(id),
            )
            .await?;
        check_rows_affected(result.rows_affected(), 1)
    }
}

#[async_trait]
impl CrudRepository<News> for NewsRepository {
    async fn get_by_id(&self, ctx: &DbContext, id: i64) -> Result<News, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM news WHERE id = ?1");
        ctx.fetch_one("get news by id", sqlx::query_as(&sql).bind(id))
            .await
    }

    async fn get_all(&self, ctx: &DbContext) -> Result<Vec<News>, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM news ORDER BY created_at DESC");
        ctx.fetch_all("get all news", sqlx::query_as(&sql)).await
    }

    async fn create(&self, ctx: &DbContext, news: &News) -> Result<News, DbError> {
        let row: (i64, Option<DateTime<Utc>>, DateTime<Utc>, DateTime<Utc>) = ctx
            .fetch_one(
                "create news",
                sqlx::query_as(
                    "INSERT INTO news (title, content, published_at, is_published, created_at, updated_at) \
                     VALUES (?1, ?2, strftime('%Y-%m-%d %H:%M:%S', ?3), ?4, datetime('now'), datetime('now')) \
                     RETURNING id, published_at, created_at, updated_at",
                )
                .bind(&news.title)
                .bind(&news.content)
                .bind(news.published_at)
                .bind(news.is_published),
            )
            .await?;

        Ok(News {
            id: row.0,
            published_at: row.1,
            created_at: row.2,
            updated_at: row.3,
            ..news.clone()
        })
    }

    async fn update(&self, ctx: &DbContext, news: &News) -> Result<News, DbError> {
        let row: (Option<DateTime<Utc>>, DateTime<Utc>) = ctx
            .fetch_one(
                "update news",
                sqlx::query_as(
                    "UPDATE news \
                     SET title = ?1, content = ?2, \
                         published_at = strftime('%Y-%m-%d %H:%M:%S', ?3), is_published = ?4, \
                         updated_at = datetime('now') \
                     WHERE id = ?5 \
                     RETURNING published_at, updated_at",
                )
                .bind(&news.title)
                .bind(&news.content)
                .bind(news.published_at)
                .bind(news.is_published)
                .bind(news.id),
            )
            .await?;

        Ok(News {
            published_at: row.0,
            updated_at: row.1,
            ..news.clone()
        })
    }

    async fn delete(&self, ctx: &DbContext, id: i64) -> Result<(), DbError> {
        let result = ctx
            .execute(
                "delete news",
                sqlx::query("DELETE FROM news WHERE id = ?1").bind(id),
            )
            .await?;
        check_rows_affected(result.rows_affected(), 1)
    }
}
