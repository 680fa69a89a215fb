use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::database::models::HomepageSection;
use crate::database::{check_rows_affected, DbContext, DbError};

use super::CrudRepository;

const COLUMNS: &str = "id, section_key, title, content, display_order, updated_at";

/// Data access for homepage sections. Sections are seeded at
/// initialization and addressed by their unique key.
#[derive(Debug, Clone, Copy, Default)]
pub struct HomepageRepository;

impl HomepageRepository {
    pub fn new() -> Self {
        Self
    }

    /// Unique lookup by section key; `NotFound` on an unknown key.
    pub async fn get_by_key(&self, ctx: &DbContext, key: &str) -> Result<HomepageSection, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM homepage_sections WHERE section_key = ?1");
        ctx.fetch_one(
            "get homepage section by key",
            sqlx::query_as(&sql).bind(key),
        )
        .await
    }

    /// Partial update of title and content only.
    pub async fn update_content(
        &self,
        ctx: &DbContext,
        id: i64,
        title: &str,
        content: &str,
    ) -> Result<(), DbError> {
        let result = ctx
            .execute(
                "update section content",
                sqlx::query(
                    "UPDATE homepage_sections \
                     SET title = ?1, content = ?2, updated_at = datetime('now') \
                     WHERE id = ?3",
                )
                .bind(title)
                .bind(content)
                .bind(id),
            )
            .await?;
        check_rows_affected(result.rows_affected(), 1)
    }

    /// Partial update of title and content, addressed by section key.
    pub async fn update_content_by_key(
        &self,
        ctx: &DbContext,
        key: &str,
        title: &str,
        content: &str,
    ) -> Result<(), DbError> {
        let result = ctx
            .execute(
                "update section content by key",
                sqlx::query(
                    "UPDATE homepage_sections \
                     SET title = ?1, content = ?2, updated_at = datetime('now') \
                     WHERE section_key = ?3",
                )
                .bind(title)
                .bind(content)
                .bind(key),
            )
            .await?;
        check_rows_affected(result.rows_affected(), 1)
    }
}

#[async_trait]
impl CrudRepository<HomepageSection> for HomepageRepository {
    async fn get_by_id(&self, ctx: &DbContext, id: i64) -> Result<HomepageSection, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM homepage_sections WHERE id = ?1");
        ctx.fetch_one("get homepage section by id", sqlx::query_as(&sql).bind(id))
            .await
    }

    async fn get_all(&self, ctx: &DbContext) -> Result<Vec<HomepageSection>, DbError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM homepage_sections ORDER BY display_order ASC, id ASC"
        );
        ctx.fetch_all("get all homepage sections", sqlx::query_as(&sql))
            .await
    }

    async fn create(
        &self,
        ctx: &DbContext,
        section: &HomepageSection,
    ) -> Result<HomepageSection, DbError> {
        let row: (i64, DateTime<Utc>) = ctx
            .fetch_one(
                "create homepage section",
                sqlx::query_as(
                    "INSERT INTO homepage_sections (section_key, title, content, display_order, updated_at) \
                     VALUES (?1, ?2, ?3, ?4, datetime('now')) \
                     RETURNING id, updated_at",
                )
                .bind(&section.section_key)
                .bind(&section.title)
                .bind(&section.content)
                .bind(section.display_order),
            )
            .await?;

        Ok(HomepageSection {
            id: row.0,
            updated_at: row.1,
            ..section.clone()
        })
    }

    async fn update(
        &self,
        ctx: &DbContext,
        section: &HomepageSection,
    ) -> Result<HomepageSection, DbError> {
        let row: (DateTime<Utc>,) = ctx
            .fetch_one(
                "update homepage section",
                sqlx::query_as(
                    "UPDATE homepage_sections \
                     SET title = ?1, content = ?2, display_order = ?3, updated_at = datetime('now') \
                     WHERE id = ?4 \
                     RETURNING updated_at",
                )
                .bind(&section.title)
                .bind(&section.content)
                .bind(section.display_order)
                .bind(section.id),
            )
            .await?;

        Ok(HomepageSection {
            updated_at: row.0,
            ..section.clone()
        })
    }

    async fn delete(&self, ctx: &DbContext, id: i64) -> Result<(), DbError> {
        let result = ctx
            .execute(
                "delete homepage section",
                sqlx::query("DELETE FROM homepage_sections WHERE id = ?1").bind(id),
            )
            .await?;
        check_rows_affected(result.rows_affected(), 1)
    }
}
