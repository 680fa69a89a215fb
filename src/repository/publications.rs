use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::database::models::{LabMember, Publication, PublicationWithAuthors};
use crate::database::{check_rows_affected, DbContext, DbError};

use super::CrudRepository;

const COLUMNS: &str = "id, title, authors_text, venue, year, url, created_at, updated_at";

const MEMBER_COLUMNS: &str =
    "m.id, m.name, m.role, m.email, m.bio, m.photo_url, m.personal_page_content, \
     m.research_interests, m.is_alumni, m.display_order, m.created_at, m.updated_at";

/// Data access for publications and their author associations.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicationRepository;

impl PublicationRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn get_by_year(&self, ctx: &DbContext, year: i64) -> Result<Vec<Publication>, DbError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM publications WHERE year = ?1 ORDER BY created_at DESC"
        );
        ctx.fetch_all("get publications by year", sqlx::query_as(&sql).bind(year))
            .await
    }

    /// Publications a lab member is linked to as an author.
    pub async fn get_by_member(
        &self,
        ctx: &DbContext,
        member_id: i64,
    ) -> Result<Vec<Publication>, DbError> {
        let sql = "SELECT p.id, p.title, p.authors_text, p.venue, p.year, p.url, \
                          p.created_at, p.updated_at \
                   FROM publications p \
                   INNER JOIN publication_authors pa ON p.id = pa.publication_id \
                   WHERE pa.member_id = ?1 \
                   ORDER BY p.year DESC, p.created_at DESC";
        ctx.fetch_all(
            "get publications by member",
            sqlx::query_as(sql).bind(member_id),
        )
        .await
    }

    /// Associate a lab member as an author. Linking an existing pair is a
    /// no-op.
    pub async fn link_author(
        &self,
        ctx: &DbContext,
        publication_id: i64,
        member_id: i64,
    ) -> Result<(), DbError> {
        ctx.execute(
            "link author to publication",
            sqlx::query(
                "INSERT INTO publication_authors (publication_id, member_id) \
                 VALUES (?1, ?2) \
                 ON CONFLICT (publication_id, member_id) DO NOTHING",
            )
            .bind(publication_id)
            .bind(member_id),
        )
        .await?;
        Ok(())
    }

    /// Remove an author association; `NotFound` if the pair is not linked.
    pub async fn unlink_author(
        &self,
        ctx: &DbContext,
        publication_id: i64,
        member_id: i64,
    ) -> Result<(), DbError> {
        let result = ctx
            .execute(
                "unlink author from publication",
                sqlx::query(
                    "DELETE FROM publication_authors \
                     WHERE publication_id = ?1 AND member_id = ?2",
                )
                .bind(publication_id)
                .bind(member_id),
            )
            .await?;
        check_rows_affected(result.rows_affected(), 1)
    }

    pub async fn get_authors(
        &self,
        ctx: &DbContext,
        publication_id: i64,
    ) -> Result<Vec<LabMember>, DbError> {
        let sql = format!(
            "SELECT {MEMBER_COLUMNS} FROM lab_members m \
             INNER JOIN publication_authors pa ON m.id = pa.member_id \
             WHERE pa.publication_id = ?1 \
             ORDER BY m.display_order ASC"
        );
        ctx.fetch_all(
            "get publication authors",
            sqlx::query_as(&sql).bind(publication_id),
        )
        .await
    }

    /// Publication plus its linked authors. Fails fast if the publication
    /// is missing; any sub-fetch failure fails the whole aggregate.
    pub async fn get_with_authors(
        &self,
        ctx: &DbContext,
        id: i64,
    ) -> Result<PublicationWithAuthors, DbError> {
        let publication = self.get_by_id(ctx, id).await?;
        let authors = self.get_authors(ctx, id).await?;
        Ok(PublicationWithAuthors {
            publication,
            authors,
        })
    }
}

#[async_trait]
impl CrudRepository<Publication> for PublicationRepository {
    async fn get_by_id(&self, ctx: &DbContext, id: i64) -> Result<Publication, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM publications WHERE id = ?1");
        ctx.fetch_one("get publication by id", sqlx::query_as(&sql).bind(id))
            .await
    }

    async fn get_all(&self, ctx: &DbContext) -> Result<Vec<Publication>, DbError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM publications ORDER BY year DESC, created_at DESC"
        );
        ctx.fetch_all("get all publications", sqlx::query_as(&sql))
            .await
    }

    async fn create(&self, ctx: &DbContext, publication: &Publication) -> Result<Publication, DbError> {
        let row: (i64, DateTime<Utc>, DateTime<Utc>) = ctx
            .fetch_one(
                "create publication",
                sqlx::query_as(
                    "INSERT INTO publications (title, authors_text, venue, year, url, created_at, updated_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, datetime('now'), datetime('now')) \
                     RETURNING id, created_at, updated_at",
                )
                .bind(&publication.title)
                .bind(&publication.authors_text)
                .bind(&publication.venue)
                .bind(publication.year)
                .bind(&publication.url),
            )
            .await?;

        Ok(Publication {
            id: row.0,
            created_at: row.1,
            updated_at: row.2,
            ..publication.clone()
        })
    }

    async fn update(&self, ctx: &DbContext, publication: &Publication) -> Result<Publication, DbError> {
        let row: (DateTime<Utc>,) = ctx
            .fetch_one(
                "update publication",
                sqlx::query_as(
                    "UPDATE publications \
                     SET title = ?1, authors_text = ?2, venue = ?3, year = ?4, url = ?5, \
                         updated_at = datetime('now') \
                     WHERE id = ?6 \
                     RETURNING updated_at",
                )
                .bind(&publication.title)
                .bind(&publication.authors_text)
                .bind(&publication.venue)
                .bind(publication.year)
                .bind(&publication.url)
                .bind(publication.id),
            )
            .await?;

        Ok(Publication {
            updated_at: row.0,
            ..publication.clone()
        })
    }

    async fn delete(&self, ctx: &DbContext, id: i64) -> Result<(), DbError> {
        let result = ctx
            .execute(
                "delete publication",
                sqlx::query("DELETE FROM publications WHERE id = ?1").bind(id),
            )
            .await?;
        check_rows_affected(result.rows_affected(), 1)
    }
}
