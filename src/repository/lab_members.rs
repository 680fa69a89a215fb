use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::database::models::{LabMember, LabMemberRole};
use crate::database::{check_rows_affected, DbContext, DbError};

use super::CrudRepository;

const COLUMNS: &str = "id, name, role, email, bio, photo_url, personal_page_content, \
                       research_interests, is_alumni, display_order, created_at, updated_at";

/// Data access for lab members.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabMemberRepository;

impl LabMemberRepository {
    pub fn new() -> Self {
        Self
    }

    /// Current members with the given role, ordered for display.
    pub async fn get_by_role(
        &self,
        ctx: &DbContext,
        role: LabMemberRole,
    ) -> Result<Vec<LabMember>, DbError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM lab_members \
             WHERE role = ?1 AND is_alumni = 0 \
             ORDER BY display_order ASC, created_at DESC"
        );
        ctx.fetch_all("get lab members by role", sqlx::query_as(&sql).bind(role))
            .await
    }

    pub async fn get_alumni(&self, ctx: &DbContext) -> Result<Vec<LabMember>, DbError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM lab_members \
             WHERE is_alumni = 1 \
             ORDER BY display_order ASC, created_at DESC"
        );
        ctx.fetch_all("get alumni", sqlx::query_as(&sql)).await
    }

    /// Toggle a member's alumni status.
    pub async fn mark_as_alumni(
        &self,
        ctx: &DbContext,
        id: i64,
        is_alumni: bool,
    ) -> Result<(), DbError> {
        let result = ctx
            .execute(
                "mark member as alumni",
                sqlx::query(
                    "UPDATE lab_members \
                     SET is_alumni = ?1, updated_at = datetime('now') \
                     WHERE id = ?2",
                )
                .bind(is_alumni)
                .bind(id),
            )
            .await?;
        check_rows_affected(result.rows_affected(), 1)
    }

    pub async fn update_photo_url(
        &self,
        ctx: &DbContext,
        id: i64,
        photo_url: &str,
    ) -> Result<(), DbError> {
        let result = ctx
            .execute(
                "update member photo",
                sqlx::query(
                    "UPDATE lab_members \
                     SET photo_url = ?1, updated_at = datetime('now') \
                     WHERE id = ?2",
                )
                .bind(photo_url)
                .bind(id),
            )
            .await?;
        check_rows_affected(result.rows_affected(), 1)
    }
}

#[async_trait]
impl CrudRepository<LabMember> for LabMemberRepository {
    async fn get_by_id(&self, ctx: &DbContext, id: i64) -> Result<LabMember, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM lab_members WHERE id = ?1");
        ctx.fetch_one("get lab member by id", sqlx::query_as(&sql).bind(id))
            .await
    }

    async fn get_all(&self, ctx: &DbContext) -> Result<Vec<LabMember>, DbError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM lab_members \
             ORDER BY is_alumni ASC, display_order ASC, created_at DESC"
        );
        ctx.fetch_all("get all lab members", sqlx::query_as(&sql))
            .await
    }

    async fn create(&self, ctx: &DbContext, member: &LabMember) -> Result<LabMember, DbError> {
        let row: (i64, DateTime<Utc>, DateTime<Utc>) = ctx
            .fetch_one(
                "create lab member",
                sqlx::query_as(
                    "INSERT INTO lab_members ( \
                         name, role, email, bio, photo_url, personal_page_content, \
                         research_interests, is_alumni, display_order, created_at, updated_at \
                     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, datetime('now'), datetime('now')) \
                     RETURNING id, created_at, updated_at",
                )
                .bind(&member.name)
                .bind(member.role)
                .bind(&member.email)
                .bind(&member.bio)
                .bind(&member.photo_url)
                .bind(&member.personal_page_content)
                .bind(&member.research_interests)
                .bind(member.is_alumni)
                .bind(member.display_order),
            )
            .await?;

        Ok(LabMember {
            id: row.0,
            created_at: row.1,
            updated_at: row.2,
            ..member.clone()
        })
    }

    async fn update(&self, ctx: &DbContext, member: &LabMember) -> Result<LabMember, DbError> {
        let row: (DateTime<Utc>,) = ctx
            .fetch_one(
                "update lab member",
                sqlx::query_as(
                    "UPDATE lab_members \
                     SET name = ?1, role = ?2, email = ?3, bio = ?4, photo_url = ?5, \
                         personal_page_content = ?6, research_interests = ?7, is_alumni = ?8, \
                         display_order = ?9, updated_at = datetime('now') \
                     WHERE id = ?10 \
                     RETURNING updated_at",
                )
                .bind(&member.name)
                .bind(member.role)
                .bind(&member.email)
                .bind(&member.bio)
                .bind(&member.photo_url)
                .bind(&member.personal_page_content)
                .bind(&member.research_interests)
                .bind(member.is_alumni)
                .bind(member.display_order)
                .bind(member.id),
            )
            .await?;

        Ok(LabMember {
            updated_at: row.0,
            ..member.clone()
        })
    }

    async fn delete(&self, ctx: &DbContext, id: i64) -> Result<(), DbError> {
        let result = ctx
            .execute(
                "delete lab member",
                sqlx::query("DELETE FROM lab_members WHERE id = ?1").bind(id),
            )
            .await?;
        check_rows_affected(result.rows_affected(), 1)
    }
}
