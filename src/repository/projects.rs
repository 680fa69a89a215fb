use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::database::models::{LabMember, Project, ProjectStatus, ProjectWithRelations, Publication};
use crate::database::{check_rows_affected, DbContext, DbError};

use super::CrudRepository;

const COLUMNS: &str = "id, title, description, status, created_at, updated_at";

/// Data access for projects and their member/publication associations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectRepository;

impl ProjectRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn get_by_status(
        &self,
        ctx: &DbContext,
        status: ProjectStatus,
    ) -> Result<Vec<Project>, DbError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM projects WHERE status = ?1 ORDER BY created_at DESC"
        );
        ctx.fetch_all("get projects by status", sqlx::query_as(&sql).bind(status))
            .await
    }

    /// Associate a lab member with a project. Linking an existing pair is
    /// a no-op.
    pub async fn link_member(
        &self,
        ctx: &DbContext,
        project_id: i64,
        member_id: i64,
    ) -> Result<(), DbError> {
        ctx.execute(
            "link member to project",
            sqlx::query(
                "INSERT INTO project_members (project_id, member_id) \
                 VALUES (?1, ?2) \
                 ON CONFLICT (project_id, member_id) DO NOTHING",
            )
            .bind(project_id)
            .bind(member_id),
        )
        .await?;
        Ok(())
    }

    /// Remove a member association; `NotFound` if the pair is not linked.
    pub async fn unlink_member(
        &self,
        ctx: &DbContext,
        project_id: i64,
        member_id: i64,
    ) -> Result<(), DbError> {
        let result = ctx
            .execute(
                "unlink member from project",
                sqlx::query(
                    "DELETE FROM project_members WHERE project_id = ?1 AND member_id = ?2",
                )
                .bind(project_id)
                .bind(member_id),
            )
            .await?;
        check_rows_affected(result.rows_affected(), 1)
    }

    /// Associate a publication with a project. Linking an existing pair is
    /// a no-op.
    pub async fn link_publication(
        &self,
        ctx: &DbContext,
        project_id: i64,
        publication_id: i64,
    ) -> Result<(), DbError> {
        ctx.execute(
            "link publication to project",
            sqlx::query(
                "INSERT INTO project_publications (project_id, publication_id) \
                 VALUES (?1, ?2) \
                 ON CONFLICT (project_id, publication_id) DO NOTHING",
            )
            .bind(project_id)
            .bind(publication_id),
        )
        .await?;
        Ok(())
    }

    /// Remove a publication association; `NotFound` if the pair is not
    /// linked.
    pub async fn unlink_publication(
        &self,
        ctx: &DbContext,
        project_id: i64,
        publication_id: i64,
    ) -> Result<(), DbError> {
        let result = ctx
            .execute(
                "unlink publication from project",
                sqlx::query(
                    "DELETE FROM project_publications \
                     WHERE project_id = ?1 AND publication_id = ?2",
                )
                .bind(project_id)
                .bind(publication_id),
            )
            .await?;
        check_rows_affected(result.rows_affected(), 1)
    }

    pub async fn get_members(
        &self,
        ctx: &DbContext,
        project_id: i64,
    ) -> Result<Vec<LabMember>, DbError> {
        let sql = "SELECT m.id, m.name, m.role, m.email, m.bio, m.photo_url, \
                          m.personal_page_content, m.research_interests, m.is_alumni, \
                          m.display_order, m.created_at, m.updated_at \
                   FROM lab_members m \
                   INNER JOIN project_members pm ON m.id = pm.member_id \
                   WHERE pm.project_id = ?1 \
                   ORDER BY m.display_order ASC";
        ctx.fetch_all("get project members", sqlx::query_as(sql).bind(project_id))
            .await
    }

    pub async fn get_publications(
        &self,
        ctx: &DbContext,
        project_id: i64,
    ) -> Result<Vec<Publication>, DbError> {
        let sql = "SELECT p.id, p.title, p.authors_text, p.venue, p.year, p.url, \
                          p.created_at, p.updated_at \
                   FROM publications p \
                   INNER JOIN project_publications pp ON p.id = pp.publication_id \
                   WHERE pp.project_id = ?1 \
                   ORDER BY p.year DESC";
        ctx.fetch_all(
            "get project publications",
            sqlx::query_as(sql).bind(project_id),
        )
        .await
    }

    /// Project plus its linked members and publications. Fails fast if the
    /// project is missing; any sub-fetch failure fails the whole aggregate.
    pub async fn get_with_relations(
        &self,
        ctx: &DbContext,
        id: i64,
    ) -> Result<ProjectWithRelations, DbError> {
        let project = self.get_by_id(ctx, id).await?;
        let members = self.get_members(ctx, id).await?;
        let publications = self.get_publications(ctx, id).await?;
        Ok(ProjectWithRelations {
            project,
            members,
            publications,
        })
    }
}

#[async_trait]
impl CrudRepository<Project> for ProjectRepository {
    async fn get_by_id(&self, ctx: &DbContext, id: i64) -> Result<Project, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM projects WHERE id = ?1");
        ctx.fetch_one("get project by id", sqlx::query_as(&sql).bind(id))
            .await
    }

    async fn get_all(&self, ctx: &DbContext) -> Result<Vec<Project>, DbError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM projects \
             ORDER BY CASE status WHEN 'active' THEN 0 ELSE 1 END, created_at DESC"
        );
        ctx.fetch_all("get all projects", sqlx::query_as(&sql)).await
    }

    async fn create(&self, ctx: &DbContext, project: &Project) -> Result<Project, DbError> {
        let row: (i64, DateTime<Utc>, DateTime<Utc>) = ctx
            .fetch_one(
                "create project",
                sqlx::query_as(
                    "INSERT INTO projects (title, description, status, created_at, updated_at) \
                     VALUES (?1, ?2, ?3, datetime('now'), datetime('now')) \
                     RETURNING id, created_at, updated_at",
                )
                .bind(&project.title)
                .bind(&project.description)
                .bind(project.status),
            )
            .await?;

        Ok(Project {
            id: row.0,
            created_at: row.1,
            updated_at: row.2,
            ..project.clone()
        })
    }

    async fn update(&self, ctx: &DbContext, project: &Project) -> Result<Project, DbError> {
        let row: (DateTime<Utc>,) = ctx
            .fetch_one(
                "update project",
                sqlx::query_as(
                    "UPDATE projects \
                     SET title = ?1, description = ?2, status = ?3, updated_at = datetime('now') \
                     WHERE id = ?4 \
                     RETURNING updated_at",
                )
                .bind(&project.title)
                .bind(&project.description)
                .bind(project.status)
                .bind(project.id),
            )
            .await?;

        Ok(Project {
            updated_at: row.0,
            ..project.clone()
        })
    }

    async fn delete(&self, ctx: &DbContext, id: i64) -> Result<(), DbError> {
        let result = ctx
            .execute(
                "delete project",
                sqlx::query("DELETE FROM projects WHERE id = ?1").bind(id),
            )
            .await?;
        check_rows_affected(result.rows_affected(), 1)
    }
}
