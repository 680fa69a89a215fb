use chrono::{DateTime, Utc};

use crate::database::models::{User, UserWithPassword};
use crate::database::{check_rows_affected, DbContext, DbError};

const COLUMNS: &str = "id, email, role, created_at, updated_at";

/// Data access for admin users.
///
/// This repository does not implement the generic contract: its create
/// path carries the credential. The generic-shaped operations return
/// `User` without the password hash; only `get_by_email`, `create` and
/// `update_password` ever read or write the secret.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserRepository;

impl UserRepository {
    pub fn new() -> Self {
        Self
    }

    /// Fails with `NotFound` if no user has this id.
    pub async fn get_by_id(&self, ctx: &DbContext, id: i64) -> Result<User, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE id = ?1");
        ctx.fetch_one("get user by id", sqlx::query_as(&sql).bind(id))
            .await
    }

    /// Credential-bearing lookup for authentication; `NotFound` on an
    /// unknown email.
    pub async fn get_by_email(
        &self,
        ctx: &DbContext,
        email: &str,
    ) -> Result<UserWithPassword, DbError> {
        let sql = "SELECT id, email, role, password_hash, created_at, updated_at \
                   FROM users WHERE email = ?1";
        ctx.fetch_one("get user by email", sqlx::query_as(sql).bind(email))
            .await
    }

    pub async fn get_all(&self, ctx: &DbContext) -> Result<Vec<User>, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC");
        ctx.fetch_all("get all users", sqlx::query_as(&sql)).await
    }

    /// Insert a new user with their credential. Fails with `Duplicate` on
    /// an email collision.
    pub async fn create(
        &self,
        ctx: &DbContext,
        user: &UserWithPassword,
    ) -> Result<UserWithPassword, DbError> {
        let row: (i64, DateTime<Utc>, DateTime<Utc>) = ctx
            .fetch_one(
                "create user",
                sqlx::query_as(
                    "INSERT INTO users (email, role, password_hash, created_at, updated_at) \
                     VALUES (?1, ?2, ?3, datetime('now'), datetime('now')) \
                     RETURNING id, created_at, updated_at",
                )
                .bind(&user.email)
                .bind(user.role)
                .bind(&user.password_hash),
            )
            .await?;

        Ok(UserWithPassword {
            id: row.0,
            created_at: row.1,
            updated_at: row.2,
            ..user.clone()
        })
    }

    /// Full replace of email and role; the credential is untouched.
    pub async fn update(&self, ctx: &DbContext, user: &User) -> Result<User, DbError> {
        let row: (DateTime<Utc>,) = ctx
            .fetch_one(
                "update user",
                sqlx::query_as(
                    "UPDATE users \
                     SET email = ?1, role = ?2, updated_at = datetime('now') \
                     WHERE id = ?3 \
                     RETURNING updated_at",
                )
                .bind(&user.email)
                .bind(user.role)
                .bind(user.id),
            )
            .await?;

        Ok(User {
            updated_at: row.0,
            ..user.clone()
        })
    }

    /// Replace a user's password hash; `NotFound` if the id does not exist.
    pub async fn update_password(
        &self,
        ctx: &DbContext,
        id: i64,
        password_hash: &str,
    ) -> Result<(), DbError> {
        let result = ctx
            .execute(
                "update password",
                sqlx::query(
                    "UPDATE users SET password_hash = ?1, updated_at = datetime('now') WHERE id = ?2",
                )
                .bind(password_hash)
                .bind(id),
            )
            .await?;
        check_rows_affected(result.rows_affected(), 1)
    }

    pub async fn delete(&self, ctx: &DbContext, id: i64) -> Result<(), DbError> {
        let result = ctx
            .execute(
                "delete user",
                sqlx::query("DELETE FROM users WHERE id = ?1").bind(id),
            )
            .await?;
        check_rows_affected(result.rows_affected(), 1)
    }
}
