use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::database::models::LabSetting;
use crate::database::{check_rows_affected, DbContext, DbError};

use super::CrudRepository;

const COLUMNS: &str = "id, setting_key, setting_value, created_at, updated_at";

/// Data access for lab-wide key/value settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabSettingRepository;

impl LabSettingRepository {
    pub fn new() -> Self {
        Self
    }

    /// Unique lookup by setting key; `NotFound` on an unknown key.
    pub async fn get_by_key(&self, ctx: &DbContext, key: &str) -> Result<LabSetting, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM lab_settings WHERE setting_key = ?1");
        ctx.fetch_one("get setting by key", sqlx::query_as(&sql).bind(key))
            .await
    }

    /// Just the value for a key; `NotFound` on an unknown key.
    pub async fn get_value(&self, ctx: &DbContext, key: &str) -> Result<String, DbError> {
        let row: Option<(String,)> = ctx
            .fetch_optional(
                "get setting value",
                sqlx::query_as("SELECT setting_value FROM lab_settings WHERE setting_key = ?1")
                    .bind(key),
            )
            .await?;
        row.map(|(value,)| value).ok_or(DbError::NotFound)
    }

    /// Insert the pair, or update the value if the key already exists.
    pub async fn upsert(
        &self,
        ctx: &DbContext,
        key: &str,
        value: &str,
    ) -> Result<LabSetting, DbError> {
        let sql = format!(
            "INSERT INTO lab_settings (setting_key, setting_value, created_at, updated_at) \
             VALUES (?1, ?2, datetime('now'), datetime('now')) \
             ON CONFLICT (setting_key) DO UPDATE \
                 SET setting_value = excluded.setting_value, updated_at = datetime('now') \
             RETURNING {COLUMNS}"
        );
        ctx.fetch_one("upsert setting", sqlx::query_as(&sql).bind(key).bind(value))
            .await
    }

    /// Change the value of an existing key; `NotFound` on an unknown key.
    pub async fn update_value_by_key(
        &self,
        ctx: &DbContext,
        key: &str,
        value: &str,
    ) -> Result<(), DbError> {
        let result = ctx
            .execute(
                "update setting value",
                sqlx::query(
                    "UPDATE lab_settings \
                     SET setting_value = ?1, updated_at = datetime('now') \
                     WHERE setting_key = ?2",
                )
                .bind(value)
                .bind(key),
            )
            .await?;
        check_rows_affected(result.rows_affected(), 1)
    }

    /// Remove a pair by key; `NotFound` on an unknown key.
    pub async fn delete_by_key(&self, ctx: &DbContext, key: &str) -> Result<(), DbError> {
        let result = ctx
            .execute(
                "delete setting by key",
                sqlx::query("DELETE FROM lab_settings WHERE setting_key = ?1").bind(key),
            )
            .await?;
        check_rows_affected(result.rows_affected(), 1)
    }
}

#[async_trait]
impl CrudRepository<LabSetting> for LabSettingRepository {
    async fn get_by_id(&self, ctx: &DbContext, id: i64) -> Result<LabSetting, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM lab_settings WHERE id = ?1");
        ctx.fetch_one("get setting by id", sqlx::query_as(&sql).bind(id))
            .await
    }

    async fn get_all(&self, ctx: &DbContext) -> Result<Vec<LabSetting>, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM lab_settings ORDER BY setting_key ASC");
        ctx.fetch_all("get all settings", sqlx::query_as(&sql)).await
    }

    async fn create(&self, ctx: &DbContext, setting: &LabSetting) -> Result<LabSetting, DbError> {
        let row: (i64, DateTime<Utc>, DateTime<Utc>) = ctx
            .fetch_one(
                "create setting",
                sqlx::query_as(
                    "INSERT INTO lab_settings (setting_key, setting_value, created_at, updated_at) \
                     VALUES (?1, ?2, datetime('now'), datetime('now')) \
                     RETURNING id, created_at, updated_at",
                )
                .bind(&setting.setting_key)
                .bind(&setting.setting_value),
            )
            .await?;

        Ok(LabSetting {
            id: row.0,
            created_at: row.1,
            updated_at: row.2,
            ..setting.clone()
        })
    }

    async fn update(&self, ctx: &DbContext, setting: &LabSetting) -> Result<LabSetting, DbError> {
        let row: (DateTime<Utc>,) = ctx
            .fetch_one(
                "update setting",
                sqlx::query_as(
                    "UPDATE lab_settings \
                     SET setting_key = ?1, setting_value = ?2, updated_at = datetime('now') \
                     WHERE id = ?3 \
                     RETURNING updated_at",
                )
                .bind(&setting.setting_key)
                .bind(&setting.setting_value)
                .bind(setting.id),
            )
            .await?;

        Ok(LabSetting {
            updated_at: row.0,
            ..setting.clone()
        })
    }

    async fn delete(&self, ctx: &DbContext, id: i64) -> Result<(), DbError> {
        let result = ctx
            .execute(
                "delete setting",
                sqlx::query("DELETE FROM lab_settings WHERE id = ?1").bind(id),
            )
            .await?;
        check_rows_affected(result.rows_affected(), 1)
    }
}
