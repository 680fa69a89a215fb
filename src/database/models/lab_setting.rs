use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Freeform key-value configuration pair for the lab site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct LabSetting {
    pub id: i64,
    pub setting_key: String,
    pub setting_value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const SETTING_LAB_NAME: &str = "lab_name";
pub const SETTING_LAB_DESCRIPTION: &str = "lab_description";
