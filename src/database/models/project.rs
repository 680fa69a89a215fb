use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::lab_member::LabMember;
use super::publication::Publication;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Completed,
}

/// A research project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Project together with its linked members and publications.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectWithRelations {
    #[serde(flatten)]
    pub project: Project,
    pub members: Vec<LabMember>,
    pub publications: Vec<Publication>,
}
