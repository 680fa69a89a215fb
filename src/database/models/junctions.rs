use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Pure association rows; no lifecycle beyond link/unlink.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProjectMember {
    pub project_id: i64,
    pub member_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PublicationAuthor {
    pub publication_id: i64,
    pub member_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProjectPublication {
    pub project_id: i64,
    pub publication_id: i64,
}
