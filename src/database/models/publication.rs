use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::lab_member::LabMember;

/// Publication years accepted by the schema and the boundary validation.
pub const MIN_YEAR: i64 = 1900;
pub const MAX_YEAR: i64 = 2100;

/// A research publication. `authors_text` is the free-text author list as
/// it appears in the citation; linked `LabMember` rows are tracked
/// separately through the author junction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Publication {
    pub id: i64,
    pub title: String,
    pub authors_text: String,
    pub venue: Option<String>,
    pub year: i64,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicationWithAuthors {
    #[serde(flatten)]
    pub publication: Publication,
    pub authors: Vec<LabMember>,
}
