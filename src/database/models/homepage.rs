use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An editable section of the homepage, addressed by its key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct HomepageSection {
    pub id: i64,
    pub section_key: String,
    pub title: String,
    pub content: String,
    pub display_order: i64,
    pub updated_at: DateTime<Utc>,
}

/// Fixed section vocabulary seeded at initialization.
pub const SECTION_OVERVIEW: &str = "overview";
pub const SECTION_MISSION: &str = "mission";
pub const SECTION_RESEARCH: &str = "research";
pub const SECTION_CONTACT: &str = "contact";
