use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum LabMemberRole {
    #[serde(rename = "PI")]
    #[sqlx(rename = "PI")]
    Pi,
    Postdoc,
    #[serde(rename = "PhD")]
    #[sqlx(rename = "PhD")]
    Phd,
    Master,
    Bachelor,
    Researcher,
}

impl LabMemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabMemberRole::Pi => "PI",
            LabMemberRole::Postdoc => "Postdoc",
            LabMemberRole::Phd => "PhD",
            LabMemberRole::Master => "Master",
            LabMemberRole::Bachelor => "Bachelor",
            LabMemberRole::Researcher => "Researcher",
        }
    }
}

/// A lab member, current or alumni. Listing order is controlled by
/// `display_order` within the non-alumni / alumni groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct LabMember {
    pub id: i64,
    pub name: String,
    pub role: LabMemberRole,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub personal_page_content: Option<String>,
    pub research_interests: Option<String>,
    pub is_alumni: bool,
    pub display_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
