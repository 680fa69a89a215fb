#![allow(dead_code)]

use anyhow::Result;
use chrono::{DateTime, Utc};

use lab_cms_api::database::models::{
    LabMember, LabMemberRole, News, Project, ProjectStatus, Publication,
};
use lab_cms_api::database::{migrations, DbManager};
use lab_cms_api::repository::RepositoryFactory;

/// Fresh in-memory database with the full schema applied.
pub async fn test_factory() -> Result<RepositoryFactory> {
    let manager = DbManager::in_memory().await?;
    migrations::run(manager.pool()).await?;
    Ok(RepositoryFactory::new(manager))
}

pub async fn count_rows(factory: &RepositoryFactory, table: &str) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {table}");
    let count = sqlx::query_scalar(&sql)
        .fetch_one(factory.manager().pool())
        .await?;
    Ok(count)
}

pub fn member(name: &str, role: LabMemberRole) -> LabMember {
    LabMember {
        id: 0,
        name: name.to_string(),
        role,
        email: None,
        bio: None,
        photo_url: None,
        personal_page_content: None,
        research_interests: None,
        is_alumni: false,
        display_order: 0,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn project(title: &str, status: ProjectStatus) -> Project {
    Project {
        id: 0,
        title: title.to_string(),
        description: "A research project.".to_string(),
        status,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn publication(title: &str, year: i64) -> Publication {
    Publication {
        id: 0,
        title: title.to_string(),
        authors_text: "A. Researcher, B. Scientist".to_string(),
        venue: None,
        year,
        url: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn news_item(title: &str, is_published: bool, published_at: Option<DateTime<Utc>>) -> News {
    News {
        id: 0,
        title: title.to_string(),
        content: "Some announcement text.".to_string(),
        published_at,
        is_published,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
