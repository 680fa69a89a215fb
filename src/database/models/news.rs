use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A news item or announcement.
///
/// An item is publicly visible once `is_published` is set and its
/// `published_at`, when present, is not in the future. An item published
/// without an explicit timestamp is visible immediately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct News {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub published_at: Option<DateTime<Utc>>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl News {
    /// Whether the item should be visible to the public right now.
    pub fn is_published_now(&self) -> bool {
        self.is_published
            && self
                .published_at
                .map(|at| at <= Utc::now())
                .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn item(is_published: bool, published_at: Option<DateTime<Utc>>) -> News {
        News {
            id: 1,
            title: "Paper accepted".into(),
            content: "Details to follow.".into(),
            published_at,
            is_published,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn unpublished_item_is_hidden() {
        assert!(!item(false, None).is_published_now());
        assert!(!item(false, Some(Utc::now() - Duration::hours(1))).is_published_now());
    }

    #[test]
    fn published_without_timestamp_is_visible() {
        assert!(item(true, None).is_published_now());
    }

    #[test]
    fn published_in_the_past_is_visible() {
        assert!(item(true, Some(Utc::now() - Duration::minutes(5))).is_published_now());
    }

    #[test]
    fn scheduled_in_the_future_is_hidden() {
        assert!(!item(true, Some(Utc::now() + Duration::hours(2))).is_published_now());
    }
}
