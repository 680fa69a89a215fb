mod common;

use anyhow::Result;
use chrono::{Duration, Utc};

use lab_cms_api::database::DbError;
use lab_cms_api::repository::CrudRepository;

#[tokio::test]
async fn published_feed_applies_visibility_rules() -> Result<()> {
    let factory = common::test_factory().await?;
    let ctx = factory.context();

    factory
        .news
        .create(
            &ctx,
            &common::news_item("Past", true, Some(Utc::now() - Duration::hours(2))),
        )
        .await?;
    factory
        .news
        .create(
            &ctx,
            &common::news_item("Scheduled", true, Some(Utc::now() + Duration::hours(2))),
        )
        .await?;
    factory
        .news
        .create(&ctx, &common::news_item("Immediate", true, None))
        .await?;
    factory
        .news
        .create(&ctx, &common::news_item("Draft", false, None))
        .await?;

    let feed = factory.news.get_published(&ctx, 10).await?;
    let titles: Vec<&str> = feed.iter().map(|n| n.title.as_str()).collect();

    // Never an unpublished item, never a future one.
    assert!(!titles.contains(&"Scheduled"));
    assert!(!titles.contains(&"Draft"));
    // "Immediate" has no publish timestamp, so its effective publish time
    // is its creation time - newer than "Past".
    assert_eq!(titles, vec!["Immediate", "Past"]);
    Ok(())
}

#[tokio::test]
async fn published_feed_honors_the_limit() -> Result<()> {
    let factory = common::test_factory().await?;
    let ctx = factory.context();

    for i in 0..5 {
        factory
            .news
            .create(&ctx, &common::news_item(&format!("Item {i}"), true, None))
            .await?;
    }

    assert_eq!(factory.news.get_published(&ctx, 3).await?.len(), 3);
    assert_eq!(factory.news.get_published(&ctx, 10).await?.len(), 5);
    Ok(())
}

#[tokio::test]
async fn drafts_lists_only_unpublished_items() -> Result<()> {
    let factory = common::test_factory().await?;
    let ctx = factory.context();

    factory
        .news
        .create(&ctx, &common::news_item("Live", true, None))
        .await?;
    factory
        .news
        .create(&ctx, &common::news_item("In Progress", false, None))
        .await?;

    let drafts = factory.news.get_drafts(&ctx).await?;
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].title, "In Progress");
    Ok(())
}

#[tokio::test]
async fn publish_stamps_the_timestamp() -> Result<()> {
    let factory = common::test_factory().await?;
    let ctx = factory.context();

    let draft = factory
        .news
        .create(&ctx, &common::news_item("Announcement", false, None))
        .await?;
    assert!(draft.published_at.is_none());

    factory.news.publish(&ctx, draft.id).await?;
    let live = factory.news.get_by_id(&ctx, draft.id).await?;
    assert!(live.is_published);
    assert!(live.published_at.is_some());
    assert!(live.is_published_now());

    factory.news.unpublish(&ctx, draft.id).await?;
    let pulled = factory.news.get_by_id(&ctx, draft.id).await?;
    assert!(!pulled.is_published);
    // The original publish timestamp stays on record.
    assert!(pulled.published_at.is_some());
    assert!(!pulled.is_published_now());
    Ok(())
}

#[tokio::test]
async fn publish_on_missing_id_fails_not_found() -> Result<()> {
    let factory = common::test_factory().await?;
    let ctx = factory.context();

    let err = factory.news.publish(&ctx, 777).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound));
    let err = factory.news.unpublish(&ctx, 777).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound));
    Ok(())
}

#[tokio::test]
async fn scheduled_item_round_trips_with_second_precision() -> Result<()> {
    let factory = common::test_factory().await?;
    let ctx = factory.context();

    let scheduled_for = Utc::now() + Duration::days(1);
    let created = factory
        .news
        .create(&ctx, &common::news_item("Later", true, Some(scheduled_for)))
        .await?;

    let stored = created.published_at.expect("timestamp should be stored");
    assert!((stored - scheduled_for).num_seconds().abs() <= 1);
    assert!(!created.is_published_now());

    let fetched = factory.news.get_by_id(&ctx, created.id).await?;
    assert_eq!(fetched.published_at, created.published_at);
    Ok(())
}
