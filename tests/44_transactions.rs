mod common;

use anyhow::Result;

use lab_cms_api::database::models::{LabMemberRole, ProjectStatus};
use lab_cms_api::database::DbError;
use lab_cms_api::repository::CrudRepository;

#[tokio::test]
async fn successful_transaction_commits() -> Result<()> {
    let factory = common::test_factory().await?;
    let ctx = factory.context();

    let repos = factory.clone();
    let created = factory
        .run_in_transaction(&ctx, move |txc| async move {
            assert!(txc.in_transaction());
            repos
                .projects
                .create(&txc, &common::project("Committed", ProjectStatus::Active))
                .await
        })
        .await?;

    let fetched = factory.projects.get_by_id(&ctx, created.id).await?;
    assert_eq!(fetched.title, "Committed");
    Ok(())
}

#[tokio::test]
async fn failed_transaction_rolls_back_every_write() -> Result<()> {
    let factory = common::test_factory().await?;
    let ctx = factory.context();

    let repos = factory.clone();
    let result: Result<(), DbError> = factory
        .run_in_transaction(&ctx, move |txc| async move {
            repos
                .projects
                .create(&txc, &common::project("Doomed", ProjectStatus::Active))
                .await?;
            repos
                .lab_members
                .create(&txc, &common::member("Also Doomed", LabMemberRole::Phd))
                .await?;
            Err(DbError::InvalidInput("forced failure".into()))
        })
        .await;

    assert!(matches!(result, Err(DbError::InvalidInput(_))));
    assert!(factory.projects.get_all(&ctx).await?.is_empty());
    assert!(factory.lab_members.get_all(&ctx).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn nested_call_reuses_the_outer_transaction() -> Result<()> {
    let factory = common::test_factory().await?;
    let ctx = factory.context();

    // The inner run_in_transaction must join the outer unit of work, so
    // an outer failure takes the inner write down with it.
    let outer = factory.clone();
    let result: Result<(), DbError> = factory
        .run_in_transaction(&ctx, move |txc| async move {
            let inner = outer.clone();
            let member = outer
                .run_in_transaction(&txc, move |inner_ctx| async move {
                    assert!(inner_ctx.in_transaction());
                    inner
                        .lab_members
                        .create(&inner_ctx, &common::member("Inner Write", LabMemberRole::Pi))
                        .await
                })
                .await?;
            assert!(member.id > 0);
            Err(DbError::InvalidInput("outer failure".into()))
        })
        .await;

    assert!(result.is_err());
    assert!(factory.lab_members.get_all(&ctx).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn nested_success_commits_once_at_the_outer_level() -> Result<()> {
    let factory = common::test_factory().await?;
    let ctx = factory.context();

    let outer = factory.clone();
    factory
        .run_in_transaction(&ctx, move |txc| async move {
            let inner = outer.clone();
            outer
                .run_in_transaction(&txc, move |inner_ctx| async move {
                    inner
                        .projects
                        .create(&inner_ctx, &common::project("Nested", ProjectStatus::Active))
                        .await
                })
                .await?;
            Ok(())
        })
        .await?;

    assert_eq!(factory.projects.get_all(&ctx).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn transaction_sees_its_own_writes() -> Result<()> {
    let factory = common::test_factory().await?;
    let ctx = factory.context();

    let repos = factory.clone();
    factory
        .run_in_transaction(&ctx, move |txc| async move {
            let created = repos
                .projects
                .create(&txc, &common::project("Visible Inside", ProjectStatus::Active))
                .await?;
            let fetched = repos.projects.get_by_id(&txc, created.id).await?;
            assert_eq!(fetched.title, "Visible Inside");
            Ok(())
        })
        .await?;
    Ok(())
}
