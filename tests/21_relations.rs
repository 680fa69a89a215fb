mod common;

use anyhow::Result;

use lab_cms_api::database::models::{LabMemberRole, ProjectMember, ProjectStatus};
use lab_cms_api::database::DbError;
use lab_cms_api::repository::CrudRepository;

#[tokio::test]
async fn project_aggregate_returns_linked_member() -> Result<()> {
    let factory = common::test_factory().await?;
    let ctx = factory.context();

    let project = factory
        .projects
        .create(&ctx, &common::project("AI Lab", ProjectStatus::Active))
        .await?;
    let member = factory
        .lab_members
        .create(&ctx, &common::member("A. Researcher", LabMemberRole::Phd))
        .await?;

    factory.projects.link_member(&ctx, project.id, member.id).await?;

    let aggregate = factory.projects.get_with_relations(&ctx, project.id).await?;
    assert_eq!(aggregate.project.title, "AI Lab");
    assert_eq!(aggregate.members.len(), 1);
    assert_eq!(aggregate.members[0].name, "A. Researcher");
    assert!(aggregate.publications.is_empty());
    Ok(())
}

#[tokio::test]
async fn linking_twice_is_a_no_op() -> Result<()> {
    let factory = common::test_factory().await?;
    let ctx = factory.context();

    let project = factory
        .projects
        .create(&ctx, &common::project("Dedup", ProjectStatus::Active))
        .await?;
    let member = factory
        .lab_members
        .create(&ctx, &common::member("Twice Linked", LabMemberRole::Postdoc))
        .await?;

    factory.projects.link_member(&ctx, project.id, member.id).await?;
    factory.projects.link_member(&ctx, project.id, member.id).await?;

    // Exactly one association row exists afterward.
    let links: Vec<ProjectMember> =
        sqlx::query_as("SELECT project_id, member_id FROM project_members")
            .fetch_all(factory.manager().pool())
            .await?;
    assert_eq!(
        links,
        vec![ProjectMember {
            project_id: project.id,
            member_id: member.id,
        }]
    );
    assert_eq!(
        factory.projects.get_members(&ctx, project.id).await?.len(),
        1
    );
    Ok(())
}

#[tokio::test]
async fn unlinking_a_missing_pair_fails_not_found() -> Result<()> {
    let factory = common::test_factory().await?;
    let ctx = factory.context();

    let project = factory
        .projects
        .create(&ctx, &common::project("Lonely", ProjectStatus::Active))
        .await?;

    let err = factory
        .projects
        .unlink_member(&ctx, project.id, 4242)
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound));
    Ok(())
}

#[tokio::test]
async fn deleting_a_parent_cascades_to_junction_rows() -> Result<()> {
    let factory = common::test_factory().await?;
    let ctx = factory.context();

    let project = factory
        .projects
        .create(&ctx, &common::project("Doomed", ProjectStatus::Active))
        .await?;
    let member = factory
        .lab_members
        .create(&ctx, &common::member("Survivor", LabMemberRole::Pi))
        .await?;
    let publication = factory
        .publications
        .create(&ctx, &common::publication("Shared Paper", 2022))
        .await?;

    factory.projects.link_member(&ctx, project.id, member.id).await?;
    factory
        .projects
        .link_publication(&ctx, project.id, publication.id)
        .await?;

    factory.projects.delete(&ctx, project.id).await?;

    // The linked entities survive; only the association rows are gone.
    assert!(factory.lab_members.get_by_id(&ctx, member.id).await.is_ok());
    assert!(factory
        .publications
        .get_by_id(&ctx, publication.id)
        .await
        .is_ok());
    assert_eq!(common::count_rows(&factory, "project_members").await?, 0);
    assert_eq!(
        common::count_rows(&factory, "project_publications").await?,
        0
    );
    Ok(())
}

#[tokio::test]
async fn publication_author_links_round_trip() -> Result<()> {
    let factory = common::test_factory().await?;
    let ctx = factory.context();

    let publication = factory
        .publications
        .create(&ctx, &common::publication("Joint Work", 2024))
        .await?;
    let first = factory
        .lab_members
        .create(&ctx, &common::member("First Author", LabMemberRole::Phd))
        .await?;
    let second = factory
        .lab_members
        .create(&ctx, &common::member("Second Author", LabMemberRole::Pi))
        .await?;

    factory
        .publications
        .link_author(&ctx, publication.id, first.id)
        .await?;
    factory
        .publications
        .link_author(&ctx, publication.id, second.id)
        .await?;

    let aggregate = factory
        .publications
        .get_with_authors(&ctx, publication.id)
        .await?;
    assert_eq!(aggregate.publication.title, "Joint Work");
    assert_eq!(aggregate.authors.len(), 2);

    let by_member = factory.publications.get_by_member(&ctx, first.id).await?;
    assert_eq!(by_member.len(), 1);
    assert_eq!(by_member[0].id, publication.id);

    factory
        .publications
        .unlink_author(&ctx, publication.id, first.id)
        .await?;
    let authors = factory.publications.get_authors(&ctx, publication.id).await?;
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].name, "Second Author");

    let err = factory
        .publications
        .unlink_author(&ctx, publication.id, first.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound));
    Ok(())
}

#[tokio::test]
async fn aggregate_fetch_fails_fast_on_missing_primary() -> Result<()> {
    let factory = common::test_factory().await?;
    let ctx = factory.context();

    let err = factory
        .projects
        .get_with_relations(&ctx, 9999)
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound));

    let err = factory
        .publications
        .get_with_authors(&ctx, 9999)
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound));
    Ok(())
}

#[tokio::test]
async fn linking_to_a_missing_parent_is_a_detectable_fk_violation() -> Result<()> {
    let factory = common::test_factory().await?;
    let ctx = factory.context();

    let member = factory
        .lab_members
        .create(&ctx, &common::member("Orphan Link", LabMemberRole::Master))
        .await?;

    let err = factory
        .projects
        .link_member(&ctx, 555, member.id)
        .await
        .unwrap_err();
    assert!(err.is_foreign_key_violation());
    assert!(!err.is_not_null_violation());
    Ok(())
}
