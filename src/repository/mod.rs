//! Data-access layer: typed repositories over the shared connection pool.
//!
//! Every method takes a [`DbContext`] and resolves its executor through it,
//! so a repository call joins whatever transaction the caller's context
//! carries without knowing it. Repositories hold no state of their own;
//! failures are translated into the [`DbError`](crate::database::DbError)
//! taxonomy (NotFound / Duplicate / InvalidInput / Database).

use async_trait::async_trait;

use crate::database::{DbContext, DbError};

pub mod factory;
pub mod homepage;
pub mod lab_members;
pub mod lab_settings;
pub mod news;
pub mod projects;
pub mod publications;
pub mod users;

pub use factory::RepositoryFactory;
pub use homepage::HomepageRepository;
pub use lab_members::LabMemberRepository;
pub use lab_settings::LabSettingRepository;
pub use news::NewsRepository;
pub use projects::ProjectRepository;
pub use publications::PublicationRepository;
pub use users::UserRepository;

/// Uniform CRUD contract implemented by every entity repository.
///
/// `create` and `update` return the stored record with server-assigned
/// fields (id, created_at, updated_at) populated; callers never control
/// timestamps. `update` is a full-record replace by id.
#[async_trait]
pub trait CrudRepository<T>: Send + Sync {
    /// Fails with `NotFound` if no row has this id.
    async fn get_by_id(&self, ctx: &DbContext, id: i64) -> Result<T, DbError>;

    /// Full collection in the entity's default order; empty when none exist.
    async fn get_all(&self, ctx: &DbContext) -> Result<Vec<T>, DbError>;

    /// Fails with `Duplicate` on a unique-constraint collision.
    async fn create(&self, ctx: &DbContext, entity: &T) -> Result<T, DbError>;

    /// Fails with `NotFound` if the entity's id does not exist.
    async fn update(&self, ctx: &DbContext, entity: &T) -> Result<T, DbError>;

    /// Fails with `NotFound` if the id does not exist; junction rows
    /// referencing the entity are removed by the schema's cascades.
    async fn delete(&self, ctx: &DbContext, id: i64) -> Result<(), DbError>;
}
