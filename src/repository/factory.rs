//! Single construction point binding every repository to one shared
//! connection manager.

use std::future::Future;

use crate::database::{DbContext, DbError, DbManager};

use super::{
    HomepageRepository, LabMemberRepository, LabSettingRepository, NewsRepository,
    ProjectRepository, PublicationRepository, UserRepository,
};

/// All repositories wired against one connection manager. Cloning is
/// cheap; clones share the pool.
#[derive(Clone)]
pub struct RepositoryFactory {
    manager: DbManager,
    pub users: UserRepository,
    pub lab_members: LabMemberRepository,
    pub publications: PublicationRepository,
    pub projects: ProjectRepository,
    pub news: NewsRepository,
    pub homepage_sections: HomepageRepository,
    pub lab_settings: LabSettingRepository,
}

impl RepositoryFactory {
    pub fn new(manager: DbManager) -> Self {
        Self {
            manager,
            users: UserRepository::new(),
            lab_members: LabMemberRepository::new(),
            publications: PublicationRepository::new(),
            projects: ProjectRepository::new(),
            news: NewsRepository::new(),
            homepage_sections: HomepageRepository::new(),
            lab_settings: LabSettingRepository::new(),
        }
    }

    pub fn manager(&self) -> &DbManager {
        &self.manager
    }

    /// A fresh context with no transaction.
    pub fn context(&self) -> DbContext {
        self.manager.context()
    }

    /// Run `f` inside a transaction; see [`DbManager::run_in_transaction`].
    pub async fn run_in_transaction<F, Fut, R>(&self, ctx: &DbContext, f: F) -> Result<R, DbError>
    where
        F: FnOnce(DbContext) -> Fut,
        Fut: Future<Output = Result<R, DbError>>,
    {
        self.manager.run_in_transaction(ctx, f).await
    }

    /// Close the underlying pool during graceful shutdown.
    pub async fn close(&self) {
        self.manager.close().await;
    }
}
