use std::sync::Arc;

use heapcal_advisor::Advisor;
use heapcal_core::Repository;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    // Writes take the lock for the whole mutate-then-persist step,
    // so readers never see a change that hasn't been saved yet.
    repo: Arc<RwLock<Repository>>,
    advisor: Arc<dyn Advisor>,
}

impl AppState {
    pub fn new(repo: Repository, advisor: Arc<dyn Advisor>) -> Self {
        AppState {
            repo: Arc::new(RwLock::new(repo)),
            advisor,
        }
    }

    pub async fn repo(&self) -> RwLockReadGuard<'_, Repository> {
        self.repo.read().await
    }

    pub async fn repo_mut(&self) -> RwLockWriteGuard<'_, Repository> {
        self.repo.write().await
    }

    pub fn advisor(&self) -> &dyn Advisor {
        self.advisor.as_ref()
    }
}
