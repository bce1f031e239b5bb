//! Caller-owned snapshot of the category tree
//!
//! The tree is built on first use and kept until [`CategoryTreeCache::invalidate`]
//! is called. Every code path that writes categories must invalidate.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{CategoryRepository, DomainError};
use crate::modules::classification::CategoryTree;

#[derive(Default)]
pub struct CategoryTreeCache {
    tree: RwLock<Option<Arc<CategoryTree>>>,
}

impl CategoryTreeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tree, loading it from `repo` when there is none
    pub async fn get_or_load(
        &self,
        repo: &dyn CategoryRepository,
    ) -> Result<Arc<CategoryTree>, DomainError> {
        if let Some(tree) = self.tree.read().await.as_ref() {
            return Ok(Arc::clone(tree));
        }

        let mut slot = self.tree.write().await;
        // another caller may have loaded it while we waited
        if let Some(tree) = slot.as_ref() {
            return Ok(Arc::clone(tree));
        }

        let categories = repo.list_all().await?;
        let tree = Arc::new(CategoryTree::build(categories));
        *slot = Some(Arc::clone(&tree));
        Ok(tree)
    }

    pub async fn invalidate(&self) {
        tracing::debug!("Category tree cache invalidated");
        *self.tree.write().await = None;
    }

    pub async fn is_loaded(&self) -> bool {
        self.tree.read().await.is_some()
    }
}
