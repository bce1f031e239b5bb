//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{CategoryRepository, RecipeRepository};
use crate::infrastructure::{SeaOrmCategoryRepository, SeaOrmRecipeRepository};
use crate::services::{CategoryTreeCache, ClassificationSettings, RecipeContext};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Category repository
    pub category_repo: Arc<dyn CategoryRepository>,
    /// Recipe repository
    pub recipe_repo: Arc<dyn RecipeRepository>,
    /// Category tree snapshot, invalidated on every category write
    pub category_cache: Arc<CategoryTreeCache>,
    pub settings: ClassificationSettings,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_settings(db, ClassificationSettings::default())
    }

    pub fn with_settings(db: DatabaseConnection, settings: ClassificationSettings) -> Self {
        let category_repo = Arc::new(SeaOrmCategoryRepository::new(db.clone()));
        let recipe_repo = Arc::new(SeaOrmRecipeRepository::new(db));

        Self {
            category_repo,
            recipe_repo,
            category_cache: Arc::new(CategoryTreeCache::new()),
            settings,
        }
    }

    /// Borrowed view used by the recipe service
    pub fn recipe_context(&self) -> RecipeContext<'_> {
        RecipeContext {
            recipes: self.recipe_repo.as_ref(),
            categories: self.category_repo.as_ref(),
            cache: &self.category_cache,
            settings: self.settings,
        }
    }
}
