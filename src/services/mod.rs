//! Services Layer
//!
//! This module contains pure business logic extracted from HTTP handlers.
//! Services work against the repository traits, so they can be driven by
//! Axum handlers or directly from tests.

pub mod category_cache;
pub mod category_service;
pub mod recipe_service;

// Re-export for convenience
pub use category_cache::CategoryTreeCache;
pub use recipe_service::{ClassificationSettings, RecipeContext};
