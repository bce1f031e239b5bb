//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use super::DomainError;

/// Distinguish a missing field (`None`) from an explicit `null` (`Some(None)`)
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Node of the classification scheme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub dewey_code: String,
    pub name: String,
    pub level: i32,
    pub parent_code: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Fully derived category ready to be stored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCategory {
    pub dewey_code: String,
    pub name: String,
    pub level: i32,
    pub parent_code: Option<String>,
    pub is_active: bool,
}

/// Partial update of a category, `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub dewey_code: Option<String>,
    pub name: Option<String>,
    pub level: Option<i32>,
    pub parent_code: Option<Option<String>>,
    pub is_active: Option<bool>,
}

/// Repository trait for Category entity
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Full snapshot, used to (re)build the category tree
    async fn list_all(&self) -> Result<Vec<Category>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, DomainError>;

    /// Fails with `Conflict` when the code is already taken
    async fn create(&self, category: NewCategory) -> Result<Category, DomainError>;

    async fn update(&self, id: i32, changes: CategoryChanges) -> Result<Category, DomainError>;

    /// Fails with `HasChildren` while another category names this one as parent
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Recipe data for API responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Option<i32>,
    pub name: String,
    /// Where to find it: cookbook and page, URL, binder...
    pub location: Option<String>,
    pub notes: Option<String>,
    /// 0 to 5 stars, `None` when not rated
    pub rating: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub classification_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Filter criteria for recipe queries
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RecipeFilter {
    pub tag: Option<String>,
    #[serde(rename = "q")]
    pub query: Option<String>,
}

/// Repository trait for Recipe entity
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    async fn find_all(&self, filter: RecipeFilter) -> Result<Vec<Recipe>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Recipe>, DomainError>;

    async fn create(&self, recipe: Recipe) -> Result<Recipe, DomainError>;

    /// Replace every editable field of an existing recipe
    async fn update(&self, id: i32, recipe: Recipe) -> Result<Recipe, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    /// Classification codes of all recipes filed under `base.`
    async fn find_codes_under(&self, base: &str) -> Result<Vec<String>, DomainError>;
}
