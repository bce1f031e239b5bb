//! SeaORM implementation of CategoryRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{Category, CategoryChanges, CategoryRepository, DomainError, NewCategory};
use crate::models::category::{ActiveModel, Column, Entity as CategoryEntity};

/// SeaORM-based implementation of CategoryRepository
pub struct SeaOrmCategoryRepository {
    db: DatabaseConnection,
}

impl SeaOrmCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn code_taken(&self, code: &str) -> Result<bool, DomainError> {
        let count = CategoryEntity::find()
            .filter(Column::DeweyCode.eq(code))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn children_count(&self, code: &str) -> Result<u64, DomainError> {
        let count = CategoryEntity::find()
            .filter(Column::ParentCode.eq(code))
            .count(&self.db)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl CategoryRepository for SeaOrmCategoryRepository {
    async fn list_all(&self) -> Result<Vec<Category>, DomainError> {
        let categories = CategoryEntity::find()
            .order_by_asc(Column::DeweyCode)
            .all(&self.db)
            .await?;

        Ok(categories.into_iter().map(Category::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, DomainError> {
        let category = CategoryEntity::find_by_id(id).one(&self.db).await?;
        Ok(category.map(Category::from))
    }

    async fn create(&self, category: NewCategory) -> Result<Category, DomainError> {
        if self.code_taken(&category.dewey_code).await? {
            return Err(DomainError::Conflict(format!(
                "Category code '{}' already exists",
                category.dewey_code
            )));
        }

        let now = chrono::Utc::now().to_rfc3339();

        let model = ActiveModel {
            dewey_code: Set(category.dewey_code),
            name: Set(category.name),
            level: Set(category.level),
            parent_code: Set(category.parent_code),
            is_active: Set(category.is_active),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await?;
        Ok(Category::from(result))
    }

    async fn update(&self, id: i32, changes: CategoryChanges) -> Result<Category, DomainError> {
        let existing = CategoryEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        if let Some(code) = &changes.dewey_code
            && code != &existing.dewey_code
            && self.code_taken(code).await?
        {
            return Err(DomainError::Conflict(format!(
                "Category code '{}' already exists",
                code
            )));
        }

        let mut active: ActiveModel = existing.into();
        if let Some(code) = changes.dewey_code {
            active.dewey_code = Set(code);
        }
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(level) = changes.level {
            active.level = Set(level);
        }
        if let Some(parent_code) = changes.parent_code {
            active.parent_code = Set(parent_code);
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let result = active.update(&self.db).await?;
        Ok(Category::from(result))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let existing = CategoryEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let children = self.children_count(&existing.dewey_code).await?;
        if children > 0 {
            return Err(DomainError::HasChildren {
                code: existing.dewey_code,
                count: children as usize,
            });
        }

        let result = CategoryEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }
}
