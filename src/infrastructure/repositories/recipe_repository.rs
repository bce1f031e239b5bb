//! SeaORM implementation of RecipeRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{DomainError, Recipe, RecipeFilter, RecipeRepository};
use crate::models::recipe::{ActiveModel, Column, Entity as RecipeEntity, encode_tags};

/// SeaORM-based implementation of RecipeRepository
pub struct SeaOrmRecipeRepository {
    db: DatabaseConnection,
}

impl SeaOrmRecipeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecipeRepository for SeaOrmRecipeRepository {
    async fn find_all(&self, filter: RecipeFilter) -> Result<Vec<Recipe>, DomainError> {
        let mut query = RecipeEntity::find();

        if let Some(q) = &filter.query
            && !q.is_empty()
        {
            let cond = Condition::any()
                .add(Column::Name.contains(q))
                .add(Column::Notes.contains(q))
                .add(Column::Location.contains(q));
            query = query.filter(cond);
        }

        let recipes = query.order_by_asc(Column::Name).all(&self.db).await?;

        // Tags are a JSON array, match them exactly in memory
        let recipes = recipes
            .into_iter()
            .map(Recipe::from)
            .filter(|recipe| match &filter.tag {
                Some(tag) if !tag.is_empty() => recipe.tags.iter().any(|t| t == tag),
                _ => true,
            })
            .collect();

        Ok(recipes)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Recipe>, DomainError> {
        let recipe = RecipeEntity::find_by_id(id).one(&self.db).await?;
        Ok(recipe.map(Recipe::from))
    }

    async fn create(&self, recipe: Recipe) -> Result<Recipe, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = ActiveModel {
            name: Set(recipe.name),
            location: Set(recipe.location),
            notes: Set(recipe.notes),
            rating: Set(recipe.rating),
            tags: Set(encode_tags(&recipe.tags)),
            classification_code: Set(recipe.classification_code),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await?;
        Ok(Recipe::from(result))
    }

    async fn update(&self, id: i32, recipe: Recipe) -> Result<Recipe, DomainError> {
        let existing = RecipeEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(recipe.name);
        active.location = Set(recipe.location);
        active.notes = Set(recipe.notes);
        active.rating = Set(recipe.rating);
        active.tags = Set(encode_tags(&recipe.tags));
        active.classification_code = Set(recipe.classification_code);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let result = active.update(&self.db).await?;
        Ok(Recipe::from(result))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = RecipeEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }

    async fn find_codes_under(&self, base: &str) -> Result<Vec<String>, DomainError> {
        let recipes = RecipeEntity::find()
            .filter(Column::ClassificationCode.starts_with(format!("{}.", base)))
            .all(&self.db)
            .await?;

        Ok(recipes
            .into_iter()
            .filter_map(|r| r.classification_code)
            .collect())
    }
}
