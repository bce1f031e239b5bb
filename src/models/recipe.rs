use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::Recipe;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub rating: Option<i32>,
    pub tags: String, // JSON array
    pub classification_code: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Serialize tags for the JSON text column
pub fn encode_tags(tags: &[String]) -> String {
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}

impl From<Model> for Recipe {
    fn from(model: Model) -> Self {
        let tags: Vec<String> = serde_json::from_str(&model.tags).unwrap_or_default();

        Self {
            id: Some(model.id),
            name: model.name,
            location: model.location,
            notes: model.notes,
            rating: model.rating,
            tags,
            classification_code: model.classification_code,
            created_at: Some(model.created_at),
            updated_at: Some(model.updated_at),
        }
    }
}
