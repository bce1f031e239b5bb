//! Category Service - administration of the classification scheme
//!
//! Validates codes, keeps `level` in line with the code grammar and refuses
//! changes that would orphan a subtree. Every write invalidates the
//! caller's [`CategoryTreeCache`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::CategoryTreeCache;
use crate::domain::{
    Category, CategoryChanges, CategoryRepository, ClassificationError, DomainError, NewCategory,
    RecipeFilter, RecipeRepository, double_option,
};
use crate::modules::classification::tags::label;
use crate::modules::classification::{
    CategoryNode, ClassificationCode, ImportSummary, code, plan_import,
};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategoryRequest {
    pub dewey_code: String,
    pub name: String,
    pub parent_code: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategoryRequest {
    pub dewey_code: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub parent_code: Option<Option<String>>,
    pub is_active: Option<bool>,
}

/// Stored level that disagrees with the one implied by the code
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelMismatch {
    pub dewey_code: String,
    pub stored: i32,
    pub derived: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrokenLink {
    pub dewey_code: String,
    pub parent_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IntegrityReport {
    pub total: usize,
    pub broken_links: Vec<BrokenLink>,
    pub level_mismatches: Vec<LevelMismatch>,
}

fn clean_name(name: &str) -> Result<String, DomainError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::Validation(
            "Category name must not be empty".to_string(),
        ));
    }
    Ok(name.to_string())
}

fn clean_parent(code: &ClassificationCode, parent: Option<String>) -> Result<Option<String>, DomainError> {
    let Some(parent) = parent.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()) else {
        return Ok(None);
    };
    let parent = ClassificationCode::parse(&parent)?;
    if &parent == code {
        return Err(DomainError::Validation(format!(
            "Category '{}' cannot be its own parent",
            code
        )));
    }
    Ok(Some(parent.into()))
}

/// All categories, active or not, ordered by code
pub async fn list_categories(repo: &dyn CategoryRepository) -> Result<Vec<Category>, DomainError> {
    repo.list_all().await
}

pub async fn get_category(repo: &dyn CategoryRepository, id: i32) -> Result<Category, DomainError> {
    repo.find_by_id(id).await?.ok_or(DomainError::NotFound)
}

/// Active roots with nested active children, for browsing
pub async fn category_tree(
    repo: &dyn CategoryRepository,
    cache: &CategoryTreeCache,
) -> Result<Vec<CategoryNode>, DomainError> {
    let tree = cache.get_or_load(repo).await?;
    Ok(tree.nested())
}

/// Active children of the category `id`
pub async fn children_of(
    repo: &dyn CategoryRepository,
    cache: &CategoryTreeCache,
    id: i32,
) -> Result<Vec<Category>, DomainError> {
    let category = get_category(repo, id).await?;
    let tree = cache.get_or_load(repo).await?;
    Ok(tree
        .children_of(&category.dewey_code)
        .into_iter()
        .cloned()
        .collect())
}

pub async fn create_category(
    repo: &dyn CategoryRepository,
    cache: &CategoryTreeCache,
    request: CreateCategoryRequest,
) -> Result<Category, DomainError> {
    let code = ClassificationCode::parse(&request.dewey_code)?;
    let name = clean_name(&request.name)?;
    let parent_code = clean_parent(&code, request.parent_code)?;

    if let Some(parent) = &parent_code {
        let tree = cache.get_or_load(repo).await?;
        if !tree.contains(parent) {
            tracing::warn!(
                "Creating category {} under unknown parent {}",
                code,
                parent
            );
        }
    }

    let category = repo
        .create(NewCategory {
            level: code.level() as i32,
            dewey_code: code.into(),
            name,
            parent_code,
            is_active: request.is_active.unwrap_or(true),
        })
        .await?;
    cache.invalidate().await;

    tracing::info!(
        "Created category {} '{}' (level {})",
        category.dewey_code,
        category.name,
        category.level
    );
    Ok(category)
}

/// Swap `old` for `new` in the tags of every recipe carrying `old`
async fn relabel_recipes(
    recipes: &dyn RecipeRepository,
    old: &str,
    new: &str,
) -> Result<usize, DomainError> {
    let tagged = recipes
        .find_all(RecipeFilter {
            tag: Some(old.to_string()),
            query: None,
        })
        .await?;

    let mut count = 0;
    for mut recipe in tagged {
        let Some(id) = recipe.id else { continue };
        let mut seen = HashSet::new();
        recipe.tags = recipe
            .tags
            .into_iter()
            .map(|t| if t == old { new.to_string() } else { t })
            .filter(|t| seen.insert(t.clone()))
            .collect();
        recipes.update(id, recipe).await?;
        count += 1;
    }
    Ok(count)
}

/// Update a category; recipes tagged with its old label follow a rename
pub async fn update_category(
    repo: &dyn CategoryRepository,
    recipes: &dyn RecipeRepository,
    cache: &CategoryTreeCache,
    id: i32,
    request: UpdateCategoryRequest,
) -> Result<Category, DomainError> {
    let existing = get_category(repo, id).await?;
    let old_label = label(&existing);
    let current = ClassificationCode::parse(&existing.dewey_code)?;
    let mut changes = CategoryChanges::default();

    let code = match request.dewey_code {
        Some(new_code) => {
            let new_code = ClassificationCode::parse(&new_code)?;
            if new_code != current {
                let tree = cache.get_or_load(repo).await?;
                let count = tree.reference_count(current.as_str());
                if count > 0 {
                    return Err(DomainError::HasChildren {
                        code: existing.dewey_code,
                        count,
                    });
                }
                changes.level = Some(new_code.level() as i32);
                changes.dewey_code = Some(new_code.to_string());
            }
            new_code
        }
        None => current,
    };

    if let Some(name) = request.name {
        changes.name = Some(clean_name(&name)?);
    }
    if let Some(parent) = request.parent_code {
        changes.parent_code = Some(clean_parent(&code, parent)?);
    }
    changes.is_active = request.is_active;

    let category = repo.update(id, changes).await?;
    cache.invalidate().await;

    let new_label = label(&category);
    if new_label != old_label {
        let count = relabel_recipes(recipes, &old_label, &new_label).await?;
        if count > 0 {
            tracing::info!(
                "Relabelled {} recipes from '{}' to '{}'",
                count,
                old_label,
                new_label
            );
        }
    }

    tracing::info!("Updated category {} ({})", category.dewey_code, category.id);
    Ok(category)
}

/// Delete a category; refused while other categories name it as parent
pub async fn delete_category(
    repo: &dyn CategoryRepository,
    cache: &CategoryTreeCache,
    id: i32,
) -> Result<(), DomainError> {
    repo.delete(id).await?;
    cache.invalidate().await;
    tracing::info!("Deleted category {}", id);
    Ok(())
}

/// Import a scheme from text; bad fields are reported, never fatal
pub async fn import_categories(
    repo: &dyn CategoryRepository,
    cache: &CategoryTreeCache,
    text: &str,
) -> Result<ImportSummary, DomainError> {
    let tree = cache.get_or_load(repo).await?;
    let plan = plan_import(text, tree.iter().map(|c| c.dewey_code.as_str()));

    let mut summary = ImportSummary {
        imported_count: 0,
        error_count: 0,
        errors: plan.errors,
    };

    for category in plan.categories {
        let code = category.dewey_code.clone();
        match repo.create(category).await {
            Ok(_) => summary.imported_count += 1,
            Err(e) => {
                tracing::warn!("Import of {} failed: {}", code, e);
                summary.errors.push(format!("{}: {}", code, e));
            }
        }
    }
    summary.error_count = summary.errors.len();

    if summary.imported_count > 0 {
        cache.invalidate().await;
    }

    tracing::info!(
        "Category import finished: {} imported, {} errors",
        summary.imported_count,
        summary.error_count
    );
    Ok(summary)
}

/// Broken parent links and stored levels that disagree with their code
pub async fn integrity_report(
    repo: &dyn CategoryRepository,
    cache: &CategoryTreeCache,
) -> Result<IntegrityReport, DomainError> {
    let tree = cache.get_or_load(repo).await?;

    let broken_links = tree
        .broken_links()
        .into_iter()
        .filter_map(|err| match err {
            ClassificationError::BrokenAncestorLink { code, parent } => Some(BrokenLink {
                dewey_code: code,
                parent_code: parent,
            }),
            _ => None,
        })
        .collect();

    let mut level_mismatches: Vec<LevelMismatch> = tree
        .iter()
        .filter_map(|c| {
            let derived = code::level(&c.dewey_code).ok();
            if derived == Some(c.level as u32) && c.level >= 1 {
                None
            } else {
                Some(LevelMismatch {
                    dewey_code: c.dewey_code.clone(),
                    stored: c.level,
                    derived,
                })
            }
        })
        .collect();
    level_mismatches.sort_by(|a, b| a.dewey_code.cmp(&b.dewey_code));

    Ok(IntegrityReport {
        total: tree.len(),
        broken_links,
        level_mismatches,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// In-memory store whose writes fail for one code
    struct FlakyRepository {
        failing_code: &'static str,
        stored: Mutex<Vec<Category>>,
    }

    #[async_trait]
    impl CategoryRepository for FlakyRepository {
        async fn list_all(&self) -> Result<Vec<Category>, DomainError> {
            Ok(self.stored.lock().unwrap().clone())
        }

        async fn find_by_id(&self, id: i32) -> Result<Option<Category>, DomainError> {
            Ok(self.stored.lock().unwrap().iter().find(|c| c.id == id).cloned())
        }

        async fn create(&self, category: NewCategory) -> Result<Category, DomainError> {
            if category.dewey_code == self.failing_code {
                return Err(DomainError::Database("disk I/O error".to_string()));
            }
            let mut stored = self.stored.lock().unwrap();
            let created = Category {
                id: stored.len() as i32 + 1,
                dewey_code: category.dewey_code,
                name: category.name,
                level: category.level,
                parent_code: category.parent_code,
                is_active: category.is_active,
                created_at: "2024-01-01T00:00:00+00:00".to_string(),
                updated_at: "2024-01-01T00:00:00+00:00".to_string(),
            };
            stored.push(created.clone());
            Ok(created)
        }

        async fn update(&self, _id: i32, _changes: CategoryChanges) -> Result<Category, DomainError> {
            Err(DomainError::NotFound)
        }

        async fn delete(&self, _id: i32) -> Result<(), DomainError> {
            Err(DomainError::NotFound)
        }
    }

    #[tokio::test]
    async fn test_import_continues_after_write_failure() {
        let repo = FlakyRepository {
            failing_code: "64",
            stored: Mutex::new(Vec::new()),
        };
        let cache = CategoryTreeCache::new();

        let summary = import_categories(&repo, &cache, "6 Cooking, 64 Techniques, 641 Baking")
            .await
            .unwrap();

        assert_eq!(summary.imported_count, 2);
        assert_eq!(summary.error_count, 1);
        assert!(summary.errors[0].starts_with("64:"));

        let codes: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.dewey_code)
            .collect();
        assert_eq!(codes, vec!["6", "641"]);
    }
}
