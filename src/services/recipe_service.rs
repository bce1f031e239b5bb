//! Recipe Service - recipes and their classification
//!
//! Picking a category for a recipe resolves it to a stored code (with a
//! sequence number for deep leaves) and swaps the recipe's hierarchy tags
//! for the new category's ancestors.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::CategoryTreeCache;
use crate::domain::{CategoryRepository, DomainError, Recipe, RecipeFilter, RecipeRepository};
use crate::modules::classification::tags::base_code_of;
use crate::modules::classification::{
    CategoryTree, DEFAULT_MIN_SEQUENCE_LEVEL, ResolvedCode, code, resolve_selection, retag,
};
use crate::modules::classification::sequence::is_sequence_eligible;

/// Highest accepted rating
pub const MAX_RATING: i32 = 5;

/// Classification behaviour, from configuration
#[derive(Debug, Clone, Copy)]
pub struct ClassificationSettings {
    /// Leaves at or below this level get per-recipe sequence numbers
    pub min_sequence_level: u32,
}

impl Default for ClassificationSettings {
    fn default() -> Self {
        Self {
            min_sequence_level: DEFAULT_MIN_SEQUENCE_LEVEL,
        }
    }
}

/// Repositories and settings a recipe operation works with
#[derive(Clone, Copy)]
pub struct RecipeContext<'a> {
    pub recipes: &'a dyn RecipeRepository,
    pub categories: &'a dyn CategoryRepository,
    pub cache: &'a CategoryTreeCache,
    pub settings: ClassificationSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecipeRequest {
    pub name: String,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub rating: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub classification_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyRequest {
    pub code: Option<String>,
}

/// Preview of the code a recipe would receive under `base`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextCode {
    pub base: String,
    pub code: String,
    pub sequenced: bool,
}

/// Trim, drop empties and duplicates, keep first-seen order
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn validate(request: &RecipeRequest) -> Result<(), DomainError> {
    if request.name.trim().is_empty() {
        return Err(DomainError::Validation(
            "Recipe name must not be empty".to_string(),
        ));
    }
    if let Some(rating) = request.rating
        && !(0..=MAX_RATING).contains(&rating)
    {
        return Err(DomainError::Validation(format!(
            "Rating must be between 0 and {}",
            MAX_RATING
        )));
    }
    Ok(())
}

/// Inactive categories stay in the tree for old items but cannot be picked
fn ensure_selectable(tree: &CategoryTree, code: &str) -> Result<(), DomainError> {
    match tree.get(code) {
        Some(category) if !category.is_active => Err(DomainError::Validation(format!(
            "Category '{}' is inactive",
            code
        ))),
        _ => Ok(()),
    }
}

/// Work out the stored code and tags for a new selection.
///
/// Keeps `current` when it already sits under the selected category, so
/// saving a recipe twice does not burn sequence numbers.
async fn apply_classification(
    ctx: RecipeContext<'_>,
    tree: &CategoryTree,
    current: Option<&str>,
    tags: &[String],
    selected: Option<&str>,
) -> Result<(Option<String>, Vec<String>), DomainError> {
    let Some(selected) = selected.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok((None, retag(tree, tags, None)));
    };

    let resolved = ResolvedCode::parse(selected)?;
    let min_level = ctx.settings.min_sequence_level;

    let stored = if let Some(current) = current
        && (current == selected || base_code_of(tree, current) == selected)
    {
        current.to_string()
    } else if resolved.sequence.is_some() && base_code_of(tree, selected) == resolved.base {
        // explicit item code, e.g. re-entered from an old catalogue
        ensure_selectable(tree, resolved.base)?;
        if !is_sequence_eligible(tree, resolved.base, min_level) {
            return Err(DomainError::Validation(format!(
                "Category '{}' does not take sequence numbers",
                resolved.base
            )));
        }
        let used = ctx.recipes.find_codes_under(resolved.base).await?;
        if used.iter().any(|c| c == selected) {
            return Err(DomainError::Conflict(format!(
                "Code '{}' is already assigned",
                selected
            )));
        }
        selected.to_string()
    } else {
        ensure_selectable(tree, selected)?;
        let used = ctx.recipes.find_codes_under(selected).await?;
        resolve_selection(tree, selected, &used, min_level)?
    };

    let tags = retag(tree, tags, Some(&stored));
    Ok((Some(stored), tags))
}

pub async fn list_recipes(
    ctx: RecipeContext<'_>,
    filter: RecipeFilter,
) -> Result<Vec<Recipe>, DomainError> {
    ctx.recipes.find_all(filter).await
}

pub async fn get_recipe(ctx: RecipeContext<'_>, id: i32) -> Result<Recipe, DomainError> {
    ctx.recipes.find_by_id(id).await?.ok_or(DomainError::NotFound)
}

pub async fn create_recipe(
    ctx: RecipeContext<'_>,
    request: RecipeRequest,
) -> Result<Recipe, DomainError> {
    validate(&request)?;

    let mut tags = normalize_tags(request.tags);
    let mut classification_code = None;

    if request.classification_code.is_some() {
        let tree = ctx.cache.get_or_load(ctx.categories).await?;
        let (stored, retagged) = apply_classification(
            ctx,
            &tree,
            None,
            &tags,
            request.classification_code.as_deref(),
        )
        .await?;
        classification_code = stored;
        tags = retagged;
    }

    let recipe = ctx
        .recipes
        .create(Recipe {
            id: None,
            name: request.name.trim().to_string(),
            location: non_empty(request.location),
            notes: non_empty(request.notes),
            rating: request.rating,
            tags,
            classification_code,
            created_at: None,
            updated_at: None,
        })
        .await?;

    tracing::info!(
        "Created recipe {:?} '{}' ({:?})",
        recipe.id,
        recipe.name,
        recipe.classification_code
    );
    Ok(recipe)
}

pub async fn update_recipe(
    ctx: RecipeContext<'_>,
    id: i32,
    request: RecipeRequest,
) -> Result<Recipe, DomainError> {
    validate(&request)?;
    let existing = get_recipe(ctx, id).await?;

    let mut tags = normalize_tags(request.tags);
    let mut classification_code = existing.classification_code.clone();

    let selected = non_empty(request.classification_code);
    if selected != existing.classification_code {
        let tree = ctx.cache.get_or_load(ctx.categories).await?;
        let (stored, retagged) = apply_classification(
            ctx,
            &tree,
            existing.classification_code.as_deref(),
            &tags,
            selected.as_deref(),
        )
        .await?;
        classification_code = stored;
        tags = retagged;
    }

    ctx.recipes
        .update(
            id,
            Recipe {
                id: Some(id),
                name: request.name.trim().to_string(),
                location: non_empty(request.location),
                notes: non_empty(request.notes),
                rating: request.rating,
                tags,
                classification_code,
                created_at: existing.created_at,
                updated_at: None,
            },
        )
        .await
}

/// Set or clear the classification of a recipe, re-deriving its hierarchy tags
pub async fn classify_recipe(
    ctx: RecipeContext<'_>,
    id: i32,
    selected: Option<&str>,
) -> Result<Recipe, DomainError> {
    let mut recipe = get_recipe(ctx, id).await?;
    let tree = ctx.cache.get_or_load(ctx.categories).await?;

    let (stored, tags) = apply_classification(
        ctx,
        &tree,
        recipe.classification_code.as_deref(),
        &recipe.tags,
        selected,
    )
    .await?;

    tracing::info!(
        "Recipe {} classified: {:?} -> {:?}",
        id,
        recipe.classification_code,
        stored
    );

    recipe.classification_code = stored;
    recipe.tags = tags;
    ctx.recipes.update(id, recipe).await
}

pub async fn delete_recipe(ctx: RecipeContext<'_>, id: i32) -> Result<(), DomainError> {
    ctx.recipes.delete(id).await?;
    tracing::info!("Deleted recipe {}", id);
    Ok(())
}

/// Code the next recipe filed under `base` would receive
pub async fn next_code(ctx: RecipeContext<'_>, base: &str) -> Result<NextCode, DomainError> {
    let base = base.trim();
    code::validate(base)?;

    let tree = ctx.cache.get_or_load(ctx.categories).await?;
    ensure_selectable(&tree, base)?;
    let used = ctx.recipes.find_codes_under(base).await?;
    let resolved = resolve_selection(&tree, base, &used, ctx.settings.min_sequence_level)?;

    Ok(NextCode {
        base: base.to_string(),
        sequenced: resolved != base,
        code: resolved,
    })
}
