//! Projection of a classification code onto hierarchy tags
//!
//! Every ancestor of an item's category becomes one tag labelled
//! `"<code> <name>"`, e.g. `"641 Baking"`. When the classification changes,
//! the previous hierarchy tags are recognised by exact match against the
//! labels of all known categories and replaced; user tags are never touched.

use std::collections::HashSet;

use super::code::{self, ResolvedCode};
use super::tree::CategoryTree;
use crate::domain::{Category, ClassificationError};

/// Tag label for a category
pub fn label(category: &Category) -> String {
    format!("{} {}", category.dewey_code, category.name)
}

/// Category code to look up for an item code.
///
/// A trailing `.NNN` is treated as a sequence suffix only when the code
/// itself is not a category and what remains is one.
pub fn base_code_of<'a>(tree: &CategoryTree, code: &'a str) -> &'a str {
    if tree.contains(code) {
        return code;
    }
    match ResolvedCode::split(code) {
        Some(resolved) if tree.contains(resolved.base) => resolved.base,
        _ => code,
    }
}

/// Labels for every known ancestor of `code`, root first. Gaps in the chain
/// are skipped; an empty code yields nothing.
pub fn hierarchy_tags(tree: &CategoryTree, code: Option<&str>) -> Vec<String> {
    let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) else {
        return Vec::new();
    };

    let base = base_code_of(tree, code);
    let path = tree.ancestor_path(base);

    // the explicit chain stops at the first gap; levels above the highest
    // category found can still be reached through its own grammar parents
    let mut tags = match tree.ancestor_path_checked(base) {
        Err(ClassificationError::BrokenAncestorLink { .. }) => {
            let top = path.first().map_or(base, |c| c.dewey_code.as_str());
            match code::parent(top) {
                Ok(Some(parent)) => structural_tags(tree, &parent),
                _ => Vec::new(),
            }
        }
        _ => Vec::new(),
    };
    tags.extend(path.into_iter().map(label));

    let mut seen = HashSet::new();
    tags.retain(|tag| seen.insert(tag.clone()));
    tags
}

/// Walk the structural parents of `code`, keeping only levels that exist.
fn structural_tags(tree: &CategoryTree, code: &str) -> Vec<String> {
    let mut tags = Vec::new();
    let mut current = Some(code.to_string());

    while let Some(c) = current {
        if let Some(category) = tree.get(&c) {
            tags.push(label(category));
        }
        current = code::parent(&c).ok().flatten();
    }

    tags.reverse();
    tags
}

/// Whether `tag` is a label produced by some known category
pub fn is_hierarchy_tag(known: &HashSet<String>, tag: &str) -> bool {
    known.contains(tag)
}

/// All labels the tree can produce
pub fn known_labels(tree: &CategoryTree) -> HashSet<String> {
    tree.iter().map(label).collect()
}

/// Replace the hierarchy tags in `current` by `projected`.
///
/// Free-form tags keep their relative order and come first; the result has
/// no duplicates.
pub fn merge_hierarchy_tags(
    tree: &CategoryTree,
    current: &[String],
    projected: &[String],
) -> Vec<String> {
    let known = known_labels(tree);
    let mut seen = HashSet::new();

    current
        .iter()
        .filter(|tag| !is_hierarchy_tag(&known, tag))
        .chain(projected.iter())
        .filter(|tag| seen.insert(tag.as_str()))
        .cloned()
        .collect()
}

/// Tags of an item after switching its classification to `code`
pub fn retag(tree: &CategoryTree, current: &[String], code: Option<&str>) -> Vec<String> {
    let projected = hierarchy_tags(tree, code);
    merge_hierarchy_tags(tree, current, &projected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::classification::tree::tests::category;

    fn tree() -> CategoryTree {
        CategoryTree::build(vec![
            category(1, "6", "Cooking", None),
            category(2, "64", "Techniques", Some("6")),
            category(3, "641", "Baking", Some("64")),
            category(4, "641.5", "Bread", Some("641")),
            category(5, "7", "Drinks", None),
        ])
    }

    fn strings(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_labels_are_code_and_name() {
        let tree = tree();
        assert_eq!(
            hierarchy_tags(&tree, Some("641.5")),
            strings(&["6 Cooking", "64 Techniques", "641 Baking", "641.5 Bread"])
        );
    }

    #[test]
    fn test_sequence_suffix_is_stripped() {
        let tree = tree();
        assert_eq!(base_code_of(&tree, "641.5.003"), "641.5");
        assert_eq!(
            hierarchy_tags(&tree, Some("641.5.003")),
            strings(&["6 Cooking", "64 Techniques", "641 Baking", "641.5 Bread"])
        );
    }

    #[test]
    fn test_category_code_wins_over_suffix() {
        let tree = CategoryTree::build(vec![
            category(1, "411", "A", None),
            category(2, "411.215", "B", Some("411")),
        ]);
        assert_eq!(base_code_of(&tree, "411.215"), "411.215");
    }

    #[test]
    fn test_empty_code_yields_no_tags() {
        let tree = tree();
        assert!(hierarchy_tags(&tree, None).is_empty());
        assert!(hierarchy_tags(&tree, Some("  ")).is_empty());
    }

    #[test]
    fn test_partial_ancestry_skips_gaps() {
        let tree = CategoryTree::build(vec![
            category(1, "6", "Cooking", None),
            category(3, "641", "Baking", Some("64")),
        ]);
        assert_eq!(
            hierarchy_tags(&tree, Some("641")),
            strings(&["6 Cooking", "641 Baking"])
        );
        // unknown leaf: nothing to strip, known levels above still show
        assert_eq!(
            hierarchy_tags(&tree, Some("641.5")),
            strings(&["6 Cooking", "641 Baking"])
        );
    }

    #[test]
    fn test_foreign_explicit_parent_adds_no_unrelated_tags() {
        let tree = CategoryTree::build(vec![
            category(1, "9", "Desserts", None),
            category(2, "641", "Baking", Some("99")),
        ]);
        assert_eq!(hierarchy_tags(&tree, Some("641")), strings(&["641 Baking"]));
    }

    #[test]
    fn test_merge_keeps_free_tags_in_order() {
        let tree = tree();
        let current = strings(&["quick", "7 Drinks", "vegan", "quick"]);
        let merged = retag(&tree, &current, Some("641"));
        assert_eq!(
            merged,
            strings(&["quick", "vegan", "6 Cooking", "64 Techniques", "641 Baking"])
        );
    }

    #[test]
    fn test_select_then_clear_restores_tags() {
        let tree = tree();
        let before = strings(&["weeknight", "spicy"]);
        let selected = retag(&tree, &before, Some("641.5.002"));
        assert_ne!(selected, before);
        let cleared = retag(&tree, &selected, None);
        assert_eq!(cleared, before);
    }

    #[test]
    fn test_free_tag_that_looks_numeric_survives() {
        let tree = tree();
        let current = strings(&["30 minutes", "6 Cooking"]);
        assert_eq!(retag(&tree, &current, None), strings(&["30 minutes"]));
    }
}
