//! In-memory index over a snapshot of categories
//!
//! Built once per load in a single pass; there is no incremental update.
//! Rebuild after any create, update or delete.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::code;
use crate::domain::{Category, ClassificationError};

#[derive(Debug, Default)]
pub struct CategoryTree {
    by_code: HashMap<String, Category>,
    /// parent code -> child codes, sorted, active and inactive
    children: HashMap<String, Vec<String>>,
    roots: Vec<String>,
}

/// Nested view of the active tree, for browsing
#[derive(Debug, Clone, Serialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub children: Vec<CategoryNode>,
}

impl CategoryTree {
    pub fn build(categories: Vec<Category>) -> Self {
        let mut by_code = HashMap::with_capacity(categories.len());
        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        let mut roots = Vec::new();

        for category in categories {
            match &category.parent_code {
                Some(parent) => children
                    .entry(parent.clone())
                    .or_default()
                    .push(category.dewey_code.clone()),
                None => roots.push(category.dewey_code.clone()),
            }
            by_code.insert(category.dewey_code.clone(), category);
        }

        for codes in children.values_mut() {
            codes.sort();
        }
        roots.sort();

        tracing::debug!(
            "Built category tree: {} categories, {} roots",
            by_code.len(),
            roots.len()
        );

        Self {
            by_code,
            children,
            roots,
        }
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    pub fn get(&self, code: &str) -> Option<&Category> {
        self.by_code.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.by_code.values()
    }

    /// Active children of `code`, for browsing and selection
    pub fn children_of(&self, code: &str) -> Vec<&Category> {
        self.all_children_of(code)
            .into_iter()
            .filter(|c| c.is_active)
            .collect()
    }

    /// Active and inactive children of `code`, for administration
    pub fn all_children_of(&self, code: &str) -> Vec<&Category> {
        self.children
            .get(code)
            .map(|codes| codes.iter().filter_map(|c| self.by_code.get(c)).collect())
            .unwrap_or_default()
    }

    pub fn has_children(&self, code: &str) -> bool {
        self.child_count(code) > 0
    }

    pub fn child_count(&self, code: &str) -> usize {
        self.children_of(code).len()
    }

    /// Number of categories naming `code` as parent, active or not
    pub fn reference_count(&self, code: &str) -> usize {
        self.children.get(code).map_or(0, Vec::len)
    }

    /// Active categories without a parent, sorted by code string
    pub fn roots(&self) -> Vec<&Category> {
        self.roots
            .iter()
            .filter_map(|c| self.by_code.get(c))
            .filter(|c| c.is_active)
            .collect()
    }

    /// Parent used for walking up: explicit link first, grammar second
    fn parent_code_of(category: &Category) -> Option<String> {
        match &category.parent_code {
            Some(parent) => Some(parent.clone()),
            None => code::parent(&category.dewey_code).ok().flatten(),
        }
    }

    /// Path from the root down to `code` (inclusive), stopping silently at
    /// the first link that does not resolve.
    pub fn ancestor_path(&self, code: &str) -> Vec<&Category> {
        match self.walk_up(code) {
            Ok(path) => path,
            Err((path, err)) => {
                tracing::debug!("Ancestor path truncated: {}", err);
                path
            }
        }
    }

    /// Same walk as [`Self::ancestor_path`], reporting a broken link instead
    /// of truncating.
    pub fn ancestor_path_checked(&self, code: &str) -> Result<Vec<&Category>, ClassificationError> {
        self.walk_up(code).map_err(|(_, err)| err)
    }

    fn walk_up(
        &self,
        code: &str,
    ) -> Result<Vec<&Category>, (Vec<&Category>, ClassificationError)> {
        let mut path = Vec::new();
        let mut seen = HashSet::new();
        let mut current = code.to_string();
        let mut child: Option<String> = None;

        loop {
            if !seen.insert(current.clone()) {
                // cycle in parent links
                break;
            }
            let Some(category) = self.by_code.get(&current) else {
                path.reverse();
                let err = ClassificationError::BrokenAncestorLink {
                    code: child.unwrap_or_else(|| code.to_string()),
                    parent: current,
                };
                return Err((path, err));
            };
            path.push(category);

            match Self::parent_code_of(category) {
                Some(parent) => {
                    child = Some(current);
                    current = parent;
                }
                None => break,
            }
        }

        path.reverse();
        Ok(path)
    }

    /// Categories whose explicit parent link points nowhere
    pub fn broken_links(&self) -> Vec<ClassificationError> {
        let mut broken: Vec<ClassificationError> = self
            .by_code
            .values()
            .filter_map(|c| {
                let parent = c.parent_code.as_ref()?;
                if self.by_code.contains_key(parent) {
                    None
                } else {
                    Some(ClassificationError::BrokenAncestorLink {
                        code: c.dewey_code.clone(),
                        parent: parent.clone(),
                    })
                }
            })
            .collect();
        broken.sort_by(|a, b| a.to_string().cmp(&b.to_string()));
        broken
    }

    /// Active roots with their active descendants
    pub fn nested(&self) -> Vec<CategoryNode> {
        self.roots()
            .into_iter()
            .map(|root| self.node(root, &mut HashSet::new()))
            .collect()
    }

    fn node<'a>(&'a self, category: &'a Category, visited: &mut HashSet<&'a str>) -> CategoryNode {
        visited.insert(&category.dewey_code);
        let pending: Vec<&Category> = self
            .children_of(&category.dewey_code)
            .into_iter()
            .filter(|c| !visited.contains(c.dewey_code.as_str()))
            .collect();
        let children = pending.into_iter().map(|c| self.node(c, visited)).collect();

        CategoryNode {
            category: category.clone(),
            children,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn category(id: i32, code: &str, name: &str, parent: Option<&str>) -> Category {
        Category {
            id,
            dewey_code: code.to_string(),
            name: name.to_string(),
            level: code::level(code).unwrap() as i32,
            parent_code: parent.map(str::to_string),
            is_active: true,
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
            updated_at: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    fn codes(categories: &[&Category]) -> Vec<String> {
        categories.iter().map(|c| c.dewey_code.clone()).collect()
    }

    #[test]
    fn test_roots_sorted_by_code_string() {
        let tree = CategoryTree::build(vec![
            category(1, "0", "Zero", None),
            category(2, "00", "Zero zero", Some("0")),
            category(3, "000", "Triple zero", Some("00")),
            category(4, "01", "Zero one", None),
        ]);

        assert_eq!(codes(&tree.roots()), vec!["0", "01"]);
    }

    #[test]
    fn test_inactive_root_is_hidden() {
        let mut retired = category(2, "5", "Retired", None);
        retired.is_active = false;
        let tree = CategoryTree::build(vec![
            category(1, "6", "Cooking", None),
            retired,
            category(3, "7", "Drinks", None),
        ]);

        assert_eq!(codes(&tree.roots()), vec!["6", "7"]);
        assert!(tree.nested().iter().all(|n| n.category.dewey_code != "5"));
        assert!(tree.contains("5"));
    }

    #[test]
    fn test_grammar_fallback_ignores_stored_level() {
        // imported with a wrong level and no explicit parent
        let mut baking = category(2, "641", "Baking", None);
        baking.level = 1;
        let tree = CategoryTree::build(vec![category(1, "64", "Techniques", None), baking]);

        assert_eq!(codes(&tree.ancestor_path("641")), vec!["64", "641"]);
    }

    #[test]
    fn test_roots_do_not_sort_numerically() {
        let tree = CategoryTree::build(vec![
            category(1, "2", "Two", None),
            category(2, "10", "Ten", None),
        ]);
        assert_eq!(codes(&tree.roots()), vec!["10", "2"]);
    }

    #[test]
    fn test_inactive_hidden_from_browse_only() {
        let mut hidden = category(3, "642", "Hidden", Some("64"));
        hidden.is_active = false;
        let tree = CategoryTree::build(vec![
            category(1, "6", "Cooking", None),
            category(2, "64", "Techniques", Some("6")),
            hidden,
            category(4, "641", "Baking", Some("64")),
        ]);

        assert_eq!(codes(&tree.children_of("64")), vec!["641"]);
        assert_eq!(codes(&tree.all_children_of("64")), vec!["641", "642"]);
        assert_eq!(tree.child_count("64"), 1);
        assert_eq!(tree.reference_count("64"), 2);
        assert!(tree.has_children("6"));
        assert!(!tree.has_children("641"));
    }

    #[test]
    fn test_ancestor_path_root_first() {
        let tree = CategoryTree::build(vec![
            category(1, "6", "Cooking", None),
            category(2, "64", "Techniques", Some("6")),
            category(3, "641", "Baking", Some("64")),
            category(4, "641.5", "Bread", Some("641")),
        ]);

        assert_eq!(
            codes(&tree.ancestor_path("641.5")),
            vec!["6", "64", "641", "641.5"]
        );
    }

    #[test]
    fn test_ancestor_path_prefers_explicit_parent() {
        // explicit link skips the structural parent "41"
        let tree = CategoryTree::build(vec![
            category(1, "4", "Four", None),
            category(2, "41", "Forty one", Some("4")),
            category(3, "411", "Four eleven", Some("4")),
        ]);
        assert_eq!(codes(&tree.ancestor_path("411")), vec!["4", "411"]);
    }

    #[test]
    fn test_ancestor_path_falls_back_to_grammar() {
        let mut orphan = category(3, "641", "Baking", None);
        orphan.level = 3;
        let tree = CategoryTree::build(vec![
            category(1, "6", "Cooking", None),
            category(2, "64", "Techniques", Some("6")),
            orphan,
        ]);
        assert_eq!(codes(&tree.ancestor_path("641")), vec!["6", "64", "641"]);
    }

    #[test]
    fn test_broken_link_truncates_path() {
        let tree = CategoryTree::build(vec![
            category(2, "64", "Techniques", Some("6")),
            category(3, "641", "Baking", Some("64")),
        ]);

        assert_eq!(codes(&tree.ancestor_path("641")), vec!["64", "641"]);
        assert_eq!(
            tree.ancestor_path_checked("641").unwrap_err(),
            ClassificationError::BrokenAncestorLink {
                code: "64".to_string(),
                parent: "6".to_string(),
            }
        );
        assert_eq!(tree.broken_links().len(), 1);
        assert!(tree.ancestor_path("999").is_empty());
    }

    #[test]
    fn test_cycle_does_not_loop() {
        let tree = CategoryTree::build(vec![
            category(1, "11", "A", Some("12")),
            category(2, "12", "B", Some("11")),
        ]);
        assert_eq!(codes(&tree.ancestor_path("11")), vec!["12", "11"]);
    }

    #[test]
    fn test_nested_view() {
        let tree = CategoryTree::build(vec![
            category(1, "6", "Cooking", None),
            category(2, "64", "Techniques", Some("6")),
            category(3, "641", "Baking", Some("64")),
            category(4, "7", "Drinks", None),
        ]);
        let nested = tree.nested();
        assert_eq!(nested.len(), 2);
        assert_eq!(nested[0].children[0].children[0].category.dewey_code, "641");
        assert!(nested[1].children.is_empty());
    }
}
