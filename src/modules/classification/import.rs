//! Bulk import of classification schemes from plain text
//!
//! Each line holds comma separated `"<code> <name>"` fields:
//!
//! ```text
//! 6 Cooking, 64 Techniques, 641 Baking
//! 641.5 Bread
//! ```
//!
//! Level and parent are derived from the code grammar, since imported data
//! carries no explicit parent links.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::code;
use crate::domain::{ClassificationError, NewCategory};

static FIELD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9.]+)\s+(.+)$").expect("valid field pattern"));

/// One `"<code> <name>"` field; `code` is empty when the field had none
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportField {
    pub code: String,
    pub name: String,
}

/// Split a field into code and name
pub fn parse_field(field: &str) -> ImportField {
    let field = field.trim();
    match FIELD_RE.captures(field) {
        Some(caps) => ImportField {
            code: caps[1].to_string(),
            name: caps[2].trim().to_string(),
        },
        None => ImportField {
            code: String::new(),
            name: field.to_string(),
        },
    }
}

/// Categories to create plus the per-field problems met on the way
#[derive(Debug, Default)]
pub struct ImportPlan {
    pub categories: Vec<NewCategory>,
    pub errors: Vec<String>,
}

/// Outcome of an import, as reported to the caller
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ImportSummary {
    pub imported_count: usize,
    pub error_count: usize,
    pub errors: Vec<String>,
}

impl ImportPlan {
    /// Summary for a plan whose categories were all stored
    pub fn into_summary(self) -> ImportSummary {
        ImportSummary {
            imported_count: self.categories.len(),
            error_count: self.errors.len(),
            errors: self.errors,
        }
    }
}

/// Turn raw text into the categories that still need creating.
///
/// Codes already in `existing` are skipped, as are repeats within the
/// batch (first one wins), so running the same import twice is a no-op.
pub fn plan_import<'a, I>(text: &str, existing: I) -> ImportPlan
where
    I: IntoIterator<Item = &'a str>,
{
    let existing: HashSet<&str> = existing.into_iter().collect();
    let mut seen: HashSet<String> = HashSet::new();
    let mut plan = ImportPlan::default();

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;

        for raw in line.split(',') {
            if raw.trim().is_empty() {
                continue;
            }

            let field = parse_field(raw);
            if field.code.is_empty() {
                let err = ClassificationError::AmbiguousImportLine {
                    field: field.name,
                };
                plan.errors.push(format!("Line {}: {}", line_no, err));
                continue;
            }

            if !seen.insert(field.code.clone()) || existing.contains(field.code.as_str()) {
                continue;
            }

            let level = match code::level(&field.code) {
                Ok(level) => level,
                Err(err) => {
                    plan.errors.push(format!("Line {}: {}", line_no, err));
                    continue;
                }
            };
            let parent_code = code::parent(&field.code).ok().flatten();

            plan.categories.push(NewCategory {
                dewey_code: field.code,
                name: field.name,
                level: level as i32,
                parent_code,
                is_active: true,
            });
        }
    }

    tracing::debug!(
        "Import plan: {} new categories, {} errors",
        plan.categories.len(),
        plan.errors.len()
    );

    plan
}
