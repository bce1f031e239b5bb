//! Per-item sequence numbers under a leaf classification code
//!
//! Items sharing a leaf code are told apart by a three digit suffix:
//! `411.21.001`, `411.21.002`, ... A new item always gets the current
//! maximum plus one; freed numbers are never reused.

use super::code::{self, SEQUENCE_WIDTH};
use super::tree::CategoryTree;
use crate::domain::ClassificationError;

/// Largest suffix that fits in [`SEQUENCE_WIDTH`] digits
pub const MAX_SEQUENCE: u16 = 999;

/// Default minimum depth at which leaf categories receive sequence numbers
pub const DEFAULT_MIN_SEQUENCE_LEVEL: u32 = 4;

/// Suffix of `candidate` if it is exactly `base.NNN`
fn suffix_under(base: &str, candidate: &str) -> Option<u16> {
    let rest = candidate.strip_prefix(base)?.strip_prefix('.')?;
    if rest.len() != SEQUENCE_WIDTH || !rest.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    rest.parse().ok()
}

/// Next free code under `base`, given the codes already handed out.
///
/// Codes in `used` that are not of the form `base.NNN` are ignored, so the
/// caller may pass a loose prefix match.
pub fn next_sequence<I, S>(base: &str, used: I) -> Result<String, ClassificationError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    code::validate(base)?;

    let highest = used
        .into_iter()
        .filter_map(|c| suffix_under(base, c.as_ref()))
        .max();

    let next = match highest {
        None => 1,
        Some(n) if n >= MAX_SEQUENCE => {
            return Err(ClassificationError::OutOfSequenceSpace {
                base: base.to_string(),
            });
        }
        Some(n) => n + 1,
    };

    Ok(code::with_sequence(base, next))
}

/// Whether picking `code` should allocate a sequence number: it must be a
/// known leaf category at or below `min_level`.
pub fn is_sequence_eligible(tree: &CategoryTree, code: &str, min_level: u32) -> bool {
    match tree.get(code) {
        Some(category) => {
            let depth = code::level(code).unwrap_or(category.level.max(0) as u32);
            depth >= min_level && !tree.has_children(code)
        }
        None => false,
    }
}

/// Turn the category a user picked into the code stored on the item.
///
/// Eligible leaves get the next sequence number, anything else is used as
/// is.
pub fn resolve_selection<I, S>(
    tree: &CategoryTree,
    selected: &str,
    used: I,
    min_level: u32,
) -> Result<String, ClassificationError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    code::validate(selected)?;

    if is_sequence_eligible(tree, selected, min_level) {
        next_sequence(selected, used)
    } else {
        Ok(selected.to_string())
    }
}
