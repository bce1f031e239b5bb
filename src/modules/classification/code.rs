//! Classification code grammar
//!
//! A classification code is a run of digits, optionally followed by a single
//! decimal point and more digits. Two notations share the same code space:
//!
//! - integer concatenation: `"0"` -> `"00"` -> `"000"`
//! - decimal: `"000"` -> `"000.0"` -> `"000.00"`
//!
//! Catalogued items may additionally carry a three digit sequence suffix
//! after their leaf code (`"411.21.001"`). Those are handled by
//! [`ResolvedCode`], never by the category grammar itself.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::ClassificationError;

/// Width of the per-item sequence suffix
pub const SEQUENCE_WIDTH: usize = 3;

fn invalid(code: &str, reason: &str) -> ClassificationError {
    ClassificationError::InvalidCodeFormat {
        code: code.to_string(),
        reason: reason.to_string(),
    }
}

/// Split a category code into its whole and optional fraction part,
/// rejecting anything outside the grammar.
fn split(code: &str) -> Result<(&str, Option<&str>), ClassificationError> {
    if code.is_empty() {
        return Err(invalid(code, "code is empty"));
    }
    if !code.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(invalid(code, "only digits and '.' are allowed"));
    }

    let (whole, fraction) = parts(code);
    if let Some(fraction) = fraction {
        if fraction.contains('.') {
            return Err(invalid(code, "more than one decimal point"));
        }
        if whole.is_empty() {
            return Err(invalid(code, "missing digits before the decimal point"));
        }
        if fraction.is_empty() {
            return Err(invalid(code, "missing digits after the decimal point"));
        }
    }
    Ok((whole, fraction))
}

/// Whole and fraction part of a code, without any checks
fn parts(code: &str) -> (&str, Option<&str>) {
    match code.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (code, None),
    }
}

fn depth(whole: &str, fraction: Option<&str>) -> u32 {
    (whole.len() + fraction.map_or(0, str::len)) as u32
}

/// Check that `code` follows the category code grammar.
pub fn validate(code: &str) -> Result<(), ClassificationError> {
    split(code).map(|_| ())
}

/// Hierarchy depth implied by the notation of `code`.
///
/// `"000"` is level 3, `"000.0"` level 4, `"000.00"` level 5.
pub fn level(code: &str) -> Result<u32, ClassificationError> {
    let (whole, fraction) = split(code)?;
    Ok(depth(whole, fraction))
}

/// Structural parent of `code`, `None` for a single digit root.
///
/// Only a fallback: an explicit `parent_code` on a category always wins.
pub fn parent(code: &str) -> Result<Option<String>, ClassificationError> {
    let (whole, fraction) = split(code)?;
    Ok(structural_parent(whole, fraction))
}

fn structural_parent(whole: &str, fraction: Option<&str>) -> Option<String> {
    match fraction {
        Some(fraction) if fraction.len() > 1 => Some(format!(
            "{}.{}",
            whole,
            &fraction[..fraction.len() - 1]
        )),
        Some(_) => Some(whole.to_string()),
        None if whole.len() <= 1 => None,
        None => Some(whole[..whole.len() - 1].to_string()),
    }
}

/// A category code that is known to follow the grammar.
///
/// Ordering is plain string ordering, so `"10"` sorts before `"2"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClassificationCode(String);

impl ClassificationCode {
    pub fn parse(code: &str) -> Result<Self, ClassificationError> {
        let code = code.trim();
        validate(code)?;
        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn level(&self) -> u32 {
        let (whole, fraction) = parts(&self.0);
        depth(whole, fraction)
    }

    pub fn parent(&self) -> Option<ClassificationCode> {
        let (whole, fraction) = parts(&self.0);
        structural_parent(whole, fraction).map(ClassificationCode)
    }

    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }
}

impl fmt::Display for ClassificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ClassificationCode {
    type Error = ClassificationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ClassificationCode> for String {
    fn from(code: ClassificationCode) -> Self {
        code.0
    }
}

impl AsRef<str> for ClassificationCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Code assigned to a catalogued item: a base code, optionally followed by
/// a three digit sequence suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCode<'a> {
    pub base: &'a str,
    pub sequence: Option<u16>,
}

impl<'a> ResolvedCode<'a> {
    /// Split `code` at a trailing `.NNN` sequence suffix if it has one.
    ///
    /// Purely syntactic: `"000.001"` always splits into `"000"` and `1`.
    /// Whether that split is meaningful depends on which categories exist,
    /// see [`crate::modules::classification::tags::base_code_of`].
    pub fn split(code: &'a str) -> Option<Self> {
        let (base, suffix) = code.rsplit_once('.')?;
        if suffix.len() != SEQUENCE_WIDTH || !suffix.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        validate(base).ok()?;
        let sequence = suffix.parse().ok()?;
        Some(Self {
            base,
            sequence: Some(sequence),
        })
    }

    /// Parse an item code, accepting either a bare base code or a base code
    /// with a sequence suffix.
    pub fn parse(code: &'a str) -> Result<Self, ClassificationError> {
        if let Some(resolved) = Self::split(code) {
            return Ok(resolved);
        }
        validate(code)?;
        Ok(Self {
            base: code,
            sequence: None,
        })
    }
}

/// Format a sequence suffix onto a base code.
pub fn with_sequence(base: &str, sequence: u16) -> String {
    format!("{}.{:0width$}", base, sequence, width = SEQUENCE_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_integer_notation() {
        assert_eq!(level("0").unwrap(), 1);
        assert_eq!(level("00").unwrap(), 2);
        assert_eq!(level("000").unwrap(), 3);
    }

    #[test]
    fn test_level_decimal_notation() {
        assert_eq!(level("000.0").unwrap(), 4);
        assert_eq!(level("000.00").unwrap(), 5);
        assert_eq!(level("641.5").unwrap(), 4);
    }

    #[test]
    fn test_parent_examples() {
        assert_eq!(parent("0").unwrap(), None);
        assert_eq!(parent("000").unwrap().as_deref(), Some("00"));
        assert_eq!(parent("000.0").unwrap().as_deref(), Some("000"));
        assert_eq!(parent("000.00").unwrap().as_deref(), Some("000.0"));
        assert_eq!(parent("411.215").unwrap().as_deref(), Some("411.21"));
    }

    #[test]
    fn test_parent_is_one_level_up() {
        for code in ["00", "000", "0000", "641.5", "641.59", "411.215", "12"] {
            let p = parent(code).unwrap().expect("non-root code has a parent");
            assert_eq!(level(&p).unwrap(), level(code).unwrap() - 1, "code {}", code);
        }
    }

    #[test]
    fn test_invalid_codes() {
        for code in ["", "abc", "12a", ".5", "12.", "1.2.3", "1..2", " 12", "-1"] {
            assert!(
                matches!(
                    level(code),
                    Err(ClassificationError::InvalidCodeFormat { .. })
                ),
                "expected {:?} to be rejected",
                code
            );
            assert!(parent(code).is_err());
        }
    }

    #[test]
    fn test_classification_code_newtype() {
        let code = ClassificationCode::parse(" 641.59 ").unwrap();
        assert_eq!(code.as_str(), "641.59");
        assert_eq!(code.level(), 5);
        assert_eq!(code.parent().unwrap().as_str(), "641.5");
        assert!(ClassificationCode::parse("6").unwrap().is_root());
        assert!(ClassificationCode::parse("6x").is_err());
    }

    #[test]
    fn test_newtype_agrees_with_free_functions() {
        for raw in ["0", "00", "641", "641.5", "641.59", "411.215"] {
            let code = ClassificationCode::parse(raw).unwrap();
            assert_eq!(code.level(), level(raw).unwrap(), "code {}", raw);
            assert_eq!(
                code.parent().map(String::from),
                parent(raw).unwrap(),
                "code {}",
                raw
            );
        }
    }

    #[test]
    fn test_code_ordering_is_lexicographic() {
        let mut codes: Vec<ClassificationCode> = ["2", "10", "01"]
            .iter()
            .map(|c| ClassificationCode::parse(c).unwrap())
            .collect();
        codes.sort();
        let sorted: Vec<&str> = codes.iter().map(|c| c.as_str()).collect();
        assert_eq!(sorted, vec!["01", "10", "2"]);
    }

    #[test]
    fn test_resolved_code_split() {
        let resolved = ResolvedCode::parse("411.21.001").unwrap();
        assert_eq!(resolved.base, "411.21");
        assert_eq!(resolved.sequence, Some(1));

        let bare = ResolvedCode::parse("411.21").unwrap();
        assert_eq!(bare.base, "411.21");
        assert_eq!(bare.sequence, None);

        // four digit tail is not a sequence suffix
        assert_eq!(ResolvedCode::split("411.2100"), None);
        assert!(ResolvedCode::parse("411.21.01").is_err());
    }

    #[test]
    fn test_with_sequence_pads() {
        assert_eq!(with_sequence("000", 1), "000.001");
        assert_eq!(with_sequence("411.21", 42), "411.21.042");
    }
}
