//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.

use thiserror::Error;

/// Failures of the classification code engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationError {
    /// Malformed classification code string
    #[error("Invalid classification code '{code}': {reason}")]
    InvalidCodeFormat { code: String, reason: String },
    /// The next sequence suffix under `base` would exceed 999
    #[error("No sequence numbers left under '{base}'")]
    OutOfSequenceSpace { base: String },
    /// An import field could not be split into code and name
    #[error("Could not read a code from '{field}'")]
    AmbiguousImportLine { field: String },
    /// A parent link does not resolve to a known category
    #[error("Category '{code}' points to missing parent '{parent}'")]
    BrokenAncestorLink { code: String, parent: String },
}

#[derive(Debug, Error)]
pub enum DomainError {
    /// Resource not found
    #[error("Resource not found")]
    NotFound,
    /// Validation error with message
    #[error("Validation error: {0}")]
    Validation(String),
    /// Unique key already taken
    #[error("Conflict: {0}")]
    Conflict(String),
    /// Category still referenced as parent by other categories
    #[error("Category '{code}' still has {count} child categories")]
    HasChildren { code: String, count: usize },
    /// Classification engine failure
    #[error(transparent)]
    Classification(#[from] ClassificationError),
    /// Database/persistence error
    #[error("Database error: {0}")]
    Database(String),
    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}
