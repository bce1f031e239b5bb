//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no SeaORM, no Axum).
//! Only trait definitions, DTOs and domain error types.

pub mod errors;
pub mod repositories;

pub use errors::{ClassificationError, DomainError};
pub use repositories::*;
