// Classification Module
// Code grammar, category tree, sequence allocation, hierarchy tags and bulk import

pub mod code;
pub mod import;
pub mod sequence;
pub mod tags;
pub mod tree;

pub use code::{ClassificationCode, ResolvedCode};
pub use import::{ImportPlan, ImportSummary, plan_import};
pub use sequence::{DEFAULT_MIN_SEQUENCE_LEVEL, next_sequence, resolve_selection};
pub use tags::{hierarchy_tags, merge_hierarchy_tags, retag};
pub use tree::{CategoryNode, CategoryTree};

pub fn init() {
    tracing::info!("Initializing Classification Module...");
}
