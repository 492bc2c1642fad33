//! C4 Prep Catalog & Dependency Graph (spec.md §4.4).

pub mod catalog;
pub mod error;
pub mod types;

pub use catalog::{PrepCatalog, PrepCatalogBuilder, PrepDependencyGraph};
pub use error::PrepError;
pub use types::{AtomicStep, Effect, PrepAction, PrepId, PrepKind, Requirement};
