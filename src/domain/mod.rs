// Domain layer - Pure business logic (no I/O)

pub mod catalog;
pub mod model;

pub use catalog::{CatalogSpec, QuestionCatalog};
pub use model::*;
