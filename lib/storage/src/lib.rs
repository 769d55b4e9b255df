pub mod catalog;
pub mod model;

pub use catalog::CatalogStore;
pub use model::{ModelArtifact, ModelStore};
