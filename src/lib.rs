//! # OutfitX
//!
//! Recommends a compatible top/bottom pair from a fixed wardrobe catalog.
//!
//! A binary compatibility classifier scores candidate pairs; the caller can
//! pin one garment and narrow either side with a free-text prompt such as
//! `"top: red, striped"`. The engine returns the first candidate, in a
//! randomized order, whose score reaches the threshold.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! outfitx --catalog attributes.json --model model.json --prompt "bottom: denim"
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use outfitx::prelude::*;
//!
//! let catalog = CatalogStore::new("attributes.json").load().unwrap();
//! let model = ModelStore::new("model.json").load().unwrap();
//!
//! let engine = Recommender::new(model);
//! match engine.select(&catalog, None, "top: white").unwrap() {
//!     DecisionOutcome::Found { top, bottom } => {
//!         println!("{} + {}", top.image_path(), bottom.image_path());
//!     }
//!     DecisionOutcome::NotFound => println!("No recommended combinations found"),
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - [`outfitx-core`](https://docs.rs/outfitx-core) - Vocabulary, encoder, prompt parser, candidate generator, selection policy
//! - [`outfitx-storage`](https://docs.rs/outfitx-storage) - Catalog and model artifact loading

// Re-export core types
pub use outfitx_core::{
    classifier, prompt,
    CancellationToken, Catalog, Category, Classifier, DecisionOutcome, DenseClassifier,
    FeatureVector, FilterSpec, Garment, Recommender, SearchStats, SelectionConfig,
    CatalogLoadError, ClassifierError, Error, Result, UnknownAttributeError,
    DEFAULT_THRESHOLD,
};

// Re-export storage
pub use outfitx_storage::{CatalogStore, ModelStore};

/// Resolve the garment a user pinned by id
pub fn pinned_garment<'a>(catalog: &'a Catalog, id: &str) -> Result<&'a Garment> {
    catalog
        .get(id)
        .ok_or_else(|| Error::GarmentNotFound(id.to_string()))
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        pinned_garment,
        CancellationToken, Catalog, Category, Classifier, DecisionOutcome, DenseClassifier,
        FeatureVector, FilterSpec, Garment, Recommender, SearchStats, SelectionConfig,
        CatalogLoadError, ClassifierError, Error, Result,
        CatalogStore, ModelStore,
    };
}
