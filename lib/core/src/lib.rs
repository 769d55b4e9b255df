//! # OutfitX Core
//!
//! Core library for the OutfitX outfit recommender.
//!
//! This crate provides the matching engine that picks a compatible top and
//! bottom from a wardrobe catalog:
//!
//! - [`Vocabulary`] - Closed attribute tables mapping values to integer codes
//! - [`FeatureVector`] - The 8-wide classifier input for a (top, bottom) pair
//! - [`FilterSpec`] - Attribute tokens parsed from a free-text prompt
//! - [`CandidateSet`] - Eligible pairs in a randomized order
//! - [`Classifier`] - The injected compatibility scoring seam
//! - [`Recommender`] - First-over-threshold selection policy
//!
//! ## Example
//!
//! ```rust
//! use outfitx_core::{classifier, Catalog, Category, FeatureVector, Garment, Recommender};
//!
//! let garment = |id: &str, category, color: &str| Garment {
//!     id: id.to_string(),
//!     category,
//!     color1: color.to_string(),
//!     color2: "none".to_string(),
//!     pattern: "solid".to_string(),
//!     dress_code: "casual".to_string(),
//!     material: "cotton".to_string(),
//!     seasonality: "all".to_string(),
//!     fit: "relaxed".to_string(),
//! };
//!
//! let catalog = Catalog::new(vec![
//!     garment("T1", Category::Top, "white"),
//!     garment("B1", Category::Bottom, "navy"),
//! ])
//! .unwrap();
//!
//! // Any scoring function can stand in for the trained model
//! let engine = Recommender::new(classifier::from_fn(|_: &FeatureVector| Ok(0.8)));
//! let outcome = engine.select(&catalog, None, "top: white").unwrap();
//! assert!(outcome.is_found());
//! ```

pub mod candidate;
pub mod classifier;
pub mod encoder;
pub mod error;
pub mod filter;
pub mod garment;
pub mod prompt;
pub mod selection;
pub mod vocabulary;

pub use candidate::{CandidatePair, CandidateSet};
pub use classifier::{Activation, Classifier, DenseClassifier, DenseLayer, FnClassifier};
pub use encoder::{FeatureVector, FEATURE_DIM};
pub use error::{CatalogLoadError, ClassifierError, Error, Result, UnknownAttributeError};
pub use filter::{AttributeFilter, Filter, FilterCondition};
pub use garment::{Catalog, Category, Garment};
pub use prompt::FilterSpec;
pub use selection::{
    CancellationToken, DecisionOutcome, Recommender, SearchStats, SelectionConfig, DEFAULT_THRESHOLD,
};
pub use vocabulary::{AttributeField, Vocabulary};
