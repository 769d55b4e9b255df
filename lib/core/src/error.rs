use crate::vocabulary::AttributeField;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Catalog load error: {0}")]
    CatalogLoad(#[from] CatalogLoadError),

    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Garment not found: {0}")]
    GarmentNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid model: {0}")]
    Model(String),

    #[error("Search cancelled")]
    Cancelled,
}

/// A garment field value that is not part of the closed vocabulary.
///
/// Recoverable: the selection policy skips the affected candidate pair.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown value '{value}' for attribute '{field}'")]
pub struct UnknownAttributeError {
    pub field: AttributeField,
    pub value: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    #[error("Expected {expected} input features, got {actual}")]
    InvalidInput { expected: usize, actual: usize },

    #[error("Score {0} is outside [0, 1]")]
    ScoreOutOfRange(f32),

    #[error("{0}")]
    Failed(String),
}

#[derive(Error, Debug)]
pub enum CatalogLoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Garment at position {index} has an empty id")]
    EmptyId { index: usize },

    #[error("Unknown garment type: {0}")]
    UnknownCategory(String),

    #[error("Duplicate garment id: {0}")]
    DuplicateId(String),
}
