// Classifier model artifacts stored as JSON layer weights
use outfitx_core::{DenseClassifier, DenseLayer, Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::info;

/// On-disk form of a dense compatibility model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub layers: Vec<DenseLayer>,
}

impl ModelArtifact {
    /// Validate shapes and build the classifier
    pub fn into_classifier(self) -> Result<DenseClassifier> {
        DenseClassifier::new(self.layers)
    }
}

pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<DenseClassifier> {
        let file = File::open(&self.path)
            .map_err(|e| Error::Model(format!("cannot open {}: {}", self.path.display(), e)))?;
        let classifier = Self::from_reader(BufReader::new(file))?;
        info!(
            path = %self.path.display(),
            layers = classifier.layers().len(),
            "Classifier model loaded"
        );
        Ok(classifier)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<DenseClassifier> {
        let artifact: ModelArtifact =
            serde_json::from_reader(reader).map_err(|e| Error::Model(e.to_string()))?;
        artifact.into_classifier()
    }

    pub fn from_json(json: &str) -> Result<DenseClassifier> {
        let artifact: ModelArtifact =
            serde_json::from_str(json).map_err(|e| Error::Model(e.to_string()))?;
        artifact.into_classifier()
    }
}
