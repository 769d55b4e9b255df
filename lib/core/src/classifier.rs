//! Compatibility classifier boundary
//!
//! The selection policy only needs a scoring function from a
//! [`FeatureVector`] to a probability in `[0, 1]`. [`Classifier`] is that
//! seam: tests inject closures through [`from_fn`], production code plugs in a
//! [`DenseClassifier`] whose weights come from a model artifact.

use crate::encoder::{FeatureVector, FEATURE_DIM};
use crate::error::{ClassifierError, Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Scores a candidate pair's feature vector
pub trait Classifier: Send + Sync {
    fn score(&self, features: &FeatureVector) -> std::result::Result<f32, ClassifierError>;
}

impl<C: Classifier + ?Sized> Classifier for Arc<C> {
    fn score(&self, features: &FeatureVector) -> std::result::Result<f32, ClassifierError> {
        (**self).score(features)
    }
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn score(&self, features: &FeatureVector) -> std::result::Result<f32, ClassifierError> {
        (**self).score(features)
    }
}

/// Adapter turning a closure into a [`Classifier`]
#[derive(Clone)]
pub struct FnClassifier<F> {
    func: F,
}

impl<F> Classifier for FnClassifier<F>
where
    F: Fn(&FeatureVector) -> std::result::Result<f32, ClassifierError> + Send + Sync,
{
    fn score(&self, features: &FeatureVector) -> std::result::Result<f32, ClassifierError> {
        (self.func)(features)
    }
}

/// Wrap a scoring closure
pub fn from_fn<F>(func: F) -> FnClassifier<F>
where
    F: Fn(&FeatureVector) -> std::result::Result<f32, ClassifierError> + Send + Sync,
{
    FnClassifier { func }
}

/// Layer activation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    #[default]
    Linear,
    Relu,
    Sigmoid,
}

impl Activation {
    fn apply(&self, x: f32) -> f32 {
        match self {
            Activation::Linear => x,
            Activation::Relu => x.max(0.0),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
        }
    }
}

/// Fully connected layer; `weights` is row-major `[output][input]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
    #[serde(default)]
    pub activation: Activation,
}

impl DenseLayer {
    pub fn input_dim(&self) -> usize {
        self.weights.first().map(|row| row.len()).unwrap_or(0)
    }

    pub fn output_dim(&self) -> usize {
        self.weights.len()
    }

    fn forward(&self, input: &[f32]) -> Vec<f32> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(row, bias)| {
                let sum: f32 = row.iter().zip(input).map(|(w, x)| w * x).sum();
                self.activation.apply(sum + bias)
            })
            .collect()
    }
}

/// Feed-forward network over the 8-wide pair encoding with a single output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DenseClassifier {
    layers: Vec<DenseLayer>,
}

impl DenseClassifier {
    /// Build a network, checking that layer shapes chain from
    /// `FEATURE_DIM` inputs down to one output
    pub fn new(layers: Vec<DenseLayer>) -> Result<Self> {
        if layers.is_empty() {
            return Err(Error::Model("network has no layers".to_string()));
        }

        let mut expected_input = FEATURE_DIM;
        for (index, layer) in layers.iter().enumerate() {
            if layer.output_dim() == 0 {
                return Err(Error::Model(format!("layer {index} has no units")));
            }
            if layer.bias.len() != layer.output_dim() {
                return Err(Error::Model(format!(
                    "layer {index} has {} weight rows but {} biases",
                    layer.output_dim(),
                    layer.bias.len()
                )));
            }
            if let Some(row) = layer.weights.iter().position(|r| r.len() != expected_input) {
                return Err(Error::Model(format!(
                    "layer {index} row {row} expects {expected_input} inputs, got {}",
                    layer.weights[row].len()
                )));
            }
            expected_input = layer.output_dim();
        }

        if expected_input != 1 {
            return Err(Error::Model(format!(
                "network must end in a single output, got {expected_input}"
            )));
        }

        Ok(Self { layers })
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }
}

impl Classifier for DenseClassifier {
    fn score(&self, features: &FeatureVector) -> std::result::Result<f32, ClassifierError> {
        let output = self
            .layers
            .iter()
            .fold(features.as_slice().to_vec(), |input, layer| layer.forward(&input));

        match output.as_slice() {
            [score] => Ok(*score),
            other => Err(ClassifierError::Failed(format!(
                "network produced {} outputs",
                other.len()
            ))),
        }
    }
}
