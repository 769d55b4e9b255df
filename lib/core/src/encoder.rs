//! Attribute encoder
//!
//! Turns a (top, bottom) pair into the fixed-width numeric input the
//! compatibility classifier expects:
//!
//! ```text
//! [top.color1, top.pattern, top.material, top.fit,
//!  bottom.color1, bottom.pattern, bottom.material, bottom.fit]
//! ```

use crate::error::UnknownAttributeError;
use crate::garment::Garment;
use crate::vocabulary::{AttributeField, Vocabulary};
use serde::Serialize;
use std::ops::Index;

/// Encoded values contributed by one garment
pub const GARMENT_FEATURES: usize = AttributeField::ENCODED.len();

/// Width of the classifier input
pub const FEATURE_DIM: usize = 2 * GARMENT_FEATURES;

/// Classifier input for one candidate pair, top features first
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector([f32; FEATURE_DIM]);

impl FeatureVector {
    pub fn new(values: [f32; FEATURE_DIM]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn values(&self) -> [f32; FEATURE_DIM] {
        self.0
    }

    pub fn top(&self) -> &[f32] {
        &self.0[..GARMENT_FEATURES]
    }

    pub fn bottom(&self) -> &[f32] {
        &self.0[GARMENT_FEATURES..]
    }
}

impl Index<usize> for FeatureVector {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        &self.0[index]
    }
}

/// Encode a single field value using the global vocabulary
pub fn encode(field: AttributeField, value: &str) -> Result<u32, UnknownAttributeError> {
    Vocabulary::global().encode(field, value)
}

/// Encode the classifier-relevant fields of one garment
pub fn garment_features(garment: &Garment) -> Result<[f32; GARMENT_FEATURES], UnknownAttributeError> {
    let mut features = [0.0f32; GARMENT_FEATURES];
    for (slot, field) in features.iter_mut().zip(AttributeField::ENCODED) {
        *slot = encode(field, garment.attribute(field))? as f32;
    }
    Ok(features)
}

/// Build the feature vector for an ordered (top, bottom) pair
pub fn feature_vector(top: &Garment, bottom: &Garment) -> Result<FeatureVector, UnknownAttributeError> {
    let top_features = garment_features(top)?;
    let bottom_features = garment_features(bottom)?;

    let mut values = [0.0f32; FEATURE_DIM];
    values[..GARMENT_FEATURES].copy_from_slice(&top_features);
    values[GARMENT_FEATURES..].copy_from_slice(&bottom_features);
    Ok(FeatureVector(values))
}
