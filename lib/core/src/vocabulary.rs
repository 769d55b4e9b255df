//! Closed attribute vocabularies
//!
//! Every categorical garment field draws its values from a fixed table that
//! maps the value to a small integer code. The color, pattern, material and
//! fit tables feed the classifier; dress code and seasonality are only used
//! for filtering and validation.
//!
//! The tables are built once on first use and never mutated afterwards.

use crate::error::UnknownAttributeError;
use crate::garment::Garment;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

const COLORS: &[(&str, u32)] = &[
    ("red", 0),
    ("blue", 1),
    ("white", 2),
    ("black", 3),
    ("brown", 4),
    ("green", 5),
    ("yellow", 6),
    ("gray", 7),
    ("navy", 8),
    ("pink", 9),
    ("none", 10),
];

const PATTERNS: &[(&str, u32)] = &[
    ("solid", 0),
    ("striped", 1),
    ("floral", 2),
    ("plaid", 3),
    ("polka dot", 4),
];

const MATERIALS: &[(&str, u32)] = &[
    ("cotton", 0),
    ("denim", 1),
    ("silk", 2),
    ("wool", 3),
    ("linen", 4),
    ("polyester", 5),
    ("unknown", 6),
];

const FITS: &[(&str, u32)] = &[
    ("loose", 0),
    ("relaxed", 1),
    ("fitted", 2),
    ("tailored", 3),
    ("slim", 4),
];

const DRESS_CODES: &[(&str, u32)] = &[("formal", 0), ("casual", 1)];

const SEASONS: &[(&str, u32)] = &[
    ("spring", 0),
    ("summer", 1),
    ("fall", 2),
    ("winter", 3),
    ("all", 4),
];

/// A categorical attribute with its own vocabulary table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeField {
    Color,
    Pattern,
    Material,
    Fit,
    DressCode,
    Seasonality,
}

impl AttributeField {
    /// Fields encoded into the classifier input, in feature order
    pub const ENCODED: [AttributeField; 4] = [
        AttributeField::Color,
        AttributeField::Pattern,
        AttributeField::Material,
        AttributeField::Fit,
    ];

    pub const ALL: [AttributeField; 6] = [
        AttributeField::Color,
        AttributeField::Pattern,
        AttributeField::Material,
        AttributeField::Fit,
        AttributeField::DressCode,
        AttributeField::Seasonality,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AttributeField::Color => "color",
            AttributeField::Pattern => "pattern",
            AttributeField::Material => "material",
            AttributeField::Fit => "fit",
            AttributeField::DressCode => "dress_code",
            AttributeField::Seasonality => "seasonality",
        }
    }

    pub fn is_encoded(&self) -> bool {
        Self::ENCODED.contains(self)
    }

    fn entries(&self) -> &'static [(&'static str, u32)] {
        match self {
            AttributeField::Color => COLORS,
            AttributeField::Pattern => PATTERNS,
            AttributeField::Material => MATERIALS,
            AttributeField::Fit => FITS,
            AttributeField::DressCode => DRESS_CODES,
            AttributeField::Seasonality => SEASONS,
        }
    }
}

impl fmt::Display for AttributeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The full set of vocabulary tables
#[derive(Debug)]
pub struct Vocabulary {
    tables: AHashMap<AttributeField, AHashMap<&'static str, u32>>,
}

static VOCABULARY: OnceLock<Vocabulary> = OnceLock::new();

impl Vocabulary {
    fn build() -> Self {
        let tables = AttributeField::ALL
            .iter()
            .map(|field| (*field, field.entries().iter().copied().collect()))
            .collect();
        Self { tables }
    }

    /// Process-wide vocabulary, initialized on first access
    pub fn global() -> &'static Vocabulary {
        VOCABULARY.get_or_init(Vocabulary::build)
    }

    /// Look up the code for `value`, ignoring case
    pub fn encode(&self, field: AttributeField, value: &str) -> Result<u32, UnknownAttributeError> {
        let normalized = value.to_lowercase();
        self.tables
            .get(&field)
            .and_then(|table| table.get(normalized.as_str()))
            .copied()
            .ok_or_else(|| UnknownAttributeError {
                field,
                value: value.to_string(),
            })
    }

    pub fn contains(&self, field: AttributeField, value: &str) -> bool {
        self.encode(field, value).is_ok()
    }

    /// Number of known values for a field
    pub fn size(&self, field: AttributeField) -> usize {
        self.tables.get(&field).map(|t| t.len()).unwrap_or(0)
    }

    /// Report every field of `garment` whose value falls outside the vocabulary.
    ///
    /// Both color slots are checked against the color table.
    pub fn validate(&self, garment: &Garment) -> Vec<UnknownAttributeError> {
        let checks = [
            (AttributeField::Color, garment.color1.as_str()),
            (AttributeField::Color, garment.color2.as_str()),
            (AttributeField::Pattern, garment.pattern.as_str()),
            (AttributeField::Material, garment.material.as_str()),
            (AttributeField::Fit, garment.fit.as_str()),
            (AttributeField::DressCode, garment.dress_code.as_str()),
            (AttributeField::Seasonality, garment.seasonality.as_str()),
        ];

        checks
            .iter()
            .filter_map(|(field, value)| self.encode(*field, value).err())
            .collect()
    }
}
