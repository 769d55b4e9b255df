use crate::error::CatalogLoadError;
use crate::vocabulary::AttributeField;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which side of an outfit a garment can occupy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Category {
    Top,
    Bottom,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Top => "top",
            Category::Bottom => "bottom",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CatalogLoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "top" => Ok(Category::Top),
            "bottom" => Ok(Category::Bottom),
            _ => Err(CatalogLoadError::UnknownCategory(s.to_string())),
        }
    }
}

impl TryFrom<String> for Category {
    type Error = CatalogLoadError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A single catalog entry
///
/// Field values are stored as loaded and compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Garment {
    pub id: String,
    #[serde(rename = "type")]
    pub category: Category,
    pub color1: String,
    pub color2: String,
    pub pattern: String,
    pub dress_code: String,
    pub material: String,
    pub seasonality: String,
    pub fit: String,
}

impl Garment {
    /// The value stored for an attribute field (the primary color for `Color`)
    pub fn attribute(&self, field: AttributeField) -> &str {
        match field {
            AttributeField::Color => &self.color1,
            AttributeField::Pattern => &self.pattern,
            AttributeField::Material => &self.material,
            AttributeField::Fit => &self.fit,
            AttributeField::DressCode => &self.dress_code,
            AttributeField::Seasonality => &self.seasonality,
        }
    }

    /// All seven values a filter token may match against
    pub fn attribute_values(&self) -> [&str; 7] {
        [
            self.color1.as_str(),
            self.color2.as_str(),
            self.pattern.as_str(),
            self.material.as_str(),
            self.seasonality.as_str(),
            self.dress_code.as_str(),
            self.fit.as_str(),
        ]
    }

    /// True if `token` equals one of the attribute values, ignoring case.
    /// Whole-value equality only; substrings never match.
    pub fn has_attribute(&self, token: &str) -> bool {
        let token = token.to_lowercase();
        self.attribute_values()
            .iter()
            .any(|value| value.to_lowercase() == token)
    }

    /// Asset path used by the presentation layer: `{category}/{id}.jpeg`
    pub fn image_path(&self) -> String {
        format!("{}/{}.jpeg", self.category, self.id)
    }

    pub fn is_top(&self) -> bool {
        self.category == Category::Top
    }

    pub fn is_bottom(&self) -> bool {
        self.category == Category::Bottom
    }
}

/// Ordered, id-unique garment collection
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    garments: Vec<Garment>,
}

impl Catalog {
    /// Build a catalog, rejecting empty or duplicate ids
    pub fn new(garments: Vec<Garment>) -> Result<Self, CatalogLoadError> {
        {
            let mut seen = AHashSet::with_capacity(garments.len());
            for (index, garment) in garments.iter().enumerate() {
                if garment.id.trim().is_empty() {
                    return Err(CatalogLoadError::EmptyId { index });
                }
                if !seen.insert(garment.id.as_str()) {
                    return Err(CatalogLoadError::DuplicateId(garment.id.clone()));
                }
            }
        }
        Ok(Self { garments })
    }

    pub fn len(&self) -> usize {
        self.garments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.garments.is_empty()
    }

    pub fn garments(&self) -> &[Garment] {
        &self.garments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Garment> {
        self.garments.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Garment> {
        self.garments.iter().find(|g| g.id == id)
    }

    /// Garments of one category, in catalog order
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Garment> + '_ {
        self.garments.iter().filter(move |g| g.category == category)
    }

    pub fn tops(&self) -> impl Iterator<Item = &Garment> + '_ {
        self.by_category(Category::Top)
    }

    pub fn bottoms(&self) -> impl Iterator<Item = &Garment> + '_ {
        self.by_category(Category::Bottom)
    }

    pub fn count(&self, category: Category) -> usize {
        self.by_category(category).count()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Garment;
    type IntoIter = std::slice::Iter<'a, Garment>;

    fn into_iter(self) -> Self::IntoIter {
        self.garments.iter()
    }
}
