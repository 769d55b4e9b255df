// Garment attribute filters used to compute eligible sets
use crate::garment::{Category, Garment};

pub trait Filter {
    fn matches(&self, garment: &Garment) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterCondition {
    /// The garment belongs to this category
    Category(Category),
    /// One of the garment's seven attribute values equals the token
    Token(String),
    And(Vec<FilterCondition>),
}

pub struct AttributeFilter {
    condition: FilterCondition,
}

impl AttributeFilter {
    pub fn new(condition: FilterCondition) -> Self {
        Self { condition }
    }

    /// Items of `category` carrying every token
    pub fn for_category<I, S>(category: Category, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut conditions = vec![FilterCondition::Category(category)];
        conditions.extend(tokens.into_iter().map(|t| FilterCondition::Token(t.into())));
        Self::new(FilterCondition::And(conditions))
    }

    fn matches_condition(condition: &FilterCondition, garment: &Garment) -> bool {
        match condition {
            FilterCondition::Category(category) => garment.category == *category,
            FilterCondition::Token(token) => garment.has_attribute(token),
            FilterCondition::And(conditions) => {
                conditions.iter().all(|c| Self::matches_condition(c, garment))
            }
        }
    }
}

impl Filter for AttributeFilter {
    fn matches(&self, garment: &Garment) -> bool {
        Self::matches_condition(&self.condition, garment)
    }
}
