//! Free-text preference parsing
//!
//! A prompt narrows one side of the outfit with a comma separated list of
//! attribute values:
//!
//! ```text
//! top: red, striped
//! bottom: denim
//! ```
//!
//! Anything without a recognized prefix means "no preference".

use crate::garment::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const TOP_PREFIX: &str = "top:";
pub const BOTTOM_PREFIX: &str = "bottom:";

/// Per-category attribute tokens, lowercase and trimmed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    pub top: BTreeSet<String>,
    #[serde(default)]
    pub bottom: BTreeSet<String>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add top-side tokens, normalizing each one
    pub fn with_top<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.top.extend(normalize_tokens(tokens));
        self
    }

    /// Add bottom-side tokens, normalizing each one
    pub fn with_bottom<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.bottom.extend(normalize_tokens(tokens));
        self
    }

    /// Union of both specs, side by side
    pub fn merge(mut self, other: FilterSpec) -> Self {
        self.top.extend(other.top);
        self.bottom.extend(other.bottom);
        self
    }

    pub fn tokens(&self, category: Category) -> &BTreeSet<String> {
        match category {
            Category::Top => &self.top,
            Category::Bottom => &self.bottom,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_empty() && self.bottom.is_empty()
    }
}

fn normalize_tokens<I, S>(tokens: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
}

/// Parse a prompt into a filter spec.
///
/// Only one prefix is honored per call; the other side stays unfiltered.
pub fn parse(prompt: &str) -> FilterSpec {
    let normalized = prompt.trim().to_lowercase();

    if let Some(rest) = normalized.strip_prefix(TOP_PREFIX) {
        FilterSpec::new().with_top(rest.split(','))
    } else if let Some(rest) = normalized.strip_prefix(BOTTOM_PREFIX) {
        FilterSpec::new().with_bottom(rest.split(','))
    } else {
        FilterSpec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tokens: &[&str]) -> BTreeSet<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_top_prefix() {
        let spec = parse("top:red,solid");
        assert_eq!(spec.top, set(&["red", "solid"]));
        assert!(spec.bottom.is_empty());
    }

    #[test]
    fn test_bottom_prefix_with_noise() {
        let spec = parse("  BOTTOM:  Denim , ,Slim,  ");
        assert_eq!(spec.bottom, set(&["denim", "slim"]));
        assert!(spec.top.is_empty());
    }

    #[test]
    fn test_multi_word_token_is_kept_whole() {
        let spec = parse("top: polka dot , pink");
        assert_eq!(spec.top, set(&["polka dot", "pink"]));
    }

    #[test]
    fn test_unrecognized_prompt_is_empty() {
        assert!(parse("").is_empty());
        assert!(parse("   ").is_empty());
        assert!(parse("something red please").is_empty());
        assert!(parse("shoes: black").is_empty());
    }

    #[test]
    fn test_prefix_without_tokens_is_empty() {
        assert!(parse("top:").is_empty());
        assert!(parse("bottom: , ,").is_empty());
    }

    #[test]
    fn test_only_first_prefix_applies() {
        // The remainder is treated as tokens, not as a second constraint
        let spec = parse("top:red,bottom:blue");
        assert_eq!(spec.top, set(&["red", "bottom:blue"]));
        assert!(spec.bottom.is_empty());
    }

    #[test]
    fn test_merge_combines_both_sides() {
        let spec = parse("top: red").merge(parse("bottom: denim"));
        assert_eq!(spec.top, set(&["red"]));
        assert_eq!(spec.bottom, set(&["denim"]));
        assert_eq!(spec.tokens(Category::Bottom), &set(&["denim"]));
    }

    #[test]
    fn test_builder_normalizes() {
        let spec = FilterSpec::new().with_top([" Navy ", ""]).with_bottom(vec!["WOOL".to_string()]);
        assert_eq!(spec.top, set(&["navy"]));
        assert_eq!(spec.bottom, set(&["wool"]));
    }
}
