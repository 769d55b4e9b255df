//! Candidate pair generation
//!
//! Computes the eligible tops and bottoms under a pinned garment and prompt
//! filters, then presents their cross product in a uniformly random order.
//! The order is drawn from an injected RNG, so a seeded generator yields a
//! reproducible sequence.

use crate::filter::{AttributeFilter, Filter};
use crate::garment::{Catalog, Category, Garment};
use crate::prompt::FilterSpec;
use rand::seq::SliceRandom;
use rand::Rng;

/// An ordered (top, bottom) combination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidatePair<'a> {
    pub top: &'a Garment,
    pub bottom: &'a Garment,
}

/// Eligible garments of one category.
///
/// A pinned garment of that category wins over any filter; otherwise every
/// filter token must match, and an empty token set admits the whole category.
pub fn eligible<'a>(
    catalog: &'a Catalog,
    category: Category,
    pinned: Option<&'a Garment>,
    filters: &FilterSpec,
) -> Vec<&'a Garment> {
    if let Some(pinned) = pinned.filter(|g| g.category == category) {
        return vec![pinned];
    }

    let tokens = filters.tokens(category);
    if tokens.is_empty() {
        return catalog.by_category(category).collect();
    }

    let filter = AttributeFilter::for_category(category, tokens.iter().cloned());
    catalog.iter().filter(|g| filter.matches(g)).collect()
}

/// The randomized cross product of the eligible sets
#[derive(Debug, Clone)]
pub struct CandidateSet<'a> {
    tops: Vec<&'a Garment>,
    bottoms: Vec<&'a Garment>,
    // Permutation of flat indices into tops x bottoms
    order: Vec<usize>,
}

impl<'a> CandidateSet<'a> {
    /// Build the set with a permutation drawn from `rng`
    pub fn new<R: Rng + ?Sized>(tops: Vec<&'a Garment>, bottoms: Vec<&'a Garment>, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..tops.len() * bottoms.len()).collect();
        order.shuffle(rng);
        Self { tops, bottoms, order }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn tops(&self) -> &[&'a Garment] {
        &self.tops
    }

    pub fn bottoms(&self) -> &[&'a Garment] {
        &self.bottoms
    }

    /// Candidate at `position` in the randomized order
    pub fn get(&self, position: usize) -> Option<CandidatePair<'a>> {
        self.order.get(position).map(|&flat| self.pair_at(flat))
    }

    pub fn iter(&self) -> impl Iterator<Item = CandidatePair<'a>> + '_ {
        self.order.iter().map(move |&flat| self.pair_at(flat))
    }

    fn pair_at(&self, flat: usize) -> CandidatePair<'a> {
        let width = self.bottoms.len();
        CandidatePair {
            top: self.tops[flat / width],
            bottom: self.bottoms[flat % width],
        }
    }
}

/// Generate every eligible pair in random order
pub fn generate<'a, R: Rng + ?Sized>(
    catalog: &'a Catalog,
    pinned: Option<&'a Garment>,
    filters: &FilterSpec,
    rng: &mut R,
) -> CandidateSet<'a> {
    let tops = eligible(catalog, Category::Top, pinned, filters);
    let bottoms = eligible(catalog, Category::Bottom, pinned, filters);
    CandidateSet::new(tops, bottoms, rng)
}
