//! Selection policy
//!
//! Walks the randomized candidate sequence and accepts the **first** pair
//! whose compatibility score reaches the threshold. This is a
//! first-over-threshold search, not best-of-all: which acceptable pair comes
//! back varies with the candidate order.
//!
//! Failure isolation:
//! - a pair with an attribute outside the vocabulary is skipped;
//! - a classifier failure aborts the current search with [`Error::Classifier`];
//! - no eligible candidates is simply [`DecisionOutcome::NotFound`].

use crate::candidate::{self, CandidatePair, CandidateSet};
use crate::classifier::Classifier;
use crate::encoder;
use crate::error::{ClassifierError, Error, Result};
use crate::garment::{Catalog, Garment};
use crate::prompt::{self, FilterSpec};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// Tuning knobs for a [`Recommender`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Minimum score for a pair to be accepted, in `[0, 1]`
    pub threshold: f32,
    /// Fixed seed for the candidate order; `None` draws a fresh order per search
    pub seed: Option<u64>,
    /// Score candidates on the rayon pool
    pub parallel: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            seed: None,
            parallel: false,
        }
    }
}

impl SelectionConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::InvalidConfig(format!(
                "threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Result of one search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DecisionOutcome {
    Found { top: Garment, bottom: Garment },
    NotFound,
}

impl DecisionOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, DecisionOutcome::Found { .. })
    }

    pub fn pair(&self) -> Option<(&Garment, &Garment)> {
        match self {
            DecisionOutcome::Found { top, bottom } => Some((top, bottom)),
            DecisionOutcome::NotFound => None,
        }
    }
}

impl From<Option<CandidatePair<'_>>> for DecisionOutcome {
    fn from(pair: Option<CandidatePair<'_>>) -> Self {
        match pair {
            Some(pair) => DecisionOutcome::Found {
                top: pair.top.clone(),
                bottom: pair.bottom.clone(),
            },
            None => DecisionOutcome::NotFound,
        }
    }
}

/// Counters for one search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Size of the candidate sequence
    pub candidates: usize,
    /// Pairs the classifier was asked to score
    pub scored: usize,
    /// Pairs dropped because an attribute could not be encoded
    pub skipped: usize,
}

/// Cooperative cancellation flag, checked before each candidate
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

enum Evaluation {
    Accepted,
    Rejected,
    Skipped,
}

#[derive(Default)]
struct Counters {
    scored: AtomicUsize,
    skipped: AtomicUsize,
}

/// The recommendation engine: a classifier plus an acceptance policy.
///
/// Holds no per-search state, so one instance can serve concurrent callers.
pub struct Recommender<C> {
    classifier: C,
    config: SelectionConfig,
}

impl<C: Classifier> Recommender<C> {
    /// Create a recommender with the default configuration
    pub fn new(classifier: C) -> Self {
        Self {
            classifier,
            config: SelectionConfig::default(),
        }
    }

    pub fn with_config(classifier: C, config: SelectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { classifier, config })
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Recommend a pair for a free-text prompt
    pub fn select(&self, catalog: &Catalog, pinned: Option<&Garment>, prompt: &str) -> Result<DecisionOutcome> {
        self.select_with_filters(catalog, pinned, &prompt::parse(prompt))
    }

    /// Recommend a pair for a free-text prompt, accepting scores at or above
    /// `threshold` instead of the configured one
    pub fn select_with_threshold(
        &self,
        catalog: &Catalog,
        pinned: Option<&Garment>,
        prompt: &str,
        threshold: f32,
    ) -> Result<DecisionOutcome> {
        SelectionConfig { threshold, ..self.config.clone() }.validate()?;
        self.search(catalog, pinned, &prompt::parse(prompt), threshold, None)
            .map(|(outcome, _)| outcome)
    }

    /// Recommend a pair under prebuilt filters
    pub fn select_with_filters(
        &self,
        catalog: &Catalog,
        pinned: Option<&Garment>,
        filters: &FilterSpec,
    ) -> Result<DecisionOutcome> {
        self.select_detailed(catalog, pinned, filters, None)
            .map(|(outcome, _)| outcome)
    }

    /// Recommend a pair, reporting search counters and honoring cancellation.
    ///
    /// The candidate order comes from the configured seed when set, otherwise
    /// from the thread RNG.
    pub fn select_detailed(
        &self,
        catalog: &Catalog,
        pinned: Option<&Garment>,
        filters: &FilterSpec,
        cancel: Option<&CancellationToken>,
    ) -> Result<(DecisionOutcome, SearchStats)> {
        self.search(catalog, pinned, filters, self.config.threshold, cancel)
    }

    /// Recommend a pair with the candidate order drawn from `rng`
    pub fn select_with_rng<R: Rng + ?Sized>(
        &self,
        catalog: &Catalog,
        pinned: Option<&Garment>,
        filters: &FilterSpec,
        rng: &mut R,
        cancel: Option<&CancellationToken>,
    ) -> Result<(DecisionOutcome, SearchStats)> {
        self.search_with_rng(catalog, pinned, filters, rng, self.config.threshold, cancel)
    }

    fn search(
        &self,
        catalog: &Catalog,
        pinned: Option<&Garment>,
        filters: &FilterSpec,
        threshold: f32,
        cancel: Option<&CancellationToken>,
    ) -> Result<(DecisionOutcome, SearchStats)> {
        match self.config.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                self.search_with_rng(catalog, pinned, filters, &mut rng, threshold, cancel)
            }
            None => {
                let mut rng = rand::rng();
                self.search_with_rng(catalog, pinned, filters, &mut rng, threshold, cancel)
            }
        }
    }

    fn search_with_rng<R: Rng + ?Sized>(
        &self,
        catalog: &Catalog,
        pinned: Option<&Garment>,
        filters: &FilterSpec,
        rng: &mut R,
        threshold: f32,
        cancel: Option<&CancellationToken>,
    ) -> Result<(DecisionOutcome, SearchStats)> {
        let candidates = candidate::generate(catalog, pinned, filters, rng);
        debug!(
            tops = candidates.tops().len(),
            bottoms = candidates.bottoms().len(),
            candidates = candidates.len(),
            pinned = pinned.map(|g| g.id.as_str()),
            "Generated candidate pairs"
        );

        let (pair, stats) = self.scan_at(&candidates, threshold, cancel)?;
        let outcome = DecisionOutcome::from(pair);

        match outcome.pair() {
            Some((top, bottom)) => info!(
                top = %top.id,
                bottom = %bottom.id,
                scored = stats.scored,
                skipped = stats.skipped,
                "Recommended outfit"
            ),
            None => info!(
                candidates = stats.candidates,
                scored = stats.scored,
                skipped = stats.skipped,
                "No recommended combination found"
            ),
        }

        Ok((outcome, stats))
    }

    /// Find the first accepted pair in the set's order.
    ///
    /// In parallel mode pairs are scored concurrently, but the answer is the
    /// earliest position that is either accepted or fails in the classifier,
    /// so the outcome matches the sequential scan for the same order.
    pub fn scan<'a>(
        &self,
        candidates: &CandidateSet<'a>,
        cancel: Option<&CancellationToken>,
    ) -> Result<(Option<CandidatePair<'a>>, SearchStats)> {
        self.scan_at(candidates, self.config.threshold, cancel)
    }

    fn scan_at<'a>(
        &self,
        candidates: &CandidateSet<'a>,
        threshold: f32,
        cancel: Option<&CancellationToken>,
    ) -> Result<(Option<CandidatePair<'a>>, SearchStats)> {
        let counters = Counters::default();

        let decided = if candidates.is_empty() {
            None
        } else if self.config.parallel {
            (0..candidates.len()).into_par_iter().find_map_first(|position| {
                let pair = candidates.get(position)?;
                self.decide(pair, threshold, cancel, &counters).map(|r| r.map(|_| pair))
            })
        } else {
            candidates
                .iter()
                .find_map(|pair| {
                    self.decide(pair, threshold, cancel, &counters).map(|r| r.map(|_| pair))
                })
        };

        let stats = SearchStats {
            candidates: candidates.len(),
            scored: counters.scored.load(Ordering::Relaxed),
            skipped: counters.skipped.load(Ordering::Relaxed),
        };
        debug!(?stats, "Candidate scan finished");

        match decided {
            Some(Ok(pair)) => Ok((Some(pair), stats)),
            Some(Err(e)) => Err(e),
            None => Ok((None, stats)),
        }
    }

    // Some(..) ends the scan: acceptance, cancellation or classifier failure
    fn decide(
        &self,
        pair: CandidatePair<'_>,
        threshold: f32,
        cancel: Option<&CancellationToken>,
        counters: &Counters,
    ) -> Option<Result<()>> {
        if cancel.is_some_and(|c| c.is_cancelled()) {
            return Some(Err(Error::Cancelled));
        }

        match self.evaluate(pair, threshold, counters) {
            Ok(Evaluation::Accepted) => Some(Ok(())),
            Ok(Evaluation::Rejected) | Ok(Evaluation::Skipped) => None,
            Err(e) => Some(Err(e)),
        }
    }

    fn evaluate(&self, pair: CandidatePair<'_>, threshold: f32, counters: &Counters) -> Result<Evaluation> {
        let features = match encoder::feature_vector(pair.top, pair.bottom) {
            Ok(features) => features,
            Err(e) => {
                counters.skipped.fetch_add(1, Ordering::Relaxed);
                warn!(
                    top = %pair.top.id,
                    bottom = %pair.bottom.id,
                    error = %e,
                    "Skipping candidate pair with unencodable attribute"
                );
                return Ok(Evaluation::Skipped);
            }
        };

        counters.scored.fetch_add(1, Ordering::Relaxed);
        let score = self.classifier.score(&features)?;
        if !(0.0..=1.0).contains(&score) {
            return Err(ClassifierError::ScoreOutOfRange(score).into());
        }

        if score >= threshold {
            Ok(Evaluation::Accepted)
        } else {
            Ok(Evaluation::Rejected)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::from_fn;
    use crate::encoder::FeatureVector;
    use crate::garment::Category;

    fn garment(id: &str, category: Category, color: &str) -> Garment {
        Garment {
            id: id.to_string(),
            category,
            color1: color.to_string(),
            color2: "none".to_string(),
            pattern: "solid".to_string(),
            dress_code: "casual".to_string(),
            material: "cotton".to_string(),
            seasonality: "all".to_string(),
            fit: "relaxed".to_string(),
        }
    }

    // Colors double as identities for stub classifiers
    fn catalog() -> Catalog {
        Catalog::new(vec![
            garment("T1", Category::Top, "red"),
            garment("T2", Category::Top, "blue"),
            garment("T3", Category::Top, "white"),
            garment("B1", Category::Bottom, "black"),
            garment("B2", Category::Bottom, "brown"),
            garment("B3", Category::Bottom, "green"),
        ])
        .unwrap()
    }

    fn only_red_black(features: &FeatureVector) -> std::result::Result<f32, ClassifierError> {
        // red = 0, black = 3
        if features[0] == 0.0 && features[4] == 3.0 {
            Ok(0.9)
        } else {
            Ok(0.1)
        }
    }

    #[test]
    fn test_finds_the_single_acceptable_pair() {
        let catalog = catalog();
        for seed in 0..20 {
            let config = SelectionConfig { seed: Some(seed), ..Default::default() };
            let engine = Recommender::with_config(from_fn(only_red_black), config).unwrap();
            let outcome = engine.select(&catalog, None, "").unwrap();
            let (top, bottom) = outcome.pair().unwrap();
            assert_eq!((top.id.as_str(), bottom.id.as_str()), ("T1", "B1"));
        }
    }

    #[test]
    fn test_low_scores_mean_not_found() {
        let engine = Recommender::new(from_fn(|_: &FeatureVector| Ok(0.1)));
        let (outcome, stats) = engine
            .select_detailed(&catalog(), None, &FilterSpec::default(), None)
            .unwrap();
        assert_eq!(outcome, DecisionOutcome::NotFound);
        assert_eq!(stats.candidates, 9);
        assert_eq!(stats.scored, 9);
    }

    #[test]
    fn test_empty_side_never_calls_classifier() {
        let calls = AtomicUsize::new(0);
        let engine = Recommender::new(from_fn(|_: &FeatureVector| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(1.0)
        }));
        let tops_only = Catalog::new(vec![garment("T1", Category::Top, "red")]).unwrap();

        let outcome = engine.select(&tops_only, None, "").unwrap();
        assert_eq!(outcome, DecisionOutcome::NotFound);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_first_over_threshold_stops_early() {
        let calls = AtomicUsize::new(0);
        let engine = Recommender::new(from_fn(|_: &FeatureVector| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(0.5)
        }));
        let outcome = engine.select(&catalog(), None, "").unwrap();
        assert!(outcome.is_found());
        // threshold is inclusive
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_first_acceptable_in_order_wins_over_higher_score() {
        let catalog = catalog();
        let filters = FilterSpec::default();
        // Every pair passes, but red/black scores highest
        let engine = Recommender::new(from_fn(|f: &FeatureVector| {
            Ok(if f[0] == 0.0 && f[4] == 3.0 { 1.0 } else { 0.6 })
        }));

        let mut rng = StdRng::seed_from_u64(11);
        let expected = candidate::generate(&catalog, None, &filters, &mut rng)
            .get(0)
            .map(|p| (p.top.id.clone(), p.bottom.id.clone()))
            .unwrap();

        let mut rng = StdRng::seed_from_u64(11);
        let (outcome, _) = engine
            .select_with_rng(&catalog, None, &filters, &mut rng, None)
            .unwrap();
        let (top, bottom) = outcome.pair().unwrap();
        assert_eq!((top.id.clone(), bottom.id.clone()), expected);
    }

    #[test]
    fn test_unencodable_pairs_are_skipped() {
        let mut odd = garment("T9", Category::Top, "teal");
        odd.material = "leather".to_string();
        let catalog = Catalog::new(vec![
            odd,
            garment("T1", Category::Top, "red"),
            garment("B1", Category::Bottom, "black"),
        ])
        .unwrap();

        let engine = Recommender::new(from_fn(only_red_black));
        let (outcome, stats) = engine
            .select_detailed(&catalog, None, &FilterSpec::default(), None)
            .unwrap();
        assert_eq!(outcome.pair().unwrap().0.id, "T1");
        assert!(stats.skipped <= 1);

        // Only the bad pair left: skipped, not an error
        let pinned = catalog.get("T9").unwrap();
        let (outcome, stats) = engine
            .select_detailed(&catalog, Some(pinned), &FilterSpec::default(), None)
            .unwrap();
        assert_eq!(outcome, DecisionOutcome::NotFound);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.scored, 0);
    }

    #[test]
    fn test_classifier_failure_aborts_search() {
        let engine = Recommender::new(from_fn(|_: &FeatureVector| {
            Err(ClassifierError::Failed("model unavailable".to_string()))
        }));
        let result = engine.select(&catalog(), None, "");
        assert!(matches!(result, Err(Error::Classifier(ClassifierError::Failed(_)))));
    }

    #[test]
    fn test_out_of_range_score_is_a_classifier_error() {
        let engine = Recommender::new(from_fn(|_: &FeatureVector| Ok(f32::NAN)));
        let result = engine.select(&catalog(), None, "");
        assert!(matches!(
            result,
            Err(Error::Classifier(ClassifierError::ScoreOutOfRange(_)))
        ));
    }

    #[test]
    fn test_cancelled_search() {
        let token = CancellationToken::new();
        token.cancel();
        let engine = Recommender::new(from_fn(|_: &FeatureVector| Ok(1.0)));
        let result = engine.select_detailed(&catalog(), None, &FilterSpec::default(), Some(&token));
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[test]
    fn test_cancel_during_scan_stops_after_current_pair() {
        let token = CancellationToken::new();
        let calls = AtomicUsize::new(0);
        let engine = Recommender::new(from_fn(|_: &FeatureVector| {
            calls.fetch_add(1, Ordering::SeqCst);
            token.cancel();
            Ok(0.1)
        }));

        let result = engine.select_detailed(&catalog(), None, &FilterSpec::default(), Some(&token));
        assert!(matches!(result, Err(Error::Cancelled)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_per_call_threshold_overrides_config() {
        let engine = Recommender::new(from_fn(|_: &FeatureVector| Ok(0.3)));
        let catalog = catalog();

        assert_eq!(engine.select(&catalog, None, "").unwrap(), DecisionOutcome::NotFound);
        assert!(engine
            .select_with_threshold(&catalog, None, "", 0.3)
            .unwrap()
            .is_found());
        assert_eq!(
            engine.select_with_threshold(&catalog, None, "", 0.31).unwrap(),
            DecisionOutcome::NotFound
        );
        // the configured threshold is left untouched
        assert_eq!(engine.config().threshold, DEFAULT_THRESHOLD);
        assert!(matches!(
            engine.select_with_threshold(&catalog, None, "", 1.5),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let catalog = catalog();
        let scorer = |f: &FeatureVector| -> std::result::Result<f32, ClassifierError> {
            Ok(if f[0] == 2.0 || f[4] == 5.0 { 0.8 } else { 0.2 })
        };

        for seed in 0..10 {
            let sequential = Recommender::with_config(
                from_fn(scorer),
                SelectionConfig { seed: Some(seed), ..Default::default() },
            )
            .unwrap();
            let parallel = Recommender::with_config(
                from_fn(scorer),
                SelectionConfig { seed: Some(seed), parallel: true, ..Default::default() },
            )
            .unwrap();

            assert_eq!(
                sequential.select(&catalog, None, "").unwrap(),
                parallel.select(&catalog, None, "").unwrap()
            );
        }
    }

    #[test]
    fn test_prompt_flows_into_search() {
        let engine = Recommender::new(from_fn(|_: &FeatureVector| Ok(0.9)));
        let outcome = engine.select(&catalog(), None, "bottom: green").unwrap();
        assert_eq!(outcome.pair().unwrap().1.id, "B3");

        let outcome = engine.select(&catalog(), None, "bottom: purple").unwrap();
        assert_eq!(outcome, DecisionOutcome::NotFound);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        for threshold in [-0.1, 1.5, f32::NAN] {
            let config = SelectionConfig { threshold, ..Default::default() };
            assert!(matches!(
                Recommender::with_config(from_fn(|_: &FeatureVector| Ok(0.0)), config),
                Err(Error::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let value = serde_json::to_value(DecisionOutcome::NotFound).unwrap();
        assert_eq!(value["status"], "not_found");

        let catalog = catalog();
        let outcome = DecisionOutcome::Found {
            top: catalog.get("T1").unwrap().clone(),
            bottom: catalog.get("B1").unwrap().clone(),
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["status"], "found");
        assert_eq!(value["bottom"]["id"], "B1");
    }
}
