//! Weighted-random selection over the arm population
//!
//! The bandit keeps two disjoint arm collections: `base_arms`, configured
//! at construction and immune to feedback-driven updates, and `arms`, the
//! dynamic set the feedback interpreter may replace wholesale. Selection
//! treats them as one flat pool.
//!
//! Selection is score-driven softmax-style exploitation: each eligible
//! arm is weighted by `score^alpha`, sharpening preference for
//! higher-scored arms super-linearly, with a hard eligibility floor so
//! content the user actively dislikes never resurfaces until an update
//! resets its score.

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::trace;

use crate::error::{CuratorError, Result};
use super::arm::Arm;

/// Minimum score an arm must have to be selectable
pub const ELIGIBILITY_FLOOR: f64 = 4.0;
/// Default exponent applied to scores when weighting
pub const DEFAULT_ALPHA: f64 = 2.0;

/// The weighted-random-selection engine over the arm population
#[derive(Debug)]
pub struct Bandit {
    base_arms: Vec<Arm>,
    arms: Vec<Arm>,
    alpha: f64,
    rng: StdRng,
}

impl Bandit {
    /// Create a bandit seeded from OS entropy
    pub fn new(base_arms: Vec<Arm>, arms: Vec<Arm>, alpha: f64) -> Self {
        Self {
            base_arms,
            arms,
            alpha,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Create a bandit with a fixed RNG seed for reproducible selection
    pub fn with_seed(base_arms: Vec<Arm>, arms: Vec<Arm>, alpha: f64, seed: u64) -> Self {
        Self {
            base_arms,
            arms,
            alpha,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Permanent arms, immune to update operations
    pub fn base_arms(&self) -> &[Arm] {
        &self.base_arms
    }

    /// Dynamic arms, replaceable by update operations
    pub fn dynamic_arms(&self) -> &[Arm] {
        &self.arms
    }

    /// Whether `name` belongs to a protected base arm
    pub fn is_base(&self, name: &str) -> bool {
        self.base_arms.iter().any(|a| a.name() == name)
    }

    /// The flat candidate pool: base arms followed by dynamic arms.
    /// Order is stable so tests can reproduce selection exactly.
    pub fn candidate_arms(&self) -> impl Iterator<Item = &Arm> {
        self.base_arms.iter().chain(self.arms.iter())
    }

    fn candidate_mut(&mut self, index: usize) -> &mut Arm {
        let base_len = self.base_arms.len();
        if index < base_len {
            &mut self.base_arms[index]
        } else {
            &mut self.arms[index - base_len]
        }
    }

    /// Indices into the candidate pool with score at or above the floor,
    /// paired with their unnormalized `score^alpha` weights
    fn eligible_weights(&self) -> Result<(Vec<usize>, Vec<f64>)> {
        let mut indices = Vec::new();
        let mut weights = Vec::new();
        for (i, arm) in self.candidate_arms().enumerate() {
            if arm.score() >= ELIGIBILITY_FLOOR {
                indices.push(i);
                weights.push(arm.score().powf(self.alpha));
            }
        }
        if indices.is_empty() {
            return Err(CuratorError::NoEligibleArms {
                floor: ELIGIBILITY_FLOOR,
            });
        }
        Ok((indices, weights))
    }

    /// Selection probability for every eligible arm, as `(name, p)` pairs
    /// in candidate-pool order. Probabilities sum to 1.
    pub fn probabilities(&self) -> Result<Vec<(String, f64)>> {
        let (indices, weights) = self.eligible_weights()?;
        let total: f64 = weights.iter().sum();
        let arms: Vec<&Arm> = self.candidate_arms().collect();
        Ok(indices
            .iter()
            .zip(weights.iter())
            .map(|(&i, w)| (arms[i].name().to_string(), w / total))
            .collect())
    }

    /// Draw one arm from the eligible set, weighted by `score^alpha`.
    /// A weighted draw, not an argmax: lower-scored eligible arms still
    /// surface in proportion to their relative score.
    pub fn select_arm(&mut self) -> Result<&mut Arm> {
        let (indices, weights) = self.eligible_weights()?;
        let dist = WeightedIndex::new(&weights).map_err(|_| CuratorError::NoEligibleArms {
            floor: ELIGIBILITY_FLOOR,
        })?;
        let picked = indices[dist.sample(&mut self.rng)];
        trace!(index = picked, "arm selected");
        Ok(self.candidate_mut(picked))
    }

    /// Pull the arm and apply the decay toward neutral
    pub fn pull_and_decay(arm: &mut Arm) {
        arm.decay();
    }

    /// Replace the entire dynamic arm collection
    pub fn replace_dynamic(&mut self, arms: Vec<Arm>) {
        self.arms = arms;
    }

    /// Append an arm to the dynamic collection
    pub fn push_dynamic(&mut self, arm: Arm) {
        self.arms.push(arm);
    }

    /// Remove a dynamic arm by name; false if no such arm exists
    pub fn remove_dynamic(&mut self, name: &str) -> bool {
        let before = self.arms.len();
        self.arms.retain(|a| a.name() != name);
        self.arms.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samplers::SamplerType;
    use std::collections::HashMap;

    fn arm(name: &str, tag: SamplerType, score: f64) -> Arm {
        Arm::new(name, HashMap::new(), tag).with_score(score)
    }

    fn prob_of(bandit: &Bandit, name: &str) -> f64 {
        bandit
            .probabilities()
            .unwrap()
            .into_iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p)
            .unwrap_or(0.0)
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let bandit = Bandit::with_seed(
            vec![arm("a", SamplerType::News, 8.0)],
            vec![
                arm("b", SamplerType::Comic, 6.0),
                arm("c", SamplerType::Paper, 4.5),
            ],
            DEFAULT_ALPHA,
            7,
        );
        let sum: f64 = bandit.probabilities().unwrap().iter().map(|(_, p)| p).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_floor_excludes_disliked_arms() {
        // News(8) vs Comic(2): the comic sits below the floor, so the
        // news arm takes the whole distribution.
        let bandit = Bandit::with_seed(
            vec![],
            vec![
                arm("news", SamplerType::News, 8.0),
                arm("comic", SamplerType::Comic, 2.0),
            ],
            2.0,
            1,
        );
        let probs = bandit.probabilities().unwrap();
        assert_eq!(probs.len(), 1);
        assert_eq!(probs[0].0, "news");
        assert!((probs[0].1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_equal_scores_split_evenly() {
        let bandit = Bandit::with_seed(
            vec![],
            vec![
                arm("a", SamplerType::News, 6.0),
                arm("b", SamplerType::Comic, 6.0),
            ],
            2.0,
            1,
        );
        assert!((prob_of(&bandit, "a") - 0.5).abs() < 1e-12);
        assert!((prob_of(&bandit, "b") - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_raising_a_score_raises_its_probability() {
        let mut scores = vec![
            arm("up", SamplerType::News, 6.0),
            arm("fixed", SamplerType::Comic, 7.0),
        ];
        let before = {
            let bandit = Bandit::with_seed(vec![], scores.clone(), 2.0, 1);
            prob_of(&bandit, "up")
        };
        scores[0] = arm("up", SamplerType::News, 8.0);
        let after = {
            let bandit = Bandit::with_seed(vec![], scores, 2.0, 1);
            prob_of(&bandit, "up")
        };
        assert!(after > before);
    }

    #[test]
    fn test_select_never_returns_ineligible_arm() {
        let mut bandit = Bandit::with_seed(
            vec![arm("good", SamplerType::News, 7.0)],
            vec![
                arm("bad", SamplerType::Comic, 3.9),
                arm("worse", SamplerType::Paper, 1.0),
            ],
            2.0,
            42,
        );
        for _ in 0..500 {
            let selected = bandit.select_arm().unwrap();
            assert_eq!(selected.name(), "good");
        }
    }

    #[test]
    fn test_select_errors_when_all_below_floor() {
        let mut bandit = Bandit::with_seed(
            vec![arm("a", SamplerType::News, 3.0)],
            vec![arm("b", SamplerType::Comic, 2.0)],
            2.0,
            9,
        );
        let err = bandit.select_arm().unwrap_err();
        assert!(matches!(err, CuratorError::NoEligibleArms { .. }));
        assert!(bandit.probabilities().is_err());
    }

    #[test]
    fn test_select_errors_on_empty_pool() {
        let mut bandit = Bandit::with_seed(vec![], vec![], 2.0, 9);
        assert!(matches!(
            bandit.select_arm().unwrap_err(),
            CuratorError::NoEligibleArms { .. }
        ));
    }

    #[test]
    fn test_seeded_selection_is_reproducible() {
        let arms = || {
            vec![
                arm("a", SamplerType::News, 8.0),
                arm("b", SamplerType::Comic, 6.0),
                arm("c", SamplerType::Paper, 5.0),
            ]
        };
        let mut first = Bandit::with_seed(vec![], arms(), 2.0, 1234);
        let mut second = Bandit::with_seed(vec![], arms(), 2.0, 1234);
        for _ in 0..100 {
            assert_eq!(
                first.select_arm().unwrap().name(),
                second.select_arm().unwrap().name()
            );
        }
    }

    #[test]
    fn test_selection_frequency_tracks_probabilities() {
        // Weights 8^2 : 6^2 = 64 : 36, so P(a) = 0.64.
        let mut bandit = Bandit::with_seed(
            vec![],
            vec![
                arm("a", SamplerType::News, 8.0),
                arm("b", SamplerType::Comic, 6.0),
            ],
            2.0,
            99,
        );
        let draws = 20_000;
        let mut hits = 0u32;
        for _ in 0..draws {
            if bandit.select_arm().unwrap().name() == "a" {
                hits += 1;
            }
        }
        let freq = f64::from(hits) / f64::from(draws);
        assert!((freq - 0.64).abs() < 0.02, "observed {freq}");
    }

    #[test]
    fn test_candidate_pool_orders_base_before_dynamic() {
        let bandit = Bandit::with_seed(
            vec![arm("base", SamplerType::News, 6.0)],
            vec![arm("dyn", SamplerType::Comic, 6.0)],
            2.0,
            1,
        );
        let names: Vec<&str> = bandit.candidate_arms().map(Arm::name).collect();
        assert_eq!(names, vec!["base", "dyn"]);
    }

    #[test]
    fn test_pull_and_decay_is_one_pull() {
        let mut a = arm("a", SamplerType::News, 8.0);
        Bandit::pull_and_decay(&mut a);
        assert_eq!(a.pulls(), 1);
        assert!(a.score() < 8.0);
    }

    #[test]
    fn test_remove_dynamic_is_noop_for_unknown_name() {
        let mut bandit = Bandit::with_seed(
            vec![],
            vec![arm("a", SamplerType::News, 6.0)],
            2.0,
            1,
        );
        assert!(!bandit.remove_dynamic("missing"));
        assert_eq!(bandit.dynamic_arms().len(), 1);
        assert!(bandit.remove_dynamic("a"));
        assert!(bandit.dynamic_arms().is_empty());
    }
}
