//! A single selectable content-source configuration
//!
//! An arm pairs a sampler type with its parameters and carries the mutable
//! interest state: a score in [1,10] and a pull counter. Every selection
//! relaxes the score toward the neutral midpoint so a topic the user never
//! reacts to drifts back to indifference instead of dominating the feed.

use serde::{Deserialize, Serialize};

use crate::samplers::SamplerType;
use crate::types::{ArmParams, ArmSnapshot};

/// Lower bound of the interest range
pub const SCORE_MIN: f64 = 1.0;
/// Upper bound of the interest range
pub const SCORE_MAX: f64 = 10.0;
/// The score decay relaxes toward; "no signal either way"
pub const NEUTRAL_SCORE: f64 = 5.0;
/// Default per-pull decay rate
pub const DEFAULT_DECAY_RATE: f64 = 0.1;

/// A named, scorable choice of content source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arm {
    name: String,
    params: ArmParams,
    sampler_type: SamplerType,
    score: f64,
    pulls: u64,
    decay_rate: f64,
}

impl Arm {
    /// Create an arm at the neutral score with the default decay rate
    pub fn new(name: impl Into<String>, params: ArmParams, sampler_type: SamplerType) -> Self {
        Self {
            name: name.into(),
            params,
            sampler_type,
            score: NEUTRAL_SCORE,
            pulls: 0,
            decay_rate: DEFAULT_DECAY_RATE,
        }
    }

    /// Set the initial score, clamped to the interest range
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score.clamp(SCORE_MIN, SCORE_MAX);
        self
    }

    /// Set the per-pull decay rate (expected in (0,1])
    pub fn with_decay_rate(mut self, rate: f64) -> Self {
        self.decay_rate = rate;
        self
    }

    /// Arm name (unique within a bandit, immutable after creation)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sampler parameters
    pub fn params(&self) -> &ArmParams {
        &self.params
    }

    /// Which sampler this arm dispatches to
    pub fn sampler_type(&self) -> SamplerType {
        self.sampler_type
    }

    /// Current interest score
    pub fn score(&self) -> f64 {
        self.score
    }

    /// How many times this arm has been selected
    pub fn pulls(&self) -> u64 {
        self.pulls
    }

    /// Per-pull decay rate
    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    /// Register a pull: bump the counter and relax the score one step
    /// toward the neutral midpoint. Called exactly once per selection,
    /// after selection and before sampling.
    pub fn decay(&mut self) {
        self.pulls += 1;
        self.score += self.decay_rate * (NEUTRAL_SCORE - self.score);
        self.score = self.score.clamp(SCORE_MIN, SCORE_MAX);
    }

    /// Wire-shape view of this arm for the feedback boundary
    pub fn snapshot(&self) -> ArmSnapshot {
        ArmSnapshot {
            name: self.name.clone(),
            params: self.params.clone(),
            sampler_type: self.sampler_type.as_str().to_string(),
            score: self.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn arm(score: f64) -> Arm {
        Arm::new("test", HashMap::new(), SamplerType::News).with_score(score)
    }

    #[test]
    fn test_decay_counts_pulls() {
        let mut a = arm(8.0);
        assert_eq!(a.pulls(), 0);
        a.decay();
        a.decay();
        assert_eq!(a.pulls(), 2);
    }

    #[test]
    fn test_decay_moves_toward_neutral_from_above() {
        let mut a = arm(9.0);
        a.decay();
        // 9 + 0.1 * (5 - 9) = 8.6
        assert!((a.score() - 8.6).abs() < 1e-12);
    }

    #[test]
    fn test_decay_moves_toward_neutral_from_below() {
        let mut a = arm(2.0);
        a.decay();
        // 2 + 0.1 * (5 - 2) = 2.3
        assert!((a.score() - 2.3).abs() < 1e-12);
    }

    #[test]
    fn test_decay_converges_monotonically_without_overshoot() {
        let mut high = arm(10.0);
        let mut prev = high.score();
        for _ in 0..200 {
            high.decay();
            assert!(high.score() <= prev);
            assert!(high.score() >= NEUTRAL_SCORE);
            prev = high.score();
        }
        assert!((high.score() - NEUTRAL_SCORE).abs() < 1e-6);

        let mut low = arm(1.0);
        let mut prev = low.score();
        for _ in 0..200 {
            low.decay();
            assert!(low.score() >= prev);
            assert!(low.score() <= NEUTRAL_SCORE);
            prev = low.score();
        }
        assert!((low.score() - NEUTRAL_SCORE).abs() < 1e-6);
    }

    #[test]
    fn test_neutral_score_is_a_fixed_point() {
        let mut a = arm(5.0);
        a.decay();
        assert!((a.score() - NEUTRAL_SCORE).abs() < 1e-12);
    }

    #[test]
    fn test_initial_score_is_clamped() {
        assert_eq!(arm(42.0).score(), SCORE_MAX);
        assert_eq!(arm(-3.0).score(), SCORE_MIN);
    }

    #[test]
    fn test_snapshot_carries_wire_tag() {
        let a = Arm::new("xkcd", HashMap::new(), SamplerType::Comic).with_score(6.0);
        let snap = a.snapshot();
        assert_eq!(snap.name, "xkcd");
        assert_eq!(snap.sampler_type, "comic");
        assert_eq!(snap.score, 6.0);
    }
}
