//! Multi-armed bandit selection/decay engine
//!
//! This module provides the two halves of the engine:
//! - `Arm`: a scorable content-source configuration with decay-on-pull
//! - `Bandit`: weighted-random selection over the arm population

pub mod arm;
pub mod bandit;

pub use arm::{Arm, DEFAULT_DECAY_RATE, NEUTRAL_SCORE, SCORE_MAX, SCORE_MIN};
pub use bandit::{Bandit, DEFAULT_ALPHA, ELIGIBILITY_FLOOR};
