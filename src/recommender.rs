//! Recommender: bandit selection wired to the sampler registry
//!
//! One instance owns the bandit behind an RwLock and a fixed map from
//! sampler tag to sampler instance. Selection + decay happen under a
//! short write lock; the content fetch itself runs outside the lock so a
//! slow source never blocks concurrent updates or the next scheduled
//! selection. Every sampler call is wrapped in a timeout.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::bandit::{Arm, Bandit, DEFAULT_DECAY_RATE};
use crate::config::Config;
use crate::error::{CuratorError, Result};
use crate::samplers::{build_registry, Sampler, SamplerType};
use crate::types::{ArmsConfig, Item};

/// Default ceiling on a single sampler call
const DEFAULT_SAMPLER_TIMEOUT: Duration = Duration::from_secs(30);

/// What an update application did, for logs and CLI display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpdateSummary {
    /// Entries that became dynamic arms
    pub applied: usize,
    /// Entries skipped because they named a protected base arm
    pub skipped_base: usize,
    /// Entries skipped because their sampler tag is unknown
    pub skipped_unknown: usize,
    /// Entries skipped because an earlier entry already used the name
    pub skipped_duplicate: usize,
}

/// Bandit + sampler registry behind one concurrency discipline
pub struct Recommender {
    bandit: RwLock<Bandit>,
    samplers: HashMap<SamplerType, Arc<dyn Sampler>>,
    sampler_timeout: Duration,
    default_decay_rate: f64,
}

impl Recommender {
    /// Create a recommender over a prepared bandit and sampler registry
    pub fn new(bandit: Bandit, samplers: HashMap<SamplerType, Arc<dyn Sampler>>) -> Self {
        Self {
            bandit: RwLock::new(bandit),
            samplers,
            sampler_timeout: DEFAULT_SAMPLER_TIMEOUT,
            default_decay_rate: DEFAULT_DECAY_RATE,
        }
    }

    /// Set the per-call sampler timeout
    pub fn with_sampler_timeout(mut self, timeout: Duration) -> Self {
        self.sampler_timeout = timeout;
        self
    }

    /// Set the decay rate given to arms built by `update_arms`
    pub fn with_default_decay_rate(mut self, rate: f64) -> Self {
        self.default_decay_rate = rate;
        self
    }

    /// Assemble a recommender from configuration: the default sampler
    /// registry plus the configured seed arms as the protected base set
    pub fn from_config(config: &Config, seed: Option<u64>) -> Result<Self> {
        let samplers = build_registry(&config.http)
            .map_err(|e| CuratorError::Config(format!("sampler registry: {e}")))?;

        let mut base_arms = Vec::new();
        for entry in &config.arms {
            let Some(tag) = SamplerType::parse(&entry.sampler_type) else {
                warn!(
                    arm = %entry.name,
                    tag = %entry.sampler_type,
                    "skipping seed arm with unknown sampler type"
                );
                continue;
            };
            base_arms.push(
                Arm::new(entry.name.clone(), entry.params.clone(), tag)
                    .with_score(entry.score)
                    .with_decay_rate(config.bandit.decay_rate),
            );
        }

        let bandit = match seed {
            Some(seed) => Bandit::with_seed(base_arms, Vec::new(), config.bandit.alpha, seed),
            None => Bandit::new(base_arms, Vec::new(), config.bandit.alpha),
        };

        Ok(Self::new(bandit, samplers)
            .with_sampler_timeout(Duration::from_secs(config.feed.sampler_timeout_secs))
            .with_default_decay_rate(config.bandit.decay_rate))
    }

    /// Select an arm, decay it, and fetch one content item from its
    /// sampler.
    ///
    /// The decay is applied before dispatch on purpose: a failed fetch
    /// still counts as a pull. Failures are surfaced, never retried with
    /// a different arm.
    pub async fn sample(&self) -> Result<Item> {
        let (name, params, tag) = {
            let mut bandit = self.bandit.write().await;
            let arm = bandit.select_arm()?;
            Bandit::pull_and_decay(arm);
            (arm.name().to_string(), arm.params().clone(), arm.sampler_type())
        };

        let sampler = self
            .samplers
            .get(&tag)
            .ok_or_else(|| CuratorError::UnknownSamplerType(tag.as_str().to_string()))?;

        debug!(arm = %name, sampler = %tag, "sampling content");
        match timeout(self.sampler_timeout, sampler.sample(&params)).await {
            Ok(Ok(item)) => {
                debug!(arm = %name, kind = item.kind(), "content sampled");
                Ok(item)
            }
            Ok(Err(e)) => Err(CuratorError::SamplerFailure {
                arm: name,
                sampler: sampler.name(),
                reason: format!("{e:#}"),
            }),
            Err(_) => Err(CuratorError::SamplerFailure {
                arm: name,
                sampler: sampler.name(),
                reason: format!("timed out after {:?}", self.sampler_timeout),
            }),
        }
    }

    /// Snapshot of every arm in the combined pool, in candidate order.
    /// This is the "current state" input of the feedback interpreter.
    pub async fn get_arms(&self) -> ArmsConfig {
        let bandit = self.bandit.read().await;
        ArmsConfig {
            arms: bandit.candidate_arms().map(Arm::snapshot).collect(),
        }
    }

    /// Add one arm to the dynamic collection. An arm whose name collides
    /// with a base arm is rejected; a dynamic arm of the same name is
    /// replaced. Returns whether the arm was admitted.
    pub async fn add_arm(&self, arm: Arm) -> bool {
        let mut bandit = self.bandit.write().await;
        if bandit.is_base(arm.name()) {
            warn!(arm = %arm.name(), "refusing to shadow a base arm");
            return false;
        }
        if bandit.remove_dynamic(arm.name()) {
            debug!(arm = %arm.name(), "replacing existing dynamic arm");
        }
        bandit.push_dynamic(arm);
        true
    }

    /// Remove a dynamic arm by name. A no-op (returning false) when no
    /// dynamic arm has that name; base arms are never removed.
    pub async fn remove_arm(&self, name: &str) -> bool {
        let mut bandit = self.bandit.write().await;
        if bandit.is_base(name) {
            warn!(arm = %name, "base arms cannot be removed");
            return false;
        }
        bandit.remove_dynamic(name)
    }

    /// Replace the entire dynamic arm collection with arms built from
    /// `config`. A full replace, not a merge.
    ///
    /// Per entry: a name colliding with a base arm is skipped (base arms
    /// are immutable via this path), an unknown sampler tag is skipped,
    /// and scores are clamped to the interest range. Each admitted arm
    /// starts fresh: zero pulls, the default decay rate.
    pub async fn update_arms(&self, config: ArmsConfig) -> UpdateSummary {
        let mut summary = UpdateSummary::default();
        let mut bandit = self.bandit.write().await;

        let mut fresh: Vec<Arm> = Vec::with_capacity(config.arms.len());
        for entry in config.arms {
            if bandit.is_base(&entry.name) {
                warn!(arm = %entry.name, "update names a base arm; skipping entry");
                summary.skipped_base += 1;
                continue;
            }
            if fresh.iter().any(|a| a.name() == entry.name) {
                warn!(arm = %entry.name, "duplicate name in update; skipping entry");
                summary.skipped_duplicate += 1;
                continue;
            }
            let Some(tag) = SamplerType::parse(&entry.sampler_type) else {
                warn!(
                    arm = %entry.name,
                    tag = %entry.sampler_type,
                    "unknown sampler type in update; skipping entry"
                );
                summary.skipped_unknown += 1;
                continue;
            };
            fresh.push(
                Arm::new(entry.name, entry.params, tag)
                    .with_score(entry.score)
                    .with_decay_rate(self.default_decay_rate),
            );
            summary.applied += 1;
        }

        bandit.replace_dynamic(fresh);
        info!(
            applied = summary.applied,
            skipped = summary.skipped_base + summary.skipped_unknown + summary.skipped_duplicate,
            "dynamic arm set replaced"
        );
        summary
    }
}
