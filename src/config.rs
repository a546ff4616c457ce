//! Configuration management
//!
//! Manages curator configuration: bandit tuning, feed cadence, HTTP
//! settings for the samplers, and the seed arms that become the
//! protected base set.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::feed::FeedConfig;
use crate::types::ArmSnapshot;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Bandit tuning
    #[serde(default)]
    pub bandit: BanditConfig,
    /// Feed cadence and greeting
    #[serde(default)]
    pub feed: FeedConfig,
    /// HTTP settings shared by the samplers
    #[serde(default)]
    pub http: HttpConfig,
    /// Seed arms, installed as the permanent base set
    #[serde(default = "default_seed_arms")]
    pub arms: Vec<ArmSnapshot>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bandit: BanditConfig::default(),
            feed: FeedConfig::default(),
            http: HttpConfig::default(),
            arms: default_seed_arms(),
        }
    }
}

/// Bandit tuning knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BanditConfig {
    /// Exponent applied to scores when weighting selection
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Per-pull decay rate toward the neutral score
    #[serde(default = "default_decay_rate")]
    pub decay_rate: f64,
}

fn default_alpha() -> f64 {
    crate::bandit::DEFAULT_ALPHA
}

fn default_decay_rate() -> f64 {
    crate::bandit::DEFAULT_DECAY_RATE
}

impl Default for BanditConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            decay_rate: default_decay_rate(),
        }
    }
}

/// HTTP settings shared by all samplers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
    /// User-Agent header for content-source requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_http_timeout_secs() -> u64 {
    20
}

fn default_user_agent() -> String {
    format!("curator/{} ({})", env!("CARGO_PKG_VERSION"), std::env::consts::OS)
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_http_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Topics every fresh install starts with. They live in the base set, so
/// feedback updates can re-score the subjects they cover only by adding
/// dynamic arms alongside them.
fn default_seed_arms() -> Vec<ArmSnapshot> {
    vec![
        ArmSnapshot {
            name: "world-news".to_string(),
            params: HashMap::from([("query".to_string(), serde_json::json!("world news"))]),
            sampler_type: "news".to_string(),
            score: 6.0,
        },
        ArmSnapshot {
            name: "xkcd".to_string(),
            params: HashMap::new(),
            sampler_type: "comic".to_string(),
            score: 6.0,
        },
        ArmSnapshot {
            name: "arxiv-ai".to_string(),
            params: HashMap::from([("category".to_string(), serde_json::json!("cs.AI"))]),
            sampler_type: "paper".to_string(),
            score: 5.0,
        },
    ]
}

impl Config {
    /// Load configuration: an explicit path, else the user config file,
    /// else defaults. A missing file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            debug!(path = %path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Default config file location under the user config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("curator").join("config.toml"))
    }
}
