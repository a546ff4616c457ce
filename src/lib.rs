//! Curator - Personal Content Curator Library
//!
//! A bandit-driven feed curator with:
//! - Weighted-random arm selection with score decay toward neutral
//! - Protected base arms plus a feedback-replaceable dynamic set
//! - Pluggable content samplers (news, comics, papers)
//! - A periodic feed engine safe to run alongside concurrent updates
//!
//! # Example
//!
//! ```ignore
//! use curator::config::Config;
//! use curator::recommender::Recommender;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load(None)?;
//!     let recommender = Recommender::from_config(&config, None)?;
//!     let item = recommender.sample().await?;
//!     println!("{}", serde_json::to_string_pretty(&item)?);
//!     Ok(())
//! }
//! ```

// Core modules (order matters for cross-module dependencies)
pub mod error;
pub mod types;
pub mod config;  // Must come before samplers since samplers depend on HttpConfig
pub mod bandit;
pub mod samplers;
pub mod recommender;
pub mod feed;
pub mod cli;

// Re-export commonly used types for convenience
pub use bandit::{Arm, Bandit, DEFAULT_ALPHA, DEFAULT_DECAY_RATE, ELIGIBILITY_FLOOR};
pub use config::Config;
pub use error::{CuratorError, Result};
pub use feed::{FeedConfig, FeedEngine, FeedEvent, FeedStats};
pub use recommender::{Recommender, UpdateSummary};
pub use samplers::{Sampler, SamplerType};
pub use types::{ArmParams, ArmSnapshot, ArmsConfig, Item};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get the library info
pub fn info() -> String {
    format!("{} v{} - Personal Content Curator Library", NAME, VERSION)
}
