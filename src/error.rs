//! Error taxonomy for the curator core
//!
//! The core distinguishes state-level failures (no eligible arms) from
//! transient ones (a content source erroring or timing out) so callers can
//! react differently: the former needs an external re-balancing update,
//! the latter just means an empty feed cycle.

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T, E = CuratorError> = std::result::Result<T, E>;

/// Errors surfaced by the recommender core
#[derive(Debug, Error)]
pub enum CuratorError {
    /// Every candidate arm scored below the eligibility floor.
    /// Not retriable without an external arm update.
    #[error("no eligible arms: every score is below the eligibility floor of {floor}")]
    NoEligibleArms { floor: f64 },

    /// The chosen content source errored, timed out, or came back empty.
    /// Transient; the decay applied before dispatch still counts as a pull.
    #[error("sampler '{sampler}' failed for arm '{arm}': {reason}")]
    SamplerFailure {
        arm: String,
        sampler: &'static str,
        reason: String,
    },

    /// An arm references a sampler tag the registry does not know.
    #[error("unknown sampler type '{0}'")]
    UnknownSamplerType(String),

    /// Configuration could not be loaded or is invalid
    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CuratorError {
    /// Whether retrying later (without changing arm state) can help
    pub fn is_transient(&self) -> bool {
        matches!(self, CuratorError::SamplerFailure { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let starved = CuratorError::NoEligibleArms { floor: 4.0 };
        assert!(!starved.is_transient());

        let failed = CuratorError::SamplerFailure {
            arm: "world-news".to_string(),
            sampler: "news",
            reason: "connection reset".to_string(),
        };
        assert!(failed.is_transient());
    }

    #[test]
    fn test_display_names_the_arm() {
        let err = CuratorError::SamplerFailure {
            arm: "xkcd".to_string(),
            sampler: "comic",
            reason: "timed out".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("xkcd"));
        assert!(msg.contains("comic"));
    }
}
