//! Shared types used across modules
//!
//! Content items and the wire shapes exchanged with the external feedback
//! interpreter live here to avoid circular dependencies between the bandit
//! core, the samplers, and the feed layer.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-arm sampler parameters (arbitrary per sampler type)
pub type ArmParams = HashMap<String, serde_json::Value>;

/// A single piece of content delivered into the feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Item {
    /// A plain chat message (greetings, status notes)
    ChatMessage { sender: String, text: String },
    /// A news article from a query-driven news search
    NewsArticle {
        title: String,
        description: String,
        date: String,
        publisher: String,
        url: String,
    },
    /// A webcomic strip
    Comic {
        number: u32,
        title: String,
        alt_text: String,
        image_link: String,
        link: String,
    },
    /// A research paper
    Paper {
        title: String,
        authors: Vec<String>,
        summary: String,
        published_date: String,
        pdf_url: String,
        entry_url: String,
    },
}

impl Item {
    /// Short tag for log lines and feed rendering
    pub fn kind(&self) -> &'static str {
        match self {
            Item::ChatMessage { .. } => "chat",
            Item::NewsArticle { .. } => "news",
            Item::Comic { .. } => "comic",
            Item::Paper { .. } => "paper",
        }
    }
}

/// One arm as seen over the feedback boundary.
///
/// `sampler_type` stays a string on the wire so an unknown tag fails only
/// that entry during an update instead of the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmSnapshot {
    pub name: String,
    #[serde(default)]
    pub params: ArmParams,
    pub sampler_type: String,
    pub score: f64,
}

/// The full arm-set contract: output of `get_arms()`, input of
/// `update_arms()`. The feedback interpreter consumes it as "current
/// state" and echoes the same shape back as "desired state".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArmsConfig {
    pub arms: Vec<ArmSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_serializes_tagged() {
        let item = Item::NewsArticle {
            title: "Title".to_string(),
            description: "Desc".to_string(),
            date: "Thu, 07 Aug 2025 10:00:00 GMT".to_string(),
            publisher: "Example Press".to_string(),
            url: "https://example.com/a".to_string(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["kind"], "news_article");
        assert_eq!(json["publisher"], "Example Press");
    }

    #[test]
    fn test_arms_config_round_trips_through_json() {
        let config = ArmsConfig {
            arms: vec![ArmSnapshot {
                name: "world-news".to_string(),
                params: HashMap::from([(
                    "query".to_string(),
                    serde_json::json!("world news"),
                )]),
                sampler_type: "news".to_string(),
                score: 7.5,
            }],
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: ArmsConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_snapshot_params_default_to_empty() {
        let snap: ArmSnapshot = serde_json::from_str(
            r#"{"name": "xkcd", "sampler_type": "comic", "score": 6.0}"#,
        )
        .unwrap();
        assert!(snap.params.is_empty());
    }
}
