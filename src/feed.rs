//! Periodic feed engine
//!
//! Drives the recommender from a recurring timer and delivers whatever it
//! produces over a channel, the way the surrounding chat application
//! expects to consume it. Updates keep arriving on the recommender
//! concurrently; the engine never holds its locks across a fetch.
//!
//! A failed fetch is an empty cycle, not a crash. Arm starvation (every
//! score under the eligibility floor) is delivered as its own event so
//! the consumer knows the feed is waiting on a re-balancing update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, RwLock};
use tracing::{debug, info, warn};

use crate::error::CuratorError;
use crate::recommender::Recommender;
use crate::types::Item;

/// Feed engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Seconds between selection ticks
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Ceiling on a single sampler call, enforced by the recommender
    #[serde(default = "default_sampler_timeout_secs")]
    pub sampler_timeout_secs: u64,
    /// Message delivered once when the feed starts; None disables it
    #[serde(default = "default_greeting")]
    pub greeting: Option<String>,
}

fn default_interval_secs() -> u64 {
    10
}

fn default_sampler_timeout_secs() -> u64 {
    30
}

fn default_greeting() -> Option<String> {
    Some(
        "Hello! I'm your content curator. I'll drop in news, comics, and papers \
         I think you'll like. Tell me what to see more or less of!"
            .to_string(),
    )
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            sampler_timeout_secs: default_sampler_timeout_secs(),
            greeting: default_greeting(),
        }
    }
}

/// What the feed delivers to its consumer
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// A freshly sampled content item
    Item(Item),
    /// Every arm is below the eligibility floor; nothing can surface
    /// until an update raises a score
    Starved,
}

/// Counters describing what the feed has done so far
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeedStats {
    pub ticks: u64,
    pub items_delivered: u64,
    pub sampler_failures: u64,
    pub starved_ticks: u64,
    pub started_at: Option<DateTime<Utc>>,
    pub last_item_at: Option<DateTime<Utc>>,
}

/// The periodic sampling loop
pub struct FeedEngine {
    recommender: Arc<Recommender>,
    config: FeedConfig,
    stats: Arc<RwLock<FeedStats>>,
    shutdown_tx: broadcast::Sender<()>,
}

impl FeedEngine {
    pub fn new(recommender: Arc<Recommender>, config: FeedConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            recommender,
            config,
            stats: Arc::new(RwLock::new(FeedStats::default())),
            shutdown_tx,
        }
    }

    /// Current counters
    pub async fn stats(&self) -> FeedStats {
        self.stats.read().await.clone()
    }

    /// Signal the feed loop to exit
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Spawn the feed loop and return the event stream. The loop exits
    /// when `stop()` is called or the receiver is dropped.
    pub fn start(&self) -> mpsc::Receiver<FeedEvent> {
        let (tx, rx) = mpsc::channel(32);
        let recommender = self.recommender.clone();
        let stats = self.stats.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let greeting = self.config.greeting.clone();
        let interval_secs = self.config.interval_secs.max(1);

        tokio::spawn(async move {
            {
                let mut s = stats.write().await;
                s.started_at = Some(Utc::now());
            }

            if let Some(text) = greeting {
                let hello = Item::ChatMessage {
                    sender: "curator".to_string(),
                    text,
                };
                if tx.send(FeedEvent::Item(hello)).await.is_err() {
                    return;
                }
            }

            let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
            info!(interval_secs, "feed loop started");

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("feed received shutdown signal");
                        break;
                    }

                    _ = interval.tick() => {
                        {
                            let mut s = stats.write().await;
                            s.ticks += 1;
                        }

                        match recommender.sample().await {
                            Ok(item) => {
                                debug!(kind = item.kind(), "feed item ready");
                                {
                                    let mut s = stats.write().await;
                                    s.items_delivered += 1;
                                    s.last_item_at = Some(Utc::now());
                                }
                                if tx.send(FeedEvent::Item(item)).await.is_err() {
                                    break;
                                }
                            }
                            Err(CuratorError::NoEligibleArms { floor }) => {
                                warn!(floor, "feed starved: no eligible arms");
                                {
                                    let mut s = stats.write().await;
                                    s.starved_ticks += 1;
                                }
                                if tx.send(FeedEvent::Starved).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                warn!(error = %e, "sample failed; skipping this cycle");
                                let mut s = stats.write().await;
                                s.sampler_failures += 1;
                            }
                        }
                    }
                }
            }

            info!("feed loop exited");
        });

        rx
    }
}
