//! CLI interface for curator

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::Config;
use crate::feed::{FeedConfig, FeedEngine, FeedEvent};
use crate::recommender::Recommender;
use crate::types::{ArmsConfig, Item};

#[derive(Parser)]
#[command(name = "curator")]
#[command(about = "Personal content curator with a bandit-driven chat feed", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the config file (default: user config dir)
    #[arg(short, long, env = "CURATOR_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Fixed RNG seed for reproducible arm selection
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the feed loop, printing items as they arrive (default)
    Run,
    /// Sample a single item and print it as JSON
    Sample,
    /// Print the current arm snapshot as JSON
    Arms,
    /// Apply an arm update file (the feedback-interpreter contract)
    Update {
        /// Path to an ArmsConfig JSON file
        file: PathBuf,
    },
}

/// Entry point called from main
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let recommender = Arc::new(Recommender::from_config(&config, cli.seed)?);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_feed(recommender, config.feed).await,
        Commands::Sample => {
            let item = recommender.sample().await?;
            println!("{}", serde_json::to_string_pretty(&item)?);
            Ok(())
        }
        Commands::Arms => {
            let arms = recommender.get_arms().await;
            println!("{}", serde_json::to_string_pretty(&arms)?);
            Ok(())
        }
        Commands::Update { file } => {
            apply_update(&recommender, &file).await?;
            let arms = recommender.get_arms().await;
            println!("{}", serde_json::to_string_pretty(&arms)?);
            Ok(())
        }
    }
}

/// The interactive feed: items print as they arrive; slash commands on
/// stdin inspect and mutate the arm set while the loop keeps running.
async fn run_feed(recommender: Arc<Recommender>, feed_config: FeedConfig) -> Result<()> {
    let engine = FeedEngine::new(recommender.clone(), feed_config);
    let mut events = engine.start();

    println!("curator feed running (/arms, /update <file.json>, /quit)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Some(FeedEvent::Item(item)) => println!("{}", render_item(&item)),
                    Some(FeedEvent::Starved) => {
                        println!("(feed paused: every topic is below the interest floor; \
                                  apply an update to resume)");
                    }
                    None => break,
                }
            }

            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !handle_input(&recommender, line.trim()).await? {
                    break;
                }
            }

            _ = tokio::signal::ctrl_c() => break,
        }
    }

    engine.stop();
    let stats = engine.stats().await;
    println!(
        "feed stopped: {} items over {} ticks ({} failures, {} starved)",
        stats.items_delivered, stats.ticks, stats.sampler_failures, stats.starved_ticks
    );
    Ok(())
}

/// Dispatch one stdin line; returns false when the loop should exit
async fn handle_input(recommender: &Recommender, line: &str) -> Result<bool> {
    match line {
        "" => {}
        "/quit" | "/exit" => return Ok(false),
        "/arms" => {
            let arms = recommender.get_arms().await;
            println!("{}", serde_json::to_string_pretty(&arms)?);
        }
        _ if line.starts_with("/update") => {
            let path = line.trim_start_matches("/update").trim();
            if path.is_empty() {
                println!("usage: /update <file.json>");
            } else {
                match apply_update(recommender, &PathBuf::from(path)).await {
                    Ok(()) => {}
                    Err(e) => println!("update failed: {e:#}"),
                }
            }
        }
        _ => {
            // Free-text feedback goes through the external interpreter;
            // this process only speaks the update-file contract.
            println!(
                "(noted: run your feedback through the interpreter and \
                 apply it with /update <file.json>)"
            );
        }
    }
    Ok(true)
}

/// Read an ArmsConfig JSON file and apply it as a full dynamic replace
async fn apply_update(recommender: &Recommender, file: &std::path::Path) -> Result<()> {
    let contents = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read update file {}", file.display()))?;
    let update: ArmsConfig = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse update file {}", file.display()))?;

    let summary = recommender.update_arms(update).await;
    println!(
        "update applied: {} arms ({} base-name entries skipped, {} unknown tags, {} duplicates)",
        summary.applied, summary.skipped_base, summary.skipped_unknown, summary.skipped_duplicate
    );
    Ok(())
}

/// One-line rendering for the terminal feed
fn render_item(item: &Item) -> String {
    match item {
        Item::ChatMessage { sender, text } => format!("[{sender}] {text}"),
        Item::NewsArticle {
            title,
            publisher,
            date,
            url,
            ..
        } => format!("[news] {title} - {publisher} ({date})\n       {url}"),
        Item::Comic {
            number,
            title,
            alt_text,
            link,
            ..
        } => format!("[comic] #{number} {title} - {alt_text}\n        {link}"),
        Item::Paper {
            title,
            authors,
            published_date,
            entry_url,
            ..
        } => format!(
            "[paper] {title} - {} ({published_date})\n        {entry_url}",
            authors.join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_item_news() {
        let item = Item::NewsArticle {
            title: "Headline".to_string(),
            description: "Body".to_string(),
            date: "today".to_string(),
            publisher: "Wire".to_string(),
            url: "https://example.com".to_string(),
        };
        let line = render_item(&item);
        assert!(line.starts_with("[news] Headline"));
        assert!(line.contains("Wire"));
    }

    #[test]
    fn test_render_item_paper_joins_authors() {
        let item = Item::Paper {
            title: "T".to_string(),
            authors: vec!["A".to_string(), "B".to_string()],
            summary: String::new(),
            published_date: "2025".to_string(),
            pdf_url: String::new(),
            entry_url: "https://arxiv.org/abs/1".to_string(),
        };
        assert!(render_item(&item).contains("A, B"));
    }
}
