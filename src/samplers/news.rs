//! News sampler backed by the Google News RSS search feed
//!
//! Params:
//! - `query` (string): search terms; defaults to "world news"

use anyhow::{bail, Context, Result};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use crate::config::HttpConfig;
use crate::types::{ArmParams, Item};
use super::{collapse_ws, http_client, param_str, strip_tags, tag_text, Sampler};

const NEWS_RSS_BASE: &str = "https://news.google.com/rss/search";
const DEFAULT_QUERY: &str = "world news";

/// One parsed `<item>` from the feed
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NewsEntry {
    pub title: String,
    pub link: String,
    pub pub_date: String,
    pub description: String,
    pub source: String,
}

pub struct NewsSampler {
    client: reqwest::Client,
}

impl NewsSampler {
    pub fn new(http: &HttpConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(http)?,
        })
    }

    fn feed_url(query: &str) -> String {
        format!(
            "{NEWS_RSS_BASE}?q={}&hl=en-US&gl=US&ceid=US:en",
            urlencoding::encode(query)
        )
    }
}

#[async_trait::async_trait]
impl Sampler for NewsSampler {
    fn name(&self) -> &'static str {
        "news"
    }

    async fn sample(&self, params: &ArmParams) -> Result<Item> {
        let query = param_str(params, "query").unwrap_or_else(|| DEFAULT_QUERY.to_string());
        let url = Self::feed_url(&query);
        debug!(%query, "fetching news feed");

        let body = self
            .client
            .get(&url)
            .send()
            .await
            .context("news feed request failed")?
            .error_for_status()
            .context("news feed returned an error status")?
            .text()
            .await
            .context("news feed body unreadable")?;

        let Some(entry) = parse_news_rss(&body).into_iter().next() else {
            bail!("no news articles found for query '{query}'");
        };

        Ok(Item::NewsArticle {
            title: entry.title,
            description: entry.description,
            date: entry.pub_date,
            publisher: entry.source,
            url: entry.link,
        })
    }
}

/// Pull the `<item>` entries out of an RSS search feed, in feed order
pub(crate) fn parse_news_rss(body: &str) -> Vec<NewsEntry> {
    static ITEM_RE: OnceLock<Regex> = OnceLock::new();
    let item_re =
        ITEM_RE.get_or_init(|| Regex::new(r"(?s)<item>(.*?)</item>").expect("static regex"));

    item_re
        .captures_iter(body)
        .filter_map(|c| c.get(1))
        .filter_map(|m| {
            let block = m.as_str();
            let title = tag_text(block, "title")?;
            let link = tag_text(block, "link")?;
            Some(NewsEntry {
                title,
                link,
                pub_date: tag_text(block, "pubDate").unwrap_or_default(),
                // Descriptions arrive as escaped HTML link lists
                description: collapse_ws(&strip_tags(
                    &tag_text(block, "description").unwrap_or_default(),
                )),
                source: tag_text(block, "source").unwrap_or_default(),
            })
        })
        .collect()
}
