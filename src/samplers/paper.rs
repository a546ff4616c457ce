//! Paper sampler backed by the arXiv Atom API
//!
//! Params:
//! - `query` (string): full-text search terms
//! - `category` (string, optional): an arXiv category (e.g. "cs.AI");
//!   takes precedence over `query`
//! - `max_results` (integer, optional): size of the page a paper is
//!   drawn from (default 10)

use anyhow::{bail, Context, Result};
use rand::Rng;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use crate::config::HttpConfig;
use crate::types::{ArmParams, Item};
use super::{collapse_ws, http_client, link_href, param_str, param_u64, tag_text, tag_texts, Sampler};

const ARXIV_API_BASE: &str = "https://export.arxiv.org/api/query";
const DEFAULT_QUERY: &str = "machine learning";
const DEFAULT_PAGE_SIZE: u64 = 10;

/// One parsed `<entry>` from the Atom feed
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PaperEntry {
    pub title: String,
    pub authors: Vec<String>,
    pub summary: String,
    pub published: String,
    pub pdf_url: String,
    pub entry_url: String,
}

pub struct PaperSampler {
    client: reqwest::Client,
}

impl PaperSampler {
    pub fn new(http: &HttpConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(http)?,
        })
    }

    fn query_url(params: &ArmParams) -> String {
        let search = match param_str(params, "category") {
            Some(cat) => format!("cat:{cat}"),
            None => {
                let query =
                    param_str(params, "query").unwrap_or_else(|| DEFAULT_QUERY.to_string());
                format!("all:{query}")
            }
        };
        let page = param_u64(params, "max_results").unwrap_or(DEFAULT_PAGE_SIZE);
        format!(
            "{ARXIV_API_BASE}?search_query={}&start=0&max_results={page}\
             &sortBy=submittedDate&sortOrder=descending",
            urlencoding::encode(&search)
        )
    }
}

#[async_trait::async_trait]
impl Sampler for PaperSampler {
    fn name(&self) -> &'static str {
        "paper"
    }

    async fn sample(&self, params: &ArmParams) -> Result<Item> {
        let url = Self::query_url(params);
        debug!(%url, "fetching paper feed");

        let body = self
            .client
            .get(&url)
            .send()
            .await
            .context("paper feed request failed")?
            .error_for_status()
            .context("paper feed returned an error status")?
            .text()
            .await
            .context("paper feed body unreadable")?;

        let mut entries = parse_arxiv_atom(&body);
        if entries.is_empty() {
            bail!("no papers found");
        }
        let pick = rand::rng().random_range(0..entries.len());
        let entry = entries.swap_remove(pick);

        Ok(Item::Paper {
            title: entry.title,
            authors: entry.authors,
            summary: entry.summary,
            published_date: entry.published,
            pdf_url: entry.pdf_url,
            entry_url: entry.entry_url,
        })
    }
}

/// Pull the `<entry>` records out of an arXiv Atom feed, in feed order
pub(crate) fn parse_arxiv_atom(body: &str) -> Vec<PaperEntry> {
    static ENTRY_RE: OnceLock<Regex> = OnceLock::new();
    let entry_re =
        ENTRY_RE.get_or_init(|| Regex::new(r"(?s)<entry>(.*?)</entry>").expect("static regex"));

    entry_re
        .captures_iter(body)
        .filter_map(|c| c.get(1))
        .filter_map(|m| {
            let block = m.as_str();
            let title = collapse_ws(&tag_text(block, "title")?);
            let entry_url = tag_text(block, "id")?;
            Some(PaperEntry {
                title,
                authors: tag_texts(block, "name"),
                summary: collapse_ws(&tag_text(block, "summary").unwrap_or_default()),
                published: tag_text(block, "published").unwrap_or_default(),
                pdf_url: link_href(block, r#"title="pdf""#).unwrap_or_default(),
                entry_url,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query: search_query=all:bandits</title>
  <entry>
    <id>http://arxiv.org/abs/2508.00001v1</id>
    <updated>2025-08-06T17:59:59Z</updated>
    <published>2025-08-06T17:59:59Z</published>
    <title>Contextual Bandits with
  Wrapped Titles</title>
    <summary>  We study bandit feedback
  across long lines.
</summary>
    <author><name>Ada Lovelace</name></author>
    <author><name>Grace Hopper</name></author>
    <link href="http://arxiv.org/abs/2508.00001v1" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/2508.00001v1" rel="related" type="application/pdf"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2508.00002v1</id>
    <published>2025-08-05T10:00:00Z</published>
    <title>Second Paper</title>
    <summary>Another abstract.</summary>
    <author><name>Solo Author</name></author>
    <link title="pdf" href="http://arxiv.org/pdf/2508.00002v1" rel="related"/>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_entries_in_order() {
        let entries = parse_arxiv_atom(FEED);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].entry_url, "http://arxiv.org/abs/2508.00001v1");
        assert_eq!(entries[1].title, "Second Paper");
    }

    #[test]
    fn test_wrapped_title_and_summary_are_collapsed() {
        let entries = parse_arxiv_atom(FEED);
        assert_eq!(entries[0].title, "Contextual Bandits with Wrapped Titles");
        assert_eq!(entries[0].summary, "We study bandit feedback across long lines.");
    }

    #[test]
    fn test_authors_and_pdf_link() {
        let entries = parse_arxiv_atom(FEED);
        assert_eq!(entries[0].authors, vec!["Ada Lovelace", "Grace Hopper"]);
        assert_eq!(entries[0].pdf_url, "http://arxiv.org/pdf/2508.00001v1");
    }

    #[test]
    fn test_empty_feed_yields_no_entries() {
        let body = r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>empty</title></feed>"#;
        assert!(parse_arxiv_atom(body).is_empty());
    }

    #[test]
    fn test_query_url_prefers_category() {
        let params: ArmParams = std::collections::HashMap::from([
            ("category".to_string(), serde_json::json!("cs.AI")),
            ("query".to_string(), serde_json::json!("ignored")),
        ]);
        let url = PaperSampler::query_url(&params);
        assert!(url.contains("search_query=cat%3Acs.AI"));
    }

    #[test]
    fn test_query_url_defaults() {
        let url = PaperSampler::query_url(&ArmParams::new());
        assert!(url.contains("all%3Amachine%20learning"));
        assert!(url.contains("max_results=10"));
    }
}
