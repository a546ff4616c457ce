//! Comic sampler backed by the xkcd JSON API
//!
//! Params:
//! - `number` (integer, optional): pin a specific comic; otherwise one is
//!   drawn uniformly from the archive

use anyhow::{Context, Result};
use rand::Rng;
use serde::Deserialize;
use tracing::debug;

use crate::config::HttpConfig;
use crate::types::{ArmParams, Item};
use super::{http_client, param_u64, Sampler};

const XKCD_BASE: &str = "https://xkcd.com";

/// Comic metadata as served by `info.0.json`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct XkcdInfo {
    pub num: u32,
    pub title: String,
    #[serde(default)]
    pub safe_title: String,
    pub alt: String,
    pub img: String,
}

impl XkcdInfo {
    fn display_title(&self) -> &str {
        if self.safe_title.is_empty() {
            &self.title
        } else {
            &self.safe_title
        }
    }
}

pub struct ComicSampler {
    client: reqwest::Client,
}

impl ComicSampler {
    pub fn new(http: &HttpConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(http)?,
        })
    }

    async fn fetch_info(&self, number: Option<u32>) -> Result<XkcdInfo> {
        let url = match number {
            Some(n) => format!("{XKCD_BASE}/{n}/info.0.json"),
            None => format!("{XKCD_BASE}/info.0.json"),
        };
        self.client
            .get(&url)
            .send()
            .await
            .context("comic request failed")?
            .error_for_status()
            .context("comic API returned an error status")?
            .json::<XkcdInfo>()
            .await
            .context("comic metadata unreadable")
    }
}

#[async_trait::async_trait]
impl Sampler for ComicSampler {
    fn name(&self) -> &'static str {
        "comic"
    }

    async fn sample(&self, params: &ArmParams) -> Result<Item> {
        let number = match param_u64(params, "number") {
            Some(n) => u32::try_from(n).context("comic number out of range")?,
            None => {
                let latest = self.fetch_info(None).await?.num;
                let mut pick = rand::rng().random_range(1..=latest);
                // Comic 404 does not exist.
                if pick == 404 {
                    pick = 405;
                }
                pick
            }
        };
        debug!(number, "fetching comic");

        let info = self.fetch_info(Some(number)).await?;
        Ok(comic_item(&info))
    }
}

/// Map comic metadata onto the feed item shape
pub(crate) fn comic_item(info: &XkcdInfo) -> Item {
    Item::Comic {
        number: info.num,
        title: info.display_title().to_string(),
        alt_text: info.alt.clone(),
        image_link: info.img.clone(),
        link: format!("{XKCD_BASE}/{}/", info.num),
    }
}
