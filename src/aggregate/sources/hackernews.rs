// src/aggregate/sources/hackernews.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use serde::Deserialize;

use crate::aggregate::types::{NewsSource, RawItem};

const TOP_STORIES_URL: &str = "https://hacker-news.firebaseio.com/v0/topstories.json";
const ITEM_URL: &str = "https://hacker-news.firebaseio.com/v0/item";

/// The top-stories endpoint returns ~500 ids; point-querying all of them is
/// pointless for a front page.
const MAX_STORIES: usize = 100;

const MAX_ITEM_AGE_HOURS: i64 = 48;

#[derive(Debug, Deserialize)]
struct HnItem {
    id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    time: i64,
    #[serde(default)]
    descendants: i64,
}

/// Point-query aggregator over the Hacker News API: pulls the top-stories id
/// list, fetches each item, and keeps the ones matching the keyword filter.
pub struct HackerNewsSource {
    keywords: Vec<String>,
    client: reqwest::Client,
}

impl HackerNewsSource {
    pub fn new(keywords: Vec<String>) -> Self {
        Self {
            keywords,
            client: reqwest::Client::new(),
        }
    }

    fn matches_keywords(&self, title: &str) -> bool {
        let title = title.to_lowercase();
        self.keywords
            .iter()
            .any(|keyword| title.contains(&keyword.to_lowercase()))
    }

    fn to_raw_item(item: HnItem) -> RawItem {
        // Ask-HN style posts have no external link; point at the discussion.
        let url = match item.url {
            Some(u) if !u.is_empty() => u,
            _ => format!("https://news.ycombinator.com/item?id={}", item.id),
        };

        let published_at = if item.time > 0 {
            Utc.timestamp_opt(item.time, 0)
                .single()
                .unwrap_or_else(Utc::now)
        } else {
            Utc::now()
        };

        RawItem {
            title: html_escape::decode_html_entities(&item.title).to_string(),
            url,
            description: format!(
                "HN score: {} | comments: {}",
                item.score, item.descendants
            ),
            published_at,
            source_name: "Hacker News".to_string(),
            image_url: None,
            score: 0.0,
        }
    }

    async fn fetch_item(&self, id: u64) -> Result<HnItem> {
        let url = format!("{ITEM_URL}/{id}.json");
        self.client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("fetching hn item {id}"))?
            .json::<HnItem>()
            .await
            .with_context(|| format!("decoding hn item {id}"))
    }
}

#[async_trait]
impl NewsSource for HackerNewsSource {
    async fn fetch_news(&self) -> Result<Vec<RawItem>> {
        let ids: Vec<u64> = self
            .client
            .get(TOP_STORIES_URL)
            .send()
            .await
            .context("fetching hn top stories")?
            .json()
            .await
            .context("decoding hn story ids")?;

        let now = Utc::now();
        let mut items = Vec::new();
        for id in ids.into_iter().take(MAX_STORIES) {
            // One bad story must not sink the whole source.
            let item = match self.fetch_item(id).await {
                Ok(it) => it,
                Err(e) => {
                    tracing::debug!(error = ?e, id, "skipping hn item");
                    continue;
                }
            };

            if !self.matches_keywords(&item.title) {
                continue;
            }

            let raw = Self::to_raw_item(item);
            if now - raw.published_at > Duration::hours(MAX_ITEM_AGE_HOURS) {
                continue;
            }
            items.push(raw);
        }

        Ok(items)
    }

    fn name(&self) -> &str {
        "Hacker News"
    }
}
