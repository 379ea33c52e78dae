// src/aggregate/sources/rss.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use metrics::{counter, histogram};
use once_cell::sync::OnceCell;
use quick_xml::de::from_str;
use regex::Regex;
use serde::Deserialize;
use time::{format_description::well_known::Rfc2822, OffsetDateTime, UtcOffset};

use crate::aggregate::types::{NewsSource, RawItem};

/// Entries older than this are dropped at the adapter; downstream only uses
/// age as a scoring input.
const MAX_ITEM_AGE_HOURS: i64 = 48;

const FETCH_ATTEMPTS: u32 = 3;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
    #[serde(rename = "enclosure", default)]
    enclosure: Vec<Enclosure>,
}

#[derive(Debug, Deserialize)]
struct Enclosure {
    #[serde(rename = "@url")]
    url: Option<String>,
    #[serde(rename = "@type")]
    mime_type: Option<String>,
}

fn parse_rfc2822(ts: &str) -> Option<DateTime<Utc>> {
    OffsetDateTime::parse(ts, &Rfc2822)
        .ok()
        .map(|dt| dt.to_offset(UtcOffset::UTC).unix_timestamp())
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
}

/// Strip markup from feed descriptions so keyword matching sees plain text.
fn clean_description(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
    out = re_tags.replace_all(&out, "").to_string();

    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"));
    out = re_ws.replace_all(&out, " ").to_string();

    out.trim().to_string()
}

/// One RSS feed source. HTTP mode fetches with retries; fixture mode parses
/// a given XML string (tests, offline runs).
pub struct RssSource {
    name: String,
    mode: Mode,
}

enum Mode {
    Http {
        url: String,
        client: reqwest::Client,
    },
    Fixture(String),
}

impl RssSource {
    pub fn from_url(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: Mode::Http {
                url: url.into(),
                client: reqwest::Client::new(),
            },
        }
    }

    pub fn from_fixture_str(name: impl Into<String>, xml: &str) -> Self {
        Self {
            name: name.into(),
            mode: Mode::Fixture(xml.to_string()),
        }
    }

    fn parse_items(&self, xml: &str, now: DateTime<Utc>) -> Result<Vec<RawItem>> {
        let t0 = std::time::Instant::now();
        let rss: Rss =
            from_str(xml).with_context(|| format!("parsing rss xml for {}", self.name))?;

        let mut out = Vec::with_capacity(rss.channel.item.len());
        for it in rss.channel.item {
            let title = html_escape::decode_html_entities(it.title.as_deref().unwrap_or_default())
                .trim()
                .to_string();
            let url = it.link.unwrap_or_default();
            if title.is_empty() || url.is_empty() {
                continue;
            }

            // Missing or unparseable dates count as fresh.
            let published_at = it
                .pub_date
                .as_deref()
                .and_then(parse_rfc2822)
                .unwrap_or(now);
            if now - published_at > Duration::hours(MAX_ITEM_AGE_HOURS) {
                continue;
            }

            let image_url = it
                .enclosure
                .iter()
                .find(|enc| {
                    matches!(enc.mime_type.as_deref(), Some("image/jpeg") | Some("image/png"))
                })
                .and_then(|enc| enc.url.clone());

            out.push(RawItem {
                title,
                url,
                description: clean_description(it.description.as_deref().unwrap_or_default()),
                published_at,
                source_name: self.name.clone(),
                image_url,
                score: 0.0,
            });
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("fetch_parse_ms").record(ms);
        counter!("fetch_parsed_total").increment(out.len() as u64);
        Ok(out)
    }

    /// Transient network failures retry with 1s/2s backoff before giving up.
    async fn fetch_body(&self, url: &str, client: &reqwest::Client) -> Result<String> {
        let mut attempt = 0u32;
        let mut delay = std::time::Duration::from_secs(1);
        loop {
            match client.get(url).send().await {
                Ok(resp) => {
                    return resp
                        .text()
                        .await
                        .with_context(|| format!("reading rss body for {}", self.name));
                }
                Err(e) if attempt + 1 < FETCH_ATTEMPTS => {
                    tracing::warn!(error = ?e, source = %self.name, attempt, "rss fetch retry");
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!(
                            "fetching rss feed {} after {FETCH_ATTEMPTS} attempts",
                            self.name
                        )
                    });
                }
            }
        }
    }
}

#[async_trait]
impl NewsSource for RssSource {
    async fn fetch_news(&self) -> Result<Vec<RawItem>> {
        let now = Utc::now();
        match &self.mode {
            Mode::Fixture(xml) => self.parse_items(xml, now),
            Mode::Http { url, client } => {
                let body = self.fetch_body(url, client).await?;
                self.parse_items(&body, now)
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
