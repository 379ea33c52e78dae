// src/aggregate/mod.rs
pub mod config;
pub mod sources;
pub mod types;

use std::cmp::Ordering;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use tokio::task::JoinSet;

use crate::aggregate::types::{NewsSource, RawItem};
use crate::dedup::dedup_by_title;
use crate::layout::{build_page, Page};
use crate::scoring::ScoringConfig;

/// One-time metrics registration (so series show up if a recorder is installed).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("fetch_items_total", "Items merged from succeeding sources.");
        describe_counter!("fetch_source_errors_total", "Source fetch failures.");
        describe_counter!("fetch_parsed_total", "Items parsed by source adapters.");
        describe_histogram!("fetch_parse_ms", "Adapter parse time in milliseconds.");
        describe_counter!(
            "pipeline_malformed_total",
            "Items dropped for missing title/url."
        );
        describe_counter!(
            "pipeline_dedup_total",
            "Items removed by normalized-title deduplication."
        );
        describe_gauge!(
            "pipeline_last_run_ts",
            "Unix ts when the aggregation pipeline last ran."
        );
    });
}

/// Registry of source adapters plus the fan-out/fan-in fetch step.
///
/// Registration happens during setup, before the run starts, but appends
/// still go through a lock so the registry stays safe to share.
pub struct Aggregator {
    sources: Mutex<Vec<Arc<dyn NewsSource>>>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self {
            sources: Mutex::new(Vec::new()),
        }
    }

    pub fn add_source(&self, source: Arc<dyn NewsSource>) {
        self.sources
            .lock()
            .expect("source registry lock poisoned")
            .push(source);
    }

    pub fn source_count(&self) -> usize {
        self.sources
            .lock()
            .expect("source registry lock poisoned")
            .len()
    }

    /// Fetch from every registered source concurrently and merge the
    /// successes in completion order. Individual failures are logged and
    /// counted; the call only fails when every source failed and nothing
    /// was merged. Every dispatched task is awaited, so a slow source
    /// delays the batch but never drops a finished sibling's results.
    pub async fn fetch_all(&self) -> Result<Vec<RawItem>> {
        ensure_metrics_described();

        let sources: Vec<Arc<dyn NewsSource>> = self
            .sources
            .lock()
            .expect("source registry lock poisoned")
            .clone();

        let mut tasks = JoinSet::new();
        for source in sources {
            tasks.spawn(async move {
                let name = source.name().to_string();
                (name, source.fetch_news().await)
            });
        }

        let mut merged: Vec<RawItem> = Vec::new();
        let mut failures = 0usize;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((name, Ok(mut items))) => {
                    tracing::debug!(source = %name, items = items.len(), "source fetch ok");
                    counter!("fetch_items_total").increment(items.len() as u64);
                    merged.append(&mut items);
                }
                Ok((name, Err(e))) => {
                    tracing::warn!(error = ?e, source = %name, "source fetch failed");
                    counter!("fetch_source_errors_total").increment(1);
                    failures += 1;
                }
                Err(e) => {
                    tracing::warn!(error = ?e, "source task aborted");
                    counter!("fetch_source_errors_total").increment(1);
                    failures += 1;
                }
            }
        }

        if merged.is_empty() && failures > 0 {
            return Err(anyhow!(
                "no news source produced any items ({failures} source(s) failed)"
            ));
        }

        Ok(merged)
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the ranking pipeline over merged raw items: drop malformed entries,
/// score, sort best-first, collapse duplicates, and slot into the page.
/// Deterministic given `items` and `now`; empty input yields an empty page.
pub fn process_items(scoring: &ScoringConfig, items: Vec<RawItem>, now: DateTime<Utc>) -> Page {
    ensure_metrics_described();

    let before = items.len();
    let mut items: Vec<RawItem> = items.into_iter().filter(RawItem::is_well_formed).collect();
    let malformed = before - items.len();
    if malformed > 0 {
        tracing::debug!(dropped = malformed, "dropped items missing title or url");
        counter!("pipeline_malformed_total").increment(malformed as u64);
    }

    scoring.score_items(&mut items, now);
    sort_by_rank(&mut items);

    let (unique, duplicates) = dedup_by_title(items);
    if duplicates > 0 {
        tracing::debug!(dropped = duplicates, "collapsed duplicate stories");
        counter!("pipeline_dedup_total").increment(duplicates as u64);
    }

    build_page(&unique, now)
}

/// Sort contract: score descending, then published_at descending. The sort
/// is stable, so full ties keep their insertion order.
pub fn sort_by_rank(items: &mut [RawItem]) {
    items.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.published_at.cmp(&a.published_at))
    });
}

/// One full aggregation run: concurrent fetch, then the ranking pipeline.
pub async fn run_once(aggregator: &Aggregator, scoring: &ScoringConfig) -> Result<Page> {
    let raw = aggregator.fetch_all().await?;
    tracing::info!(items = raw.len(), "merged raw items from sources");

    let now = Utc::now();
    let page = process_items(scoring, raw, now);
    gauge!("pipeline_last_run_ts").set(now.timestamp() as f64);

    Ok(page)
}
