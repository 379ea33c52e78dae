// tests/fetch_orchestrator.rs
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;

use ai_news_aggregator::{Aggregator, NewsSource, RawItem};

fn item(n: usize, source: &str) -> RawItem {
    RawItem {
        title: format!("Story {n} from {source}"),
        url: format!("https://{source}.test/{n}"),
        description: String::new(),
        published_at: Utc::now(),
        source_name: source.to_string(),
        image_url: None,
        score: 0.0,
    }
}

struct StaticSource {
    name: &'static str,
    count: usize,
}

#[async_trait]
impl NewsSource for StaticSource {
    async fn fetch_news(&self) -> Result<Vec<RawItem>> {
        Ok((0..self.count).map(|n| item(n, self.name)).collect())
    }
    fn name(&self) -> &str {
        self.name
    }
}

struct FailingSource {
    name: &'static str,
}

#[async_trait]
impl NewsSource for FailingSource {
    async fn fetch_news(&self) -> Result<Vec<RawItem>> {
        Err(anyhow!("connection refused"))
    }
    fn name(&self) -> &str {
        self.name
    }
}

struct SlowSource;

#[async_trait]
impl NewsSource for SlowSource {
    async fn fetch_news(&self) -> Result<Vec<RawItem>> {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        Ok(vec![item(0, "slow")])
    }
    fn name(&self) -> &str {
        "slow"
    }
}

#[tokio::test]
async fn partial_failure_keeps_surviving_items() {
    let aggregator = Aggregator::new();
    aggregator.add_source(Arc::new(FailingSource { name: "down-1" }));
    aggregator.add_source(Arc::new(FailingSource { name: "down-2" }));
    aggregator.add_source(Arc::new(StaticSource {
        name: "up",
        count: 5,
    }));

    let items = aggregator
        .fetch_all()
        .await
        .expect("partial failure is not fatal");
    assert_eq!(items.len(), 5);
    assert!(items.iter().all(|i| i.source_name == "up"));
}

#[tokio::test]
async fn total_failure_is_fatal() {
    let aggregator = Aggregator::new();
    aggregator.add_source(Arc::new(FailingSource { name: "down-1" }));
    aggregator.add_source(Arc::new(FailingSource { name: "down-2" }));
    aggregator.add_source(Arc::new(FailingSource { name: "down-3" }));

    let err = aggregator.fetch_all().await.expect_err("nothing succeeded");
    assert!(err.to_string().contains("no news source produced any items"));
}

#[tokio::test]
async fn empty_batches_without_errors_succeed() {
    let aggregator = Aggregator::new();
    aggregator.add_source(Arc::new(StaticSource {
        name: "quiet-1",
        count: 0,
    }));
    aggregator.add_source(Arc::new(StaticSource {
        name: "quiet-2",
        count: 0,
    }));

    let items = aggregator.fetch_all().await.expect("nothing new is fine");
    assert!(items.is_empty());
}

#[tokio::test]
async fn no_registered_sources_is_an_empty_run() {
    let aggregator = Aggregator::new();
    assert_eq!(aggregator.source_count(), 0);
    let items = aggregator.fetch_all().await.expect("empty registry is ok");
    assert!(items.is_empty());
}

#[tokio::test]
async fn slow_source_delays_but_never_drops_finished_results() {
    let aggregator = Aggregator::new();
    aggregator.add_source(Arc::new(SlowSource));
    aggregator.add_source(Arc::new(StaticSource {
        name: "fast",
        count: 2,
    }));

    let items = aggregator.fetch_all().await.expect("both sources merge");
    assert_eq!(items.len(), 3);
    assert!(items.iter().any(|i| i.source_name == "slow"));
    assert!(items.iter().any(|i| i.source_name == "fast"));
}
