//! AI News Front Page — Binary Entrypoint
//! One run per process: fetch every source concurrently, rank and lay out
//! the survivors, publish the snapshot, exit.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ai_news_aggregator::aggregate::sources::hackernews::HackerNewsSource;
use ai_news_aggregator::aggregate::sources::rss::RssSource;
use ai_news_aggregator::aggregate::sources::stubs::{NitterSource, RedditSource};
use ai_news_aggregator::aggregate::{self, config as feeds, Aggregator};
use ai_news_aggregator::publish;
use ai_news_aggregator::scoring::ScoringConfig;

const DEFAULT_OUTPUT_DIR: &str = "public";
const ENV_OUTPUT_DIR: &str = "AI_NEWS_OUTPUT_DIR";

/// Keyword filter for the Hacker News point-query source.
const HN_KEYWORDS: &[&str] = &[
    "artificial intelligence",
    "machine learning",
    "GPT",
    "LLM",
    "neural network",
    "deep learning",
    "AI safety",
    "AGI",
];

/// Subreddits for the (stubbed) Reddit source.
const SUBREDDITS: &[&str] = &[
    "MachineLearning",
    "artificial",
    "singularity",
    "OpenAI",
    "LocalLLaMA",
];

/// Accounts for the (stubbed) Nitter source.
const NITTER_ACCOUNTS: &[(&str, &str)] = &[
    ("OpenAI", "https://nitter.net/OpenAI/rss"),
    ("AnthropicAI", "https://nitter.net/AnthropicAI/rss"),
    ("GoogleAI", "https://nitter.net/GoogleAI/rss"),
    ("DeepMind", "https://nitter.net/DeepMind/rss"),
    ("sama", "https://nitter.net/sama/rss"),
];

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

fn configure_sources(aggregator: &Aggregator) -> Result<()> {
    let feed_list = feeds::load_feeds_default()?;
    tracing::info!(feeds = feed_list.len(), "registering rss sources");
    for feed in feed_list {
        aggregator.add_source(Arc::new(RssSource::from_url(feed.name, feed.url)));
    }

    aggregator.add_source(Arc::new(HackerNewsSource::new(
        HN_KEYWORDS.iter().map(|s| s.to_string()).collect(),
    )));

    aggregator.add_source(Arc::new(RedditSource::new(
        SUBREDDITS.iter().map(|s| s.to_string()).collect(),
    )));

    for (handle, url) in NITTER_ACCOUNTS {
        aggregator.add_source(Arc::new(NitterSource::new(handle, *url)));
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op elsewhere.
    let _ = dotenvy::dotenv();
    init_tracing();

    tracing::info!("starting ai news aggregation");

    let aggregator = Aggregator::new();
    configure_sources(&aggregator)?;
    tracing::info!(sources = aggregator.source_count(), "sources registered");

    let scoring = ScoringConfig::load_default();

    // The only fatal fetch outcome is every source failing with nothing
    // merged; partial failure already got logged inside fetch_all.
    let page = aggregate::run_once(&aggregator, &scoring).await?;

    let out_dir = std::env::var(ENV_OUTPUT_DIR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_DIR));

    if let Err(e) = publish::archive_previous(&out_dir) {
        tracing::warn!(error = ?e, "archiving previous snapshot failed");
    }
    let path = publish::save_page(&page, &out_dir)?;

    tracing::info!(path = %path.display(), "news aggregation completed");
    Ok(())
}
