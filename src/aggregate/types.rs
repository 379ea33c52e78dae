// src/aggregate/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};

/// One candidate story as returned by a source adapter, before ranking.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct RawItem {
    pub title: String,
    pub url: String,
    pub description: String, // may be empty
    pub published_at: DateTime<Utc>,
    pub source_name: String,
    pub image_url: Option<String>,
    pub score: f64,
}

impl RawItem {
    /// Layout eligibility: a story needs at least a headline and a link.
    pub fn is_well_formed(&self) -> bool {
        !self.title.is_empty() && !self.url.is_empty()
    }
}

#[async_trait::async_trait]
pub trait NewsSource: Send + Sync {
    /// Fetch the current batch of stories. An empty batch with no error is a
    /// legitimate "nothing new". Adapters apply their own recency filter.
    async fn fetch_news(&self) -> Result<Vec<RawItem>>;
    fn name(&self) -> &str;
}
