//! # Relevance Scoring
//!
//! Assigns each raw item a real-valued relevance score used purely for
//! ordering (it is not a probability). The score accumulates additively
//! from three components, none of which can be negative:
//!
//! - Keyword presence: title matches weigh more than description matches;
//!   each keyword is counted at most once per field.
//! - Recency: banded bonus by elapsed time since publication.
//! - Source trust: a one-time bonus when the source name contains a
//!   trusted publisher substring.
//!
//! The vocabulary lives in config (JSON, with a built-in seed fallback) so
//! the algorithm stays testable against synthetic word lists.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::aggregate::types::RawItem;

const TITLE_KEYWORD_BONUS: f64 = 2.0;
const DESCRIPTION_KEYWORD_BONUS: f64 = 1.0;
const TRUSTED_SOURCE_BONUS: f64 = 2.0;

pub const DEFAULT_SCORING_CONFIG_PATH: &str = "config/scoring.json";
const ENV_PATH: &str = "AI_NEWS_SCORING_PATH";

/// Scoring vocabulary, loaded from JSON or seeded.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Case-insensitive domain vocabulary matched as substrings.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Case-sensitive publisher substrings; first match wins, no stacking.
    #[serde(default)]
    pub trusted_sources: Vec<String>,
}

impl ScoringConfig {
    /// Load configuration using env var + fallbacks:
    /// 1) $AI_NEWS_SCORING_PATH
    /// 2) config/scoring.json
    /// 3) built-in seed
    pub fn load_default() -> Self {
        if let Ok(p) = std::env::var(ENV_PATH) {
            return Self::load_from_file(p);
        }
        Self::load_from_file(DEFAULT_SCORING_CONFIG_PATH)
    }

    /// Load configuration from a JSON file.
    /// Falls back to `default_seed()` on error.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(path) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_else(|_| Self::default_seed()),
            Err(_) => Self::default_seed(),
        }
    }

    /// Built-in seed: AI company/model vocabulary, urgency markers, and the
    /// trusted publisher list.
    pub fn default_seed() -> Self {
        let keywords = [
            "GPT",
            "ChatGPT",
            "Claude",
            "Gemini",
            "LLM",
            "AI",
            "artificial intelligence",
            "machine learning",
            "deep learning",
            "neural network",
            "OpenAI",
            "Anthropic",
            "Google AI",
            "DeepMind",
            "Microsoft AI",
            "Meta AI",
            "AGI",
            "AI safety",
            "AI regulation",
            "AI ethics",
            "transformer",
            "diffusion model",
            "BREAKING",
            "EXCLUSIVE",
            "URGENT",
            "breakthrough",
            "revolutionary",
            "unprecedented",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let trusted_sources = ["OpenAI", "Anthropic", "Google", "DeepMind", "MIT", "Stanford"]
            .into_iter()
            .map(String::from)
            .collect();

        Self {
            keywords,
            trusted_sources,
        }
    }

    /// Score every item in place. Pure given `now`, deterministic within a run.
    pub fn score_items(&self, items: &mut [RawItem], now: DateTime<Utc>) {
        for item in items.iter_mut() {
            item.score = self.score_item(item, now);
        }
    }

    fn score_item(&self, item: &RawItem, now: DateTime<Utc>) -> f64 {
        let mut score = 0.0;
        let title = item.title.to_lowercase();
        let description = item.description.to_lowercase();

        for keyword in &self.keywords {
            let keyword = keyword.to_lowercase();
            if title.contains(&keyword) {
                score += TITLE_KEYWORD_BONUS;
            }
            if description.contains(&keyword) {
                score += DESCRIPTION_KEYWORD_BONUS;
            }
        }

        score += recency_bonus(item.published_at, now);

        if self
            .trusted_sources
            .iter()
            .any(|trusted| item.source_name.contains(trusted.as_str()))
        {
            score += TRUSTED_SOURCE_BONUS;
        }

        score
    }
}

/// Freshness bonus by elapsed-time band, evaluated in priority order.
/// Items dated in the future (clock skew, malformed feed dates) clamp to
/// zero elapsed and land in the freshest band.
fn recency_bonus(published_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let elapsed = (now - published_at).max(Duration::zero());
    if elapsed < Duration::hours(1) {
        5.0
    } else if elapsed < Duration::hours(6) {
        3.0
    } else if elapsed < Duration::hours(24) {
        1.0
    } else {
        0.0
    }
}
