// tests/scoring_synthetic.rs
use chrono::{DateTime, Duration, Utc};

use ai_news_aggregator::{RawItem, ScoringConfig};

fn raw(title: &str, description: &str, source: &str, published_at: DateTime<Utc>) -> RawItem {
    RawItem {
        title: title.to_string(),
        url: "https://example.test/story".to_string(),
        description: description.to_string(),
        published_at,
        source_name: source.to_string(),
        image_url: None,
        score: 0.0,
    }
}

fn synthetic() -> ScoringConfig {
    ScoringConfig {
        keywords: vec!["widget".into(), "gizmo".into()],
        trusted_sources: vec!["Widget Weekly".into()],
    }
}

#[test]
fn components_accumulate_additively() {
    let now = Utc::now();
    let cfg = synthetic();

    // widget in title (+2), gizmo in description (+1), 30 minutes old (+5),
    // trusted source (+2).
    let mut items = vec![raw(
        "New widget announced",
        "The gizmo angle explained",
        "Widget Weekly",
        now - Duration::minutes(30),
    )];
    cfg.score_items(&mut items, now);
    assert_eq!(items[0].score, 10.0);
}

#[test]
fn no_component_can_go_negative() {
    let now = Utc::now();
    let cfg = synthetic();

    let mut items = vec![raw(
        "Nothing relevant here",
        "",
        "Unknown Outlet",
        now - Duration::days(30),
    )];
    cfg.score_items(&mut items, now);
    assert_eq!(items[0].score, 0.0);
}

#[test]
fn future_dated_items_score_as_very_recent() {
    let now = Utc::now();
    let cfg = synthetic();

    let mut items = vec![raw(
        "Nothing relevant here",
        "",
        "Unknown Outlet",
        now + Duration::hours(3),
    )];
    cfg.score_items(&mut items, now);
    assert_eq!(items[0].score, 5.0);
}

#[test]
fn breaking_trusted_fresh_story_scores_at_least_nine() {
    let now = Utc::now();
    let cfg = ScoringConfig::default_seed();

    let mut items = vec![raw(
        "Breaking news from the lab",
        "",
        "MIT Technology Review",
        now - Duration::minutes(30),
    )];
    cfg.score_items(&mut items, now);
    assert!(
        items[0].score >= 9.0,
        "expected >= 9.0, got {}",
        items[0].score
    );
}

#[test]
fn scoring_is_deterministic_for_a_fixed_clock() {
    let now = Utc::now();
    let cfg = synthetic();

    let mut a = vec![raw("widget", "gizmo", "Widget Weekly", now - Duration::hours(2))];
    let mut b = a.clone();
    cfg.score_items(&mut a, now);
    cfg.score_items(&mut b, now);
    assert_eq!(a[0].score, b[0].score);
}
