// src/layout.rs
//! Fixed front-page layout: one headline, a short top-stories list, and
//! three columns filled from the ranked, deduplicated sequence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::types::RawItem;

const TOP_STORIES_CAP: usize = 3;
const COLUMN_CAP: usize = 8;

const IMAGE_WIDTH: u32 = 600;
const IMAGE_HEIGHT: u32 = 400;

/// Markers that force an all-caps headline regardless of length.
const URGENCY_MARKERS: &[&str] = &["BREAKING", "EXCLUSIVE", "URGENT"];

/// Entities big enough to warrant caps when the headline is short.
const MAJOR_TOPICS: &[&str] = &[
    "GPT-5",
    "GPT5",
    "CHATGPT",
    "OPENAI",
    "GOOGLE",
    "MICROSOFT",
    "META",
    "APPLE",
];

/// Headlines with a major entity are upper-cased only below this length.
const CAPS_LENGTH_LIMIT: usize = 60;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageData {
    pub src: String,
    pub alt: String,
    pub width: u32,
    pub height: u32,
}

/// A formatted story ready for display. Immutable once built; owned by the
/// page structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayItem {
    pub text: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageData>,
}

/// The final fixed-shape output, serialized with stable field names for the
/// persistence collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub main_headline: Option<DisplayItem>,
    pub top_stories: Vec<DisplayItem>,
    pub left_column: Vec<DisplayItem>,
    pub center_column: Vec<DisplayItem>,
    pub right_column: Vec<DisplayItem>,
    pub last_updated: DateTime<Utc>,
}

impl Page {
    fn empty(now: DateTime<Utc>) -> Self {
        Self {
            main_headline: None,
            top_stories: Vec::new(),
            left_column: Vec::new(),
            center_column: Vec::new(),
            right_column: Vec::new(),
            last_updated: now,
        }
    }
}

/// Headline casing: urgency markers always shout; a major entity shouts
/// only when the headline is short. Everything else passes through as
/// authored.
pub fn format_headline(title: &str) -> String {
    let upper = title.to_uppercase();

    if URGENCY_MARKERS.iter().any(|marker| upper.contains(marker)) {
        return upper;
    }

    if title.chars().count() < CAPS_LENGTH_LIMIT
        && MAJOR_TOPICS.iter().any(|topic| upper.contains(topic))
    {
        return upper;
    }

    title.to_string()
}

fn to_display(item: &RawItem) -> DisplayItem {
    // Alt text keeps the original title, not the shouty display form.
    let image = item
        .image_url
        .as_deref()
        .filter(|src| !src.is_empty())
        .map(|src| ImageData {
            src: src.to_string(),
            alt: item.title.clone(),
            width: IMAGE_WIDTH,
            height: IMAGE_HEIGHT,
        });

    DisplayItem {
        text: format_headline(&item.title),
        url: item.url.clone(),
        image,
    }
}

/// Slot the ranked, deduplicated sequence into the page shape.
///
/// Item 0 becomes the headline, items 1..=3 the top stories. The remainder
/// splits into contiguous thirds; the right column absorbs the integer
/// division remainder. With fewer than three leftovers the equal-thirds
/// rule does not apply and items go one per column, left to right.
pub fn build_page(items: &[RawItem], now: DateTime<Utc>) -> Page {
    let mut page = Page::empty(now);
    if items.is_empty() {
        return page;
    }

    let display: Vec<DisplayItem> = items.iter().map(to_display).collect();

    page.main_headline = Some(display[0].clone());
    page.top_stories = display[1..display.len().min(4)].to_vec();

    if display.len() > 4 {
        let remaining = &display[4..];
        let column_size = remaining.len() / 3;
        if column_size > 0 {
            page.left_column = remaining[..column_size].to_vec();
            page.center_column = remaining[column_size..2 * column_size].to_vec();
            page.right_column = remaining[2 * column_size..].to_vec();
        } else {
            page.left_column = remaining[..1].to_vec();
            if remaining.len() > 1 {
                page.center_column = remaining[1..2].to_vec();
            }
            if remaining.len() > 2 {
                page.right_column = remaining[2..].to_vec();
            }
        }
    }

    // Safety bounds; not expected to trigger at typical volumes.
    page.top_stories.truncate(TOP_STORIES_CAP);
    page.left_column.truncate(COLUMN_CAP);
    page.center_column.truncate(COLUMN_CAP);
    page.right_column.truncate(COLUMN_CAP);

    page
}
