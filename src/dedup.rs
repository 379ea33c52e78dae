// src/dedup.rs
//! Duplicate suppression: the same story reported by multiple outlets is
//! collapsed onto a normalized title key. Input is expected to be sorted
//! best-first, so the surviving copy is always the top-ranked instance.

use std::collections::HashSet;

use crate::aggregate::types::RawItem;

/// Publisher suffixes commonly appended to syndicated headlines, in both
/// separator forms. Stripped before the dash pass rewrites separators.
const PUBLISHER_SUFFIXES: &[&str] = &[
    " | techcrunch",
    " - techcrunch",
    " | the verge",
    " - the verge",
    " | ars technica",
    " - ars technica",
    " | wired",
    " - wired",
    " | venturebeat",
    " - venturebeat",
];

/// Canonical key used to detect near-duplicate stories across sources.
pub fn normalize_title(title: &str) -> String {
    let mut key = title.to_lowercase();

    for suffix in PUBLISHER_SUFFIXES {
        if let Some(stripped) = key.strip_suffix(suffix) {
            key = stripped.to_string();
        }
    }

    for dash in [" - ", " – ", " — "] {
        key = key.replace(dash, " ");
    }
    key = key.replace([':', '\'', '"'], "");

    key.trim().to_string()
}

/// Single pass over a sorted sequence: keep the first occurrence of each
/// normalized title, drop the rest. Returns the survivors and the drop count.
pub fn dedup_by_title(items: Vec<RawItem>) -> (Vec<RawItem>, usize) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique = Vec::with_capacity(items.len());
    let mut dropped = 0usize;

    for item in items {
        if seen.insert(normalize_title(&item.title)) {
            unique.push(item);
        } else {
            dropped += 1;
        }
    }

    (unique, dropped)
}
