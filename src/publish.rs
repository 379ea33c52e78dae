// src/publish.rs
//! Snapshot persistence: write the current page to a known output path,
//! archive the previous snapshot before overwriting it, and prune archives
//! past the retention window.

use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::layout::Page;

pub const PAGE_FILE: &str = "news-data.json";
const ARCHIVE_DIR: &str = "archive";
const RETENTION: Duration = Duration::from_secs(7 * 24 * 3600);

/// Serialize and write the page snapshot, creating the output dir as needed.
pub fn save_page(page: &Page, out_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output dir {}", out_dir.display()))?;

    let path = out_dir.join(PAGE_FILE);
    let json = serde_json::to_string_pretty(page).context("serializing page")?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;

    Ok(path)
}

/// Copy the existing snapshot, if any, into the archive under a timestamped
/// name. Call this before `save_page` overwrites it. Returns the archive
/// path, or `None` when there was nothing to archive.
pub fn archive_previous(out_dir: &Path) -> Result<Option<PathBuf>> {
    let current = out_dir.join(PAGE_FILE);
    if !current.exists() {
        return Ok(None);
    }

    let archive_dir = out_dir.join(ARCHIVE_DIR);
    fs::create_dir_all(&archive_dir)
        .with_context(|| format!("creating archive dir {}", archive_dir.display()))?;

    let stamp = Utc::now().format("%Y-%m-%d-%H-%M-%S");
    let dest = archive_dir.join(format!("news-data-{stamp}.json"));
    fs::copy(&current, &dest)
        .with_context(|| format!("archiving snapshot to {}", dest.display()))?;

    prune_archives(&archive_dir);

    Ok(Some(dest))
}

/// Best-effort cleanup of archives older than the retention window.
pub fn prune_archives(archive_dir: &Path) {
    prune_archives_older_than(archive_dir, RETENTION)
}

pub fn prune_archives_older_than(archive_dir: &Path, max_age: Duration) {
    let entries = match fs::read_dir(archive_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = ?e, dir = %archive_dir.display(), "reading archive dir");
            return;
        }
    };

    let now = SystemTime::now();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        let Ok(meta) = entry.metadata() else { continue };
        let Ok(modified) = meta.modified() else { continue };

        let stale = now
            .duration_since(modified)
            .map(|age| age > max_age)
            .unwrap_or(false);
        if stale {
            if let Err(e) = fs::remove_file(&path) {
                tracing::warn!(error = ?e, path = %path.display(), "removing stale archive");
            }
        }
    }
}
