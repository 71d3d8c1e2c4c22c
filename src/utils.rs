//! Utility functions for text cleanup, dates, and file system checks.
//!
//! - Whitespace collapsing for extracted text
//! - Char-boundary-safe truncation for logs and model input
//! - Slugification for output file names
//! - Run date stamp for stored records
//! - Output directory validation

use chrono::Local;
use itertools::Itertools;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Collapse every run of whitespace into one space and trim both ends.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
/// ```
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().join(" ")
}

/// Keep at most `max` characters of `s`, never splitting a character.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and the number
/// of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let kept = truncate_chars(s, max);
    if kept.len() == s.len() {
        s.to_string()
    } else {
        format!("{}…(+{} bytes)", kept, s.len() - kept.len())
    }
}

/// Convert a title to a file-name-friendly slug.
///
/// Lowercases, drops anything that is not alphanumeric, a space or a hyphen,
/// and replaces spaces with hyphens. Hangul and other non-ASCII letters are
/// kept.
pub fn slugify_title(title: &str) -> String {
    title
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ' && c != '-', "")
        .split_whitespace()
        .join("-")
}

/// Today's local date in `YYYY-MM-DD` form.
pub fn today_stamp() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then creates and deletes a marker file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable
/// (permission denied, read-only filesystem, etc.).
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let marker = format!("{}/.write_check", path.trim_end_matches('/'));
    // Handle closed before removal
    drop(fs::File::create(&marker).await?);
    if let Err(e) = fs::remove_file(&marker).await {
        warn!(%marker, error = %e, "Could not remove write-check file");
    }
    info!(%path, "Output directory is writable");
    Ok(())
}
