//! Utility functions for string handling and output directories.
//!
//! This module provides helper functions used throughout the application:
//! - Capitalization and truncation for headings and cards
//! - The list of valid category names for help and error text
//! - File system validation for output directories

use crate::models::Category;
use itertools::Itertools;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Capitalize the first character of a string.
///
/// Used for category labels (e.g., "business" -> "Business").
///
/// # Examples
///
/// ```ignore
/// assert_eq!(upcase("hello"), "Hello");
/// assert_eq!(upcase(""), "");
/// ```
pub fn upcase(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}

/// Cut `text` to at most `max` characters, appending `...` when shortened.
///
/// Counts characters rather than bytes so multi-byte headlines are never
/// split inside a code point.
pub fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max).collect();
        format!("{kept}...")
    }
}

/// Comma-separated list of category names, e.g. for error messages.
pub fn category_names() -> String {
    Category::ALL.iter().map(|c| c.as_str()).join(", ")
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a scratch file
/// to confirm the process can write there.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let scratch = path.join(".headline_feed_write_check");
    fs::write(&scratch, b"").await?;
    let _ = fs::remove_file(&scratch).await;
    info!("Output directory is writable");
    Ok(())
}
