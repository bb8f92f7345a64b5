//! JSON export of a feed snapshot.
//!
//! # Output Structure
//!
//! Files are organized by country with one file per category:
//! ```text
//! json_output_dir/
//! └── in/
//!     ├── general.json
//!     └── technology.json
//! ```
//!
//! Exporting the same selection again overwrites the previous file.

use crate::feed::FeedSnapshot;
use crate::utils::ensure_writable_dir;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`FeedSnapshot`] to `{json_output_dir}/{country}/{category}.json`.
///
/// # Returns
///
/// The path written, or an error if the directory is not writable or the
/// write fails.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir.display()))]
pub async fn write_feed(
    snapshot: &FeedSnapshot,
    json_output_dir: &Path,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(snapshot)?;

    let full_json_dir = json_output_dir.join(snapshot.selection.country.as_str());
    info!(full_json_dir = %full_json_dir.display(), "Ensuring JSON directory exists");
    if let Err(e) = ensure_writable_dir(&full_json_dir).await {
        error!(
            full_json_dir = %full_json_dir.display(),
            error = %e,
            "JSON directory is not writable"
        );
        return Err(e);
    }

    let output_json_filename = full_json_dir.join(format!("{}.json", snapshot.selection.category));
    fs::write(&output_json_filename, json).await?;
    info!(
        path = %output_json_filename.display(),
        articles = snapshot.articles.len(),
        "Wrote feed JSON"
    );

    Ok(output_json_filename)
}
