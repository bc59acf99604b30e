//! JSON persistence: one pretty-printed array of records per run.

use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

use crate::models::ArticleRecord;

/// Write the harvested records to `path` as a pretty-printed JSON array.
///
/// The parent directory is created when missing and the file is overwritten
/// outright; there is no merging with a previous run's output.
#[instrument(level = "info", skip(records), fields(path = %path.display(), count = records.len()))]
pub async fn write_records(records: &[ArticleRecord], path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(records)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    fs::write(path, json).await?;
    info!("wrote harvest output");
    Ok(())
}
