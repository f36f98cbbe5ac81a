//! Environment/runtime helpers
//!
//! Sanity checks to ensure the directory holding persisted state exists at startup.

use std::path::Path;

use tracing::info;

/// Ensure the parent directory of `data_file` exists, creating it if needed.
///
/// A bare file name (e.g. `ranking.json`) lives in the working directory and
/// needs nothing created.
pub async fn ensure_data_dir(data_file: &Path) -> anyhow::Result<()> {
    let Some(dir) = data_file.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if tokio::fs::metadata(dir).await.is_ok() {
        return Ok(());
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", dir.display()))?;
    info!(dir = %dir.display(), "created data directory");
    Ok(())
}
