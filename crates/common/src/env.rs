//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;
use tracing::warn;

/// Ensure the data directory exists; warn when the env mirror file's parent
/// is missing rather than failing (mirror writes are best-effort anyway).
pub async fn ensure_env(data_dir: &str, env_file: &str) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {data_dir}: {e}"))?;
    if let Some(parent) = Path::new(env_file).parent() {
        if !parent.as_os_str().is_empty() && tokio::fs::metadata(parent).await.is_err() {
            warn!(%env_file, "env mirror parent directory not found; mirror writes will be skipped");
        }
    }
    Ok(())
}
