//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_env` without depending directly on `common`.

/// Ensure the data directory exists and the env mirror path looks writable.
pub async fn ensure_env(data_dir: &str, env_file: &str) -> anyhow::Result<()> {
    common::env::ensure_env(data_dir, env_file).await
}
