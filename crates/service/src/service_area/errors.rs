use thiserror::Error;

/// Typed failures from the settings store. A failed read is an explicit
/// control-flow branch for the resolver, never a caught exception, so
/// unrelated errors cannot be swallowed by accident.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("settings store unavailable: {0}")]
    Unavailable(String),
    #[error("malformed value for {key}: {value:?}")]
    Malformed { key: String, value: String },
}
