use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Errors from loading or writing configuration files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read a JSON config file. Missing fields fall back to the type's serde defaults.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Render a config value as pretty JSON.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, ConfigError> {
    Ok(serde_json::to_string_pretty(value)?)
}
