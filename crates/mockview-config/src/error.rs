//! Config loading errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// Not valid JSON5.
    #[error("failed to parse config: {0}")]
    ParseFailed(#[from] json5::Error),
    /// The merged value does not fit `MockviewConfig`.
    #[error("failed to decode config: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    /// An explicitly requested layer does not exist.
    #[error("config layer not found: {}", .0.display())]
    MissingLayer(PathBuf),
    #[error("invalid config at {path}: {message}")]
    InvalidField { path: String, message: String },
}
