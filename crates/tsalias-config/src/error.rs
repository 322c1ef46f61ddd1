//! Error types for tsconfig discovery, parsing and settings extraction.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// No tsconfig at the expected location
    #[error("Config file not found: {}\n\nHint: Pass the path to your tsconfig.json or run from the project directory", .0.display())]
    NotFound(PathBuf),

    /// tsconfig is not valid JSON (after comments and trailing commas are removed)
    #[error("Invalid JSON in {}: {source}\n\nHint: Check tsconfig.json syntax", .path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A required compiler option is absent from every layer
    #[error("Missing required field: {field}\n\nHint: {hint}")]
    MissingField { field: String, hint: String },

    /// A setting has an unusable value
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        field: String,
        value: String,
        hint: String,
    },

    #[error("Failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
