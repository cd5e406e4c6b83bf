//! Error handling module for MStyle

use thiserror::Error;

use crate::domain::errors::CommandError;

/// Main error type for MStyle application operations
#[derive(Error, Debug)]
pub enum MediaStyleError {
    /// Style command grammar error
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Style list file has an unrecognised extension
    #[error("Unsupported style list format: {path}. Expected .json, .yaml or .yml")]
    UnsupportedListFormat { path: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML deserialization error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML deserialization error
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Result type alias for MStyle operations
pub type MediaStyleResult<T> = std::result::Result<T, MediaStyleError>;
