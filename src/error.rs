//! Error types for message normalization, export and storage

use thiserror::Error;

/// Errors that can occur while ingesting, normalizing or persisting messages
#[derive(Error, Debug)]
pub enum Error {
    /// The provider payload does not have the expected shape
    #[error("Invalid payload structure: {0}")]
    Structure(String),

    /// A body part could not be base64- or charset-decoded
    #[error("Failed to decode content: {0}")]
    Decode(String),

    /// Invalid date format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// A caller-supplied argument violates a precondition
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The same message id appeared twice in one batch
    #[error("Duplicate message id in batch: {0}")]
    DuplicateMessage(String),

    /// The mail-fetch collaborator failed
    #[error("Mail source error: {0}")]
    Source(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Storage(#[from] rusqlite::Error),
}

/// Result type for normalization operations
pub type Result<T> = std::result::Result<T, Error>;
