use ragkit_schema::{SchemaError, ValidationErrors};
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("HTTP request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Reply does not match schema: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("Failed to decode reply: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Retrieval failed: {0}")]
    Retrieval(#[from] ragkit_core::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn provider(message: impl Into<String>) -> Self {
        Error::Provider(message.into())
    }

    /// True for errors caused by local configuration rather than the remote service
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }
}
