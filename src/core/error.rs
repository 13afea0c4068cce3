use std::io;
use thiserror::Error;

/// Unified error type for the lochat application
#[derive(Error, Debug)]
pub enum ChatError {
    /// Path failed lexical validation or resolved outside the project root
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// File or directory does not exist inside the workspace
    #[error("Not found: {0}")]
    NotFound(String),

    /// Sandbox containment violation or OS-level permission denial
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// File content exceeds the configured byte budget
    #[error("Content size ({actual} bytes) exceeds maximum allowed size ({limit} bytes)")]
    ContentTooLarge { actual: usize, limit: usize },

    /// No project directory is available to resolve paths against
    #[error("No project is currently open")]
    NoActiveProject,

    /// The remote call did not complete within the configured timeout
    #[error("LLM request timed out")]
    Timeout,

    /// The endpoint returned a non-success status
    #[error("API error: {0}")]
    Api(String),

    /// Connection-level failures
    #[error("Network error: {0}")]
    Network(String),

    /// The endpoint's reply could not be decoded
    #[error("Response parse error: {0}")]
    Parse(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input errors
    #[error("Input error: {0}")]
    Input(String),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChatError::Timeout
        } else if err.is_connect() {
            ChatError::Network(format!("Connection failed: {}", err))
        } else if err.is_status() {
            ChatError::Api(format!("API returned error status: {}", err))
        } else if err.is_decode() {
            ChatError::Parse(format!("Failed to decode response: {}", err))
        } else {
            ChatError::Network(format!("Request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yml::Error> for ChatError {
    fn from(err: serde_yml::Error) -> Self {
        ChatError::Serialization(format!("YAML error: {}", err))
    }
}
