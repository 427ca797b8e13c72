//! Error types for remote operations

use thiserror::Error;

/// Remote operation errors
#[derive(Debug, Error)]
pub enum RepoError {
    // ============ Remote Errors ============
    /// Non-success response; `body` is the raw response text
    #[error("Remote request failed with HTTP {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Request timeout after {seconds}s")]
    Timeout { seconds: u64 },

    // ============ Authentication Errors ============
    #[error("Authentication failed: {message}")]
    AuthFailed { message: String },

    // ============ Publish Errors ============
    #[error("Unable to override the package {filename}. No more attempts left after {attempts} deletion(s)")]
    ExhaustedRetries { filename: String, attempts: u32 },

    #[error("Distribution {distribution} is not known to the package service")]
    UnknownDistribution { distribution: String },

    // ============ Configuration Errors ============
    #[error("Invalid service URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    // ============ IO Errors ============
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // ============ Other ============
    #[error("{0}")]
    Other(String),
}

/// Result type for remote operations
pub type Result<T> = std::result::Result<T, RepoError>;

impl From<reqwest::Error> for RepoError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RepoError::Timeout {
                seconds: crate::client::REQUEST_TIMEOUT.as_secs(),
            }
        } else if e.is_connect() {
            RepoError::Network {
                message: format!("Connection failed: {}", e),
            }
        } else if let Some(status) = e.status() {
            RepoError::Remote {
                status: status.as_u16(),
                body: e.to_string(),
            }
        } else {
            RepoError::Network {
                message: e.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(e: serde_json::Error) -> Self {
        RepoError::Serialization(e.to_string())
    }
}

impl From<url::ParseError> for RepoError {
    fn from(e: url::ParseError) -> Self {
        RepoError::InvalidUrl {
            url: String::new(),
            reason: e.to_string(),
        }
    }
}
