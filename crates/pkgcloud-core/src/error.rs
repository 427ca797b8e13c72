//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Invalid or contradictory configuration. The message is user-facing as is.
    #[error("{message}")]
    Config { message: String },

    #[error("Failed to parse request: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<regex::Error> for CoreError {
    fn from(e: regex::Error) -> Self {
        CoreError::Config {
            message: format!("Invalid delete_version pattern: {}", e),
        }
    }
}

impl From<glob::PatternError> for CoreError {
    fn from(e: glob::PatternError) -> Self {
        CoreError::Config {
            message: format!("Invalid package_file_glob: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
