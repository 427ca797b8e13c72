//! CLI error types with exit code handling
//!
//! Library errors are folded into one diagnostic type that knows its exit
//! code and, where it helps, a hint for fixing the pipeline definition.

use miette::Diagnostic;
use thiserror::Error;

use pkgcloud_core::CoreError;
use pkgcloud_repo::RepoError;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Request is incomplete or contradictory
    #[error("{message}")]
    #[diagnostic(code(pkgcloud::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// The package service answered with an error
    #[error("{message}")]
    #[diagnostic(code(pkgcloud::cli::remote))]
    Remote {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("{message}")]
    #[diagnostic(
        code(pkgcloud::cli::auth),
        help("Check source.username and source.api_key")
    )]
    Auth { message: String },

    #[error("{message}")]
    #[diagnostic(code(pkgcloud::cli::network))]
    Network { message: String },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(pkgcloud::cli::io))]
    Io { message: String },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(pkgcloud::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::Remote { .. } => exit_codes::REMOTE_ERROR,
            CliError::Auth { .. } => exit_codes::AUTH_ERROR,
            CliError::Network { .. } => exit_codes::UNAVAILABLE,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a config error with help text
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MissingField { ref field } => {
                let help = format!("Set source.{} in the resource definition", field);
                CliError::config_with_help(err.to_string(), help)
            }
            CoreError::JsonParse(e) => CliError::config_with_help(
                format!("Invalid request: {}", e),
                "The request must be a JSON object with `source` and `params`",
            ),
            CoreError::Io(e) => e.into(),
            other => CliError::config(other.to_string()),
        }
    }
}

impl From<RepoError> for CliError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::AuthFailed { .. } => CliError::Auth {
                message: err.to_string(),
            },
            RepoError::Network { .. } | RepoError::Timeout { .. } => CliError::Network {
                message: err.to_string(),
            },
            RepoError::ExhaustedRetries { .. } => CliError::Remote {
                help: Some("Raise params.override_attempts or check why deletions do not take effect".to_string()),
                message: err.to_string(),
            },
            RepoError::UnknownDistribution { .. } => CliError::Remote {
                help: Some("The distribution is supported locally but not offered by the service".to_string()),
                message: err.to_string(),
            },
            RepoError::InvalidUrl { .. } => CliError::Config {
                help: Some("Check source.url or --api-url".to_string()),
                message: err.to_string(),
            },
            RepoError::Io(e) => e.into(),
            RepoError::Remote { .. } => CliError::Remote {
                message: err.to_string(),
                help: None,
            },
            other => CliError::internal(other.to_string()),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
