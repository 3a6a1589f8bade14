//! Error types for patent-dl
//!
//! This module provides error handling for the library, including:
//! - Domain-specific error types (Retrieval, Download, Chain)
//! - HTTP status code mapping for the front end
//! - Structured error responses with machine-readable error codes
//!
//! A resolution that finds no link is not an error. It is reported as
//! [`Resolution::NotFound`](crate::resolver::Resolution::NotFound).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for patent-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for patent-dl
///
/// Per-identifier failures ([`RetrievalError`], [`DownloadError`]) are recovered by
/// the batch orchestrator and never abort a batch. Everything else is fatal to the
/// operation that raised it.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "link_pattern")
        key: Option<String>,
    },

    /// Remote page retrieval failed
    #[error("retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    /// Streaming download failed
    #[error("download error: {0}")]
    Download(#[from] DownloadError),

    /// Pipeline stage chaining failed
    #[error("chain error: {0}")]
    Chain(#[from] ChainError),

    /// Identifier rejected before any I/O
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Requested resource does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for a configuration error tied to a specific key
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}

/// Remote retrieval errors (page fetch could not complete)
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Connection, DNS, TLS or timeout failure
    #[error("failed to fetch {url}: {reason}")]
    Transport {
        /// The URL being fetched
        url: String,
        /// Underlying diagnostic text
        reason: String,
    },

    /// The remote answered with a status that is not treated as a completed fetch
    #[error("{url} returned HTTP {status}")]
    Status {
        /// The URL being fetched
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// The response body could not be read
    #[error("failed to read body of {url}: {reason}")]
    Body {
        /// The URL being fetched
        url: String,
        /// Underlying diagnostic text
        reason: String,
    },
}

/// Streaming download errors
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Writing the destination file failed (partial file removed best-effort)
    #[error("failed to write {path}: {reason}")]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying diagnostic text
        reason: String,
    },

    /// The byte transfer failed before or during streaming
    #[error("transfer of {url} failed: {reason}")]
    Transfer {
        /// Source URL
        url: String,
        /// Underlying diagnostic text
        reason: String,
    },
}

/// Stage chaining errors
#[derive(Debug, Error)]
pub enum ChainError {
    /// The stage process could not be started
    #[error("failed to launch {program}: {reason}")]
    Launch {
        /// Program that was being launched
        program: PathBuf,
        /// Underlying diagnostic text
        reason: String,
    },

    /// The stage ran but exited unsuccessfully
    #[error("stage '{stage}' failed: {}", describe_exit(.code))]
    StageFailed {
        /// Name of the failed stage
        stage: String,
        /// Exit code, `None` if terminated by a signal
        code: Option<i32>,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

impl ChainError {
    /// Process exit code the coordinator should terminate with
    pub fn exit_code(&self) -> i32 {
        match self {
            ChainError::StageFailed {
                code: Some(code), ..
            } => *code,
            _ => 1,
        }
    }
}

/// API error response format
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "not_found",
///     "message": "no PDF link found for US0000000",
///     "details": {
///       "identifier": "US0000000"
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "not_found", "validation_error")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create a "validation error" error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Error::Config { .. } => 400,
            Error::InvalidIdentifier(_) => 400,

            // 404 Not Found
            Error::NotFound(_) => 404,

            // 502 Bad Gateway - the remote source misbehaved
            Error::Retrieval(_) => 502,
            Error::Download(DownloadError::Transfer { .. }) => 502,

            // 500 Internal Server Error
            Error::Download(DownloadError::Write { .. }) => 500,
            Error::Chain(_) => 500,
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,
            Error::Other(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Retrieval(_) => "retrieval_error",
            Error::Download(e) => match e {
                DownloadError::Write { .. } => "write_error",
                DownloadError::Transfer { .. } => "transfer_error",
            },
            Error::Chain(e) => match e {
                ChainError::Launch { .. } => "launch_error",
                ChainError::StageFailed { .. } => "stage_failed",
            },
            Error::InvalidIdentifier(_) => "validation_error",
            Error::NotFound(_) => "not_found",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::ApiServerError(_) => "api_server_error",
            Error::Other(_) => "internal_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({
                "key": key,
            })),
            Error::InvalidIdentifier(raw) => Some(serde_json::json!({
                "identifier": raw,
            })),
            Error::Retrieval(RetrievalError::Status { url, status }) => Some(serde_json::json!({
                "url": url,
                "status": status,
            })),
            Error::Download(DownloadError::Write { path, .. }) => Some(serde_json::json!({
                "path": path,
            })),
            Error::Download(DownloadError::Transfer { url, .. }) => Some(serde_json::json!({
                "url": url,
            })),
            Error::Chain(ChainError::StageFailed { stage, code }) => Some(serde_json::json!({
                "stage": stage,
                "exit_code": code,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
