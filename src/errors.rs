/*!
 * Error types for the cipherpad application.
 *
 * This module contains custom error types for the collaborators a session
 * talks to, using the thiserror crate for ergonomic error definitions.
 *
 * A transformation service rejecting its input is not an error here:
 * it is reported through `TransformOutcome::Rejected`.
 */

use thiserror::Error;

/// Transport-level failures of the remote services
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The requested share id does not exist
    #[error("Share not found: {0}")]
    NotFound(String),
}

impl ServiceError {
    /// Message suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(message) => message.clone(),
            Self::ApiError { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors from the clipboard facility
#[derive(Error, Debug)]
#[error("Clipboard error: {0}")]
pub struct ClipboardError(pub String);

/// Errors from the history store
#[derive(Error, Debug)]
pub enum HistoryError {
    /// Reading or writing the history file failed
    #[error("History I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The history file could not be encoded or decoded
    #[error("History serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a remote service
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// Error from the clipboard
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    /// Error from the history store
    #[error(transparent)]
    History(#[from] HistoryError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::History(HistoryError::Io(error))
    }
}
