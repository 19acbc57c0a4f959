use std::result;

use crate::retry::RetryableError;
use thiserror::Error;

/// Error types for PubMed client operations
#[derive(Error, Debug)]
pub enum PubMedError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// XML parsing failed
    #[error("XML parsing failed: {0}")]
    XmlError(String),

    /// Generic API error with HTTP status code
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// A request did not complete within the configured timeout
    #[error("Request timed out: {label}")]
    Timeout { label: String },

    /// Invalid query structure or parameters
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Search limit exceeded
    /// This error is returned when a search query requests more results than the maximum retrievable limit.
    #[error("Search limit exceeded: requested {requested}, maximum is {maximum}")]
    SearchLimitExceeded { requested: usize, maximum: usize },
}

pub type Result<T> = result::Result<T, PubMedError>;

impl PubMedError {
    /// HTTP status code carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            PubMedError::ApiError { status, .. } => Some(*status),
            PubMedError::RequestError(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the failure was a timeout or aborted request
    pub fn is_timeout(&self) -> bool {
        match self {
            PubMedError::Timeout { .. } => true,
            PubMedError::RequestError(err) => err.is_timeout(),
            _ => false,
        }
    }
}

impl RetryableError for PubMedError {
    fn is_retryable(&self) -> bool {
        if self.is_timeout() {
            return true;
        }

        // Only server errors (5xx) are transient; 4xx and everything else is permanent
        matches!(self.status(), Some(500..=599))
    }

    fn retry_reason(&self) -> &str {
        if self.is_retryable() {
            if self.is_timeout() {
                "Request timeout"
            } else {
                "Server error"
            }
        } else {
            match self {
                PubMedError::RequestError(err) if err.is_connect() => "Connection error",
                PubMedError::RequestError(_) => "Network error",
                PubMedError::JsonError(_) => "Invalid JSON response",
                PubMedError::XmlError(_) => "Invalid XML response",
                PubMedError::ApiError { status, .. } if (400..500).contains(status) => {
                    "Client error"
                }
                PubMedError::InvalidQuery(_) | PubMedError::SearchLimitExceeded { .. } => {
                    "Invalid query"
                }
                _ => "Non-transient error",
            }
        }
    }
}
