//! Error types for diskpush-core

use crate::api::ApiErrorInfo;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for diskpush-core
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for diskpush-core
#[derive(Error, Debug)]
pub enum Error {
    /// The local file is missing or is not a regular file
    #[error("File to upload not found: {}", .0.display())]
    LocalFileNotFound(PathBuf),

    /// Error reported by the Disk API in a response body
    #[error("{0}")]
    Api(ApiErrorInfo),

    /// 412 from the upload target
    #[error("Disk API error: Precondition Failed\nAn invalid range was sent in the Content-Range header while resuming the upload")]
    PreconditionFailed,

    /// 413 from the upload target
    #[error("Disk API error: Payload Too Large\nThe file is larger than the service allows")]
    PayloadTooLarge,

    /// 507 from the upload target
    #[error("Disk API error: Insufficient Storage\nThere is not enough free space on the Disk to store the file")]
    InsufficientStorage,

    /// Every upload attempt failed with a transient status
    #[error("File upload error. Exceeded the maximum number of attempts.\nHTTP STATUS CODE: {status}")]
    RetryExhausted { status: u16 },

    /// Non-success response without a recognisable error body
    #[error("Unexpected response from Disk API (HTTP {status}): {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file not found
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// Invalid configuration format
    #[error("Invalid configuration format: {0}")]
    InvalidConfig(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Timeout
    #[error("Operation timed out")]
    Timeout,

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] toml::de::Error),
}

impl Error {
    /// Whether the failure came out of the content-transfer retry loop
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::RetryExhausted { .. })
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::PreconditionFailed => Some(412),
            Error::PayloadTooLarge => Some(413),
            Error::InsufficientStorage => Some(507),
            Error::RetryExhausted { status } | Error::UnexpectedStatus { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

impl From<ApiErrorInfo> for Error {
    fn from(info: ApiErrorInfo) -> Self {
        Error::Api(info)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else if err.is_connect() {
            Error::Network(err.to_string())
        } else if err.is_request() || err.is_builder() {
            Error::HttpClient(err.to_string())
        } else {
            Error::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert_eq!(Error::PreconditionFailed.status(), Some(412));
        assert_eq!(Error::PayloadTooLarge.status(), Some(413));
        assert_eq!(Error::InsufficientStorage.status(), Some(507));
        assert!(!Error::PayloadTooLarge.is_retryable());
    }

    #[test]
    fn test_retry_exhausted_message() {
        let err = Error::RetryExhausted { status: 503 };
        assert!(err.is_retryable());
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().ends_with("HTTP STATUS CODE: 503"));
    }

    #[test]
    fn test_api_error_display() {
        let err: Error = ApiErrorInfo {
            error: "DiskNotFoundError".to_string(),
            description: "Resource not found.".to_string(),
            message: "Не удалось найти запрошенный ресурс.".to_string(),
        }
        .into();

        assert_eq!(
            err.to_string(),
            "Disk API DiskNotFoundError: Resource not found.\nНе удалось найти запрошенный ресурс."
        );
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_local_file_not_found_display() {
        let err = Error::LocalFileNotFound(PathBuf::from("/tmp/missing.bin"));
        assert_eq!(err.to_string(), "File to upload not found: /tmp/missing.bin");
    }
}
