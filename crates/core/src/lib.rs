//! diskpush-core - Core library for the diskpush CLI
//!
//! Uploads a single local file to Yandex Disk over its REST API, optionally
//! creating missing parent directories and retrying transient failures of
//! the content transfer.

pub mod api;
pub mod client;
pub mod config;
pub mod directories;
pub mod error;
pub mod remote_path;
pub mod retry;
pub mod transport;
pub mod upload;

// Re-export commonly used types
pub use api::{classify, ApiErrorInfo, DEFAULT_BASE_URL};
pub use client::DiskClient;
pub use config::{
    config_exists, get_config_path, load_config, load_config_from, save_config, save_config_to,
    validate_config,
};
pub use config::{ApiConfig, AuthConfig, Config, ConfigFile, LoggingConfig, UploadConfig};
pub use error::{Error, Result};
pub use remote_path::RemotePath;
pub use retry::RetryPolicy;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, RequestBody, Transport, DEFAULT_TIMEOUT};
pub use upload::{UploadRequest, UploadTarget};
