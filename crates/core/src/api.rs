//! Disk REST API wire details shared by every call: endpoints, headers and
//! the translation of error responses into [`Error`].

use crate::error::Error;
use crate::transport::ApiResponse;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default Disk REST API base URL
pub const DEFAULT_BASE_URL: &str = "https://cloud-api.yandex.net/v1/disk";

/// Resource metadata / creation endpoint, relative to the base URL
pub const RESOURCES_ENDPOINT: &str = "resources";

/// Upload-link endpoint, relative to the base URL
pub const UPLOAD_ENDPOINT: &str = "resources/upload";

/// Content type used for the file body
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Error code returned when a directory already exists at the requested path
pub const EXISTENT_DIRECTORY_ERROR: &str = "DiskPathPointsToExistentDirectoryError";

/// Error body returned by the Disk API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorInfo {
    /// Machine-readable error code, e.g. `DiskNotFoundError`
    pub error: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub message: String,
}

impl fmt::Display for ApiErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Disk API {}: {}\n{}", self.error, self.description, self.message)
    }
}

impl std::error::Error for ApiErrorInfo {}

/// Value of the `Authorization` header for `token`
pub fn authorization(token: &str) -> String {
    format!("OAuth {}", token)
}

/// Join the base URL and an endpoint with exactly one slash
pub fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), endpoint)
}

/// Check a parsed response body for a service-reported error.
///
/// Returns `Err(Error::Api(..))` when the body has an `error` key. The
/// code, description and message all travel with the error. A missing
/// `description` or `message` becomes an empty string.
pub fn classify(body: &serde_json::Value) -> crate::Result<()> {
    let Some(code) = body.get("error") else {
        return Ok(());
    };

    let field = |name: &str| {
        body.get(name)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    };

    Err(Error::Api(ApiErrorInfo {
        error: code
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| code.to_string()),
        description: field("description"),
        message: field("message"),
    }))
}

/// Translate a non-success response into the most specific error available
pub fn failure(response: &ApiResponse) -> Error {
    if let Ok(body) = response.json() {
        if let Err(err) = classify(&body) {
            return err;
        }
    }

    Error::UnexpectedStatus {
        status: response.status,
        body: response.text(),
    }
}
