//! Single-file upload with bounded retry

use crate::api;
use crate::client::DiskClient;
use crate::error::{Error, Result};
use crate::remote_path::RemotePath;
use crate::retry::{self, RetryPolicy};
use crate::transport::Transport;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What to upload and where
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub local_path: PathBuf,
    pub remote_path: String,
    /// Replace an existing remote file
    pub overwrite: bool,
    /// Create missing ancestor directories first
    pub make_dirs: bool,
    pub retry: RetryPolicy,
}

impl UploadRequest {
    pub fn new(local_path: impl Into<PathBuf>, remote_path: impl Into<String>) -> Self {
        Self {
            local_path: local_path.into(),
            remote_path: remote_path.into(),
            overwrite: false,
            make_dirs: false,
            retry: RetryPolicy::default(),
        }
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn make_dirs(mut self, make_dirs: bool) -> Self {
        self.make_dirs = make_dirs;
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.retry.max_retries = max_retries;
        self
    }

    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// One-time upload link issued by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadTarget {
    pub href: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub templated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
}

fn default_method() -> String {
    "PUT".to_string()
}

impl<T: Transport> DiskClient<T> {
    /// Upload a local file to the Disk.
    ///
    /// Fails with [`Error::LocalFileNotFound`] before any network call when
    /// the local path is not a regular file.
    pub async fn upload(&self, request: &UploadRequest) -> Result<()> {
        let local_path = request.local_path.as_path();
        if !is_regular_file(local_path).await {
            return Err(Error::LocalFileNotFound(request.local_path.clone()));
        }
        let remote_path = RemotePath::new(request.remote_path.as_str())?;

        if request.make_dirs {
            self.ensure_directories(remote_path.as_str()).await?;
        }

        let target = self
            .upload_target(remote_path.as_str(), request.overwrite)
            .await?;
        debug!(operation_id = ?target.operation_id, "Received upload link");

        let attempts = request.retry.attempts();
        let mut failures = 0;
        loop {
            let response = self.put_content(&target.href, local_path).await?;

            match response.status {
                status if retry::is_success(status) => {
                    info!(
                        local = %local_path.display(),
                        remote = %remote_path,
                        attempts = failures + 1,
                        "Upload complete"
                    );
                    return Ok(());
                }
                412 => return Err(Error::PreconditionFailed),
                413 => return Err(Error::PayloadTooLarge),
                507 => return Err(Error::InsufficientStorage),
                status => {
                    failures += 1;
                    if failures >= attempts {
                        return Err(Error::RetryExhausted { status });
                    }

                    let delay = request.retry.delay_for(failures);
                    warn!(
                        status,
                        attempt = failures,
                        max_attempts = attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Upload attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Request a one-time upload link for `remote_path`. Not retried.
    pub async fn upload_target(&self, remote_path: &str, overwrite: bool) -> Result<UploadTarget> {
        let response = self.get_upload_link(remote_path, overwrite).await?;
        if !response.is_success() {
            return Err(api::failure(&response));
        }

        let body = response.json()?;
        api::classify(&body)?;

        if body.get("href").and_then(|href| href.as_str()).is_none() {
            return Err(Error::UnexpectedStatus {
                status: response.status,
                body: response.text(),
            });
        }

        Ok(serde_json::from_value(body)?)
    }
}

async fn is_regular_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}
