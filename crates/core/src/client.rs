//! Disk REST API client

use crate::api::{self, RESOURCES_ENDPOINT, UPLOAD_ENDPOINT};
use crate::config::ConfigFile;
use crate::error::{Error, Result};
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, RequestBody, Transport};
use http::Method;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Client for one Disk account.
///
/// The token lives on the client, so clients for different accounts can be
/// used side by side.
pub struct DiskClient<T = HttpTransport> {
    token: String,
    base_url: String,
    transport: T,
}

impl DiskClient<HttpTransport> {
    /// Create a client for `token` with the default endpoint and timeout
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_transport(token, HttpTransport::with_default_timeout()?)
    }

    /// Create a client from the loaded configuration file
    pub fn from_config(config: &ConfigFile) -> Result<Self> {
        let token = config.auth.token.clone().ok_or_else(|| {
            Error::Config("No access token configured (run 'diskpush init')".to_string())
        })?;
        Self::from_config_with_token(config, token)
    }

    /// Like [`DiskClient::from_config`], with a token from elsewhere
    pub fn from_config_with_token(config: &ConfigFile, token: impl Into<String>) -> Result<Self> {
        let transport = HttpTransport::new(Duration::from_secs(config.api.timeout))?;

        Ok(Self::with_transport(token, transport)?.with_base_url(config.api.base_url.clone()))
    }
}

impl<T: Transport> DiskClient<T> {
    /// Create a client over a custom transport
    pub fn with_transport(token: impl Into<String>, transport: T) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::InvalidInput("Access token cannot be empty".to_string()));
        }

        Ok(Self {
            token,
            base_url: api::DEFAULT_BASE_URL.to_string(),
            transport,
        })
    }

    /// Point the client at another API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET metadata for the resource at `path`
    pub async fn get_resource(&self, path: &str) -> Result<ApiResponse> {
        let request = self
            .request(Method::GET, RESOURCES_ENDPOINT)
            .query("path", path);
        self.send(request).await
    }

    /// PUT a directory at exactly `path`; parents are not created
    pub async fn put_resource(&self, path: &str) -> Result<ApiResponse> {
        let request = self
            .request(Method::PUT, RESOURCES_ENDPOINT)
            .query("path", path);
        self.send(request).await
    }

    /// GET a one-time upload link for `path`
    pub async fn get_upload_link(&self, path: &str, overwrite: bool) -> Result<ApiResponse> {
        let request = self
            .request(Method::GET, UPLOAD_ENDPOINT)
            .query("path", path)
            .query("overwrite", overwrite.to_string());
        self.send(request).await
    }

    /// PUT the contents of `local_path` to an upload link
    pub async fn put_content(&self, href: &str, local_path: &Path) -> Result<ApiResponse> {
        let request = ApiRequest::new(Method::PUT, href)
            .header("Authorization", api::authorization(&self.token))
            .header("Content-Type", api::OCTET_STREAM)
            .body(RequestBody::File(local_path.to_path_buf()));
        self.send(request).await
    }

    fn request(&self, method: Method, endpoint: &str) -> ApiRequest {
        ApiRequest::new(method, api::endpoint_url(&self.base_url, endpoint))
            .header("Authorization", api::authorization(&self.token))
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let method = request.method.clone();
        let url = request.url.clone();
        let path = request.query_value("path").map(str::to_string);

        let response = self.transport.send(request).await?;

        debug!(
            %method,
            %url,
            path = path.as_deref().unwrap_or(""),
            status = response.status,
            "Disk API call"
        );

        Ok(response)
    }
}
