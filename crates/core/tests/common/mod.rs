//! Scripted in-memory transport shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use diskpush_core::{ApiRequest, ApiResponse, DiskClient, RequestBody, Result, Transport};
use std::collections::VecDeque;
use std::sync::Mutex;

pub const BASE_URL: &str = "https://disk.test/v1/disk";
pub const UPLOAD_HREF: &str = "https://uploader.disk.test/upload-target/42";

/// A request as the service saw it
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub url: String,
    pub path: Option<String>,
    pub overwrite: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Vec<u8>>,
}

impl Recorded {
    /// `"GET resources disk:/a"`-style summary
    pub fn summary(&self) -> String {
        let endpoint = self
            .url
            .strip_prefix(BASE_URL)
            .map(|rest| rest.trim_start_matches('/').to_string())
            .unwrap_or_else(|| "content".to_string());

        match &self.path {
            Some(path) => format!("{} {} {}", self.method, endpoint, path),
            None => format!("{} {}", self.method, endpoint),
        }
    }
}

/// Replays canned responses in order and records every request
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<ApiResponse>>,
    requests: Mutex<Vec<Recorded>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<ApiResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn summaries(&self) -> Vec<String> {
        self.requests().iter().map(Recorded::summary).collect()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let body = match &request.body {
            Some(RequestBody::File(path)) => Some(std::fs::read(path)?),
            None => None,
        };

        self.requests.lock().unwrap().push(Recorded {
            method: request.method.to_string(),
            url: request.url.clone(),
            path: request.query_value("path").map(str::to_string),
            overwrite: request.query_value("overwrite").map(str::to_string),
            authorization: request.header_value("Authorization").map(str::to_string),
            content_type: request.header_value("Content-Type").map(str::to_string),
            body,
        });

        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request: {} {}", request.method, request.url));

        Ok(response)
    }
}

pub fn client(responses: Vec<ApiResponse>) -> DiskClient<ScriptedTransport> {
    DiskClient::with_transport("test-token", ScriptedTransport::new(responses))
        .unwrap()
        .with_base_url(BASE_URL)
}

pub fn status(code: u16) -> ApiResponse {
    ApiResponse::new(code, Vec::new())
}

pub fn found() -> ApiResponse {
    ApiResponse::new(200, br#"{"type":"dir","name":"x"}"#.to_vec())
}

pub fn not_found() -> ApiResponse {
    api_error(
        404,
        "DiskNotFoundError",
        "Resource not found.",
        "Не удалось найти запрошенный ресурс.",
    )
}

pub fn created() -> ApiResponse {
    ApiResponse::new(201, br#"{"href":"https://disk.test/v1/disk/resources?path=x","method":"GET","templated":false}"#.to_vec())
}

pub fn upload_link() -> ApiResponse {
    ApiResponse::new(
        200,
        format!(
            r#"{{"operation_id":"op-1","href":"{}","method":"PUT","templated":false}}"#,
            UPLOAD_HREF
        )
        .into_bytes(),
    )
}

pub fn api_error(code: u16, error: &str, description: &str, message: &str) -> ApiResponse {
    let body = serde_json::json!({
        "error": error,
        "description": description,
        "message": message,
    });
    ApiResponse::new(code, body.to_string().into_bytes())
}
