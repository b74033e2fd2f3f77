//! `HttpTransport` against a local HTTP/1.1 server

use diskpush_core::{ApiRequest, DiskClient, Error, HttpTransport, RetryPolicy, Transport, UploadRequest};
use http::Method;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// A request as it arrived on the socket
#[derive(Debug)]
struct WireRequest {
    request_line: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl WireRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

async fn read_request(stream: &mut TcpStream) -> WireRequest {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 8192];

    let head_end = loop {
        if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        let read = stream.read(&mut chunk).await.unwrap();
        assert!(read > 0, "connection closed before the request head");
        buffer.extend_from_slice(&chunk[..read]);
    };

    let head = String::from_utf8(buffer[..head_end].to_vec()).unwrap();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .map(|(_, value)| value.parse::<usize>().unwrap())
        .unwrap_or(0);

    let mut body = buffer[head_end + 4..].to_vec();
    while body.len() < content_length {
        let read = stream.read(&mut chunk).await.unwrap();
        assert!(read > 0, "connection closed before the full body");
        body.extend_from_slice(&chunk[..read]);
    }

    WireRequest {
        request_line,
        headers,
        body,
    }
}

/// Serve one connection per reply and hand back what was received.
///
/// `replies` gets the server address so upload links can point back at it.
async fn serve<F>(replies: F) -> (String, JoinHandle<Vec<WireRequest>>)
where
    F: FnOnce(&str) -> Vec<(u16, String)>,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    let replies = replies(&address);

    let handle = tokio::spawn(async move {
        let mut received = Vec::new();
        for (status, body) in replies {
            let (mut stream, _) = listener.accept().await.unwrap();
            received.push(read_request(&mut stream).await);

            let response = format!(
                "HTTP/1.1 {} Reply\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        }
        received
    });

    (address, handle)
}

fn upload_link(address: &str) -> (u16, String) {
    (
        200,
        format!(
            r#"{{"operation_id":"op-1","href":"{}/upload-target/42","method":"PUT","templated":false}}"#,
            address
        ),
    )
}

/// Non-repeating content spanning several read chunks
fn payload() -> Vec<u8> {
    (0..100_000u32).map(|i| (i % 251) as u8).collect()
}

fn local_file(content: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}

fn client(address: &str) -> DiskClient {
    DiskClient::with_transport(
        "secret-token",
        HttpTransport::new(Duration::from_secs(10)).unwrap(),
    )
    .unwrap()
    .with_base_url(format!("{}/v1/disk", address))
}

#[tokio::test]
async fn test_upload_wire_format() {
    let content = payload();
    let file = local_file(&content);
    let (address, server) =
        serve(|address| vec![upload_link(address), (201, String::new())]).await;

    let request = UploadRequest::new(file.path(), "disk:/docs/q3 report.bin").overwrite(true);
    client(&address).upload(&request).await.unwrap();

    let received = server.await.unwrap();
    assert_eq!(received.len(), 2);

    let link = &received[0];
    assert_eq!(
        link.request_line,
        "GET /v1/disk/resources/upload?path=disk%3A%2Fdocs%2Fq3+report.bin&overwrite=true HTTP/1.1"
    );
    assert_eq!(link.header("authorization"), Some("OAuth secret-token"));
    assert!(link.body.is_empty());

    let put = &received[1];
    assert_eq!(put.request_line, "PUT /upload-target/42 HTTP/1.1");
    assert_eq!(put.header("authorization"), Some("OAuth secret-token"));
    assert_eq!(put.header("content-type"), Some("application/octet-stream"));
    assert_eq!(
        put.header("content-length"),
        Some(content.len().to_string().as_str())
    );
    assert_eq!(put.body, content);
}

#[tokio::test]
async fn test_every_attempt_sends_the_whole_file() {
    let content = payload();
    let file = local_file(&content);
    let (address, server) = serve(|address| {
        vec![
            upload_link(address),
            (500, String::new()),
            (503, String::new()),
            (201, String::new()),
        ]
    })
    .await;

    let policy = RetryPolicy::with_max_retries(3).with_delay(Duration::from_millis(10));
    let request = UploadRequest::new(file.path(), "disk:/q3.bin").retry_policy(policy);
    client(&address).upload(&request).await.unwrap();

    let received = server.await.unwrap();
    assert_eq!(received.len(), 4);
    for put in &received[1..] {
        assert_eq!(put.request_line, "PUT /upload-target/42 HTTP/1.1");
        assert_eq!(put.body, content);
    }
}

#[tokio::test]
async fn test_error_body_over_the_wire() {
    let (address, server) = serve(|_| {
        vec![(
            409,
            r#"{"error":"DiskPathPointsToExistentDirectoryError","description":"exists","message":"exists"}"#
                .to_string(),
        )]
    })
    .await;

    let err = client(&address).create_directory("disk:/a").await.unwrap_err();

    assert!(matches!(err, Error::Api(ref info) if info.error == "DiskPathPointsToExistentDirectoryError"));
    let received = server.await.unwrap();
    assert_eq!(
        received[0].request_line,
        "PUT /v1/disk/resources?path=disk%3A%2Fa HTTP/1.1"
    );
    assert_eq!(received[0].header("authorization"), Some("OAuth secret-token"));
}

#[tokio::test]
async fn test_stalled_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/v1/disk/resources", listener.local_addr().unwrap());

    // Accept the connection and never answer
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
        drop(stream);
    });

    let transport = HttpTransport::new(Duration::from_millis(200)).unwrap();
    let result = transport
        .send(ApiRequest::new(Method::GET, url).query("path", "disk:/a"))
        .await;

    assert!(matches!(result, Err(Error::Timeout)));
    server.abort();
}
