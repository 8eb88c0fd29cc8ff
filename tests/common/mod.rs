//! Shared utilities for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use travis_client::api::{ApiSection, RouteEntry};
use travis_client::{Transport, TransportError};

/// A request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Start a mock backend on an ephemeral port that answers every request with
/// `status` and `body`, recording what it received.
pub async fn start_mock_backend(
    status: &'static str,
    body: &'static str,
) -> (SocketAddr, Arc<Mutex<Vec<CapturedRequest>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captured = Arc::new(Mutex::new(Vec::new()));
    let log = captured.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let log = log.clone();
                    tokio::spawn(async move {
                        if let Some(request) = read_request(&mut socket).await {
                            log.lock().unwrap().push(request);
                        }
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nX-Mock: yes\r\n\
                             Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, captured)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split(' ');
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();
    Some(CapturedRequest {
        method,
        path,
        headers,
        body,
    })
}

/// One call seen by [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub verb: String,
    pub path: String,
    pub payload: Option<Value>,
}

/// Transport that records calls and answers `{}`.
#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<Call>>,
    token: Mutex<Option<String>>,
}

impl RecordingTransport {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Call {
        self.calls.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn request(
        &self,
        verb: &str,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<Value, TransportError> {
        self.calls.lock().unwrap().push(Call {
            verb: verb.to_string(),
            path: path.to_string(),
            payload: payload.cloned(),
        });
        Ok(json!({}))
    }

    fn set_access_token(&self, token: &str) {
        *self.token.lock().unwrap() = Some(token.to_string());
    }

    fn access_token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }
}

/// A single-section route description.
pub fn description(routes: &[(&str, &str)]) -> Vec<ApiSection> {
    vec![ApiSection {
        name: Some("Test".to_string()),
        prefix: None,
        routes: routes
            .iter()
            .map(|(uri, verb)| RouteEntry::new(*uri, *verb))
            .collect(),
    }]
}

/// Write a route description to a temp file and return its path.
pub fn write_routes(name: &str, routes: &[(&str, &str)]) -> std::path::PathBuf {
    let file = format!("travis-client-{}-{}.json", name, std::process::id());
    let path = std::env::temp_dir().join(file);
    std::fs::write(&path, serde_json::to_string(&description(routes)).unwrap()).unwrap();
    path
}
