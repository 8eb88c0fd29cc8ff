//! HTTP transport for API calls.
//!
//! # Responsibilities
//! - Send one request per leaf invocation (verb, path, optional JSON payload)
//! - Resolve paths against the API endpoint
//! - Hold the access token used for authenticated calls
//!
//! # Design Decisions
//! - No retries, no timeouts: every failure goes straight back to the caller
//! - Token stored in an `ArcSwapOption` so `&self` calls can update it
//! - Transport is a trait so chains can run against any backend

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use crate::http::request::{build_headers, RequestId};
use crate::http::response::into_result;
use crate::http::TransportError;
use crate::observability::metrics;

/// Something that can perform API requests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request. `path` is relative to the API endpoint.
    async fn request(
        &self,
        verb: &str,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<Value, TransportError>;

    /// Use `token` for subsequent requests.
    fn set_access_token(&self, token: &str);

    fn access_token(&self) -> Option<String>;
}

/// Transport backed by `reqwest`.
pub struct TravisHttp {
    client: Client,
    endpoint: String,
    headers: BTreeMap<String, String>,
    access_token: ArcSwapOption<String>,
}

impl TravisHttp {
    /// Create a transport for `endpoint` (e.g. `https://api.travis-ci.org`).
    pub fn new(endpoint: impl Into<String>, headers: BTreeMap<String, String>) -> Self {
        Self::with_client(Client::new(), endpoint, headers)
    }

    pub fn with_client(
        client: Client,
        endpoint: impl Into<String>,
        headers: BTreeMap<String, String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            headers,
            access_token: ArcSwapOption::empty(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Configured default headers (without per-request additions).
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }
}

#[async_trait]
impl Transport for TravisHttp {
    async fn request(
        &self,
        verb: &str,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<Value, TransportError> {
        let url = format!("{}{}", self.endpoint, path);
        let request_id = RequestId::new();
        let token = self.access_token();
        let headers = build_headers(&self.headers, token.as_deref(), &request_id)?;

        let method = Method::from_bytes(verb.to_uppercase().as_bytes())
            .map_err(|_| TransportError::InvalidMethod(verb.to_string()))?;

        tracing::debug!(
            request_id = %request_id,
            method = %method,
            url = %url,
            has_payload = payload.is_some(),
            "Sending API request"
        );

        let mut builder = self.client.request(method.clone(), &url).headers(headers);
        if let Some(body) = payload {
            builder = builder.json(body);
        }

        let start = Instant::now();
        let response = match builder.send().await {
            Ok(response) => response,
            Err(source) => {
                metrics::record_request(method.as_str(), 0, start);
                tracing::warn!(
                    request_id = %request_id,
                    url = %url,
                    error = %source,
                    "API request failed"
                );
                return Err(TransportError::Network { url, source });
            }
        };

        let status = response.status();
        let response_headers = response.headers().clone();
        let text = response
            .text()
            .await
            .map_err(|source| TransportError::Network {
                url: url.clone(),
                source,
            })?;

        metrics::record_request(method.as_str(), status.as_u16(), start);
        tracing::debug!(
            request_id = %request_id,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "API response received"
        );

        into_result(status, &response_headers, &text, &url).map_err(TransportError::from)
    }

    fn set_access_token(&self, token: &str) {
        self.access_token.store(Some(Arc::new(token.to_string())));
    }

    fn access_token(&self) -> Option<String> {
        self.access_token.load_full().map(|token| String::clone(&token))
    }
}

impl std::fmt::Debug for TravisHttp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TravisHttp")
            .field("endpoint", &self.endpoint)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("authenticated", &self.access_token.load().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_roundtrip() {
        let http = TravisHttp::new("https://api.travis-ci.org", BTreeMap::new());
        assert!(http.access_token().is_none());

        http.set_access_token("secret");
        assert_eq!(http.access_token().as_deref(), Some("secret"));
    }

    #[test]
    fn test_debug_hides_token() {
        let http = TravisHttp::new("https://api.travis-ci.org", BTreeMap::new());
        http.set_access_token("secret");
        let debug = format!("{:?}", http);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("authenticated: true"));
    }

    #[tokio::test]
    async fn test_invalid_header_fails_before_sending() {
        let headers = BTreeMap::from([("bad header".to_string(), "x".to_string())]);
        let http = TravisHttp::new("http://127.0.0.1:9", headers);
        let err = http.request("GET", "/users", None).await.unwrap_err();
        assert!(matches!(err, TransportError::InvalidHeader { .. }));
    }
}
