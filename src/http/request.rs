//! Outgoing request preparation.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) per call
//! - Merge configured default headers with the API's `Accept` header
//! - Attach the `Authorization` token once the client is authenticated
//!
//! # Design Decisions
//! - Default headers are copied per request, never mutated
//! - Invalid configured headers surface as errors, not silent drops

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::http::TransportError;

/// Request ID header name.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Media type requested from the API.
pub const TRAVIS_ACCEPT: &str = "application/vnd.travis-ci.2+json, */*; q=0.01";

/// Unique identifier of one outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Headers for one request.
pub fn build_headers(
    defaults: &BTreeMap<String, String>,
    access_token: Option<&str>,
    request_id: &RequestId,
) -> Result<HeaderMap, TransportError> {
    let mut headers = HeaderMap::new();

    for (name, value) in defaults {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| TransportError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| TransportError::InvalidHeader {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        headers.insert(header_name, header_value);
    }

    headers.insert(ACCEPT, HeaderValue::from_static(TRAVIS_ACCEPT));

    if let Some(token) = access_token {
        let value = HeaderValue::from_str(&format!("token {}", token)).map_err(|e| {
            TransportError::InvalidHeader {
                name: AUTHORIZATION.to_string(),
                reason: e.to_string(),
            }
        })?;
        headers.insert(AUTHORIZATION, value);
    }

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        headers.insert(X_REQUEST_ID, value);
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_are_unique() {
        assert_ne!(RequestId::new(), RequestId::new());
        assert_eq!(RequestId::new().as_str().len(), 36);
    }

    #[test]
    fn test_accept_overrides_defaults() {
        let defaults = BTreeMap::from([
            ("Accept".to_string(), "text/plain".to_string()),
            ("User-Agent".to_string(), "travis-client/0.1".to_string()),
        ]);
        let headers = build_headers(&defaults, None, &RequestId::new()).unwrap();

        assert_eq!(headers[ACCEPT], TRAVIS_ACCEPT);
        assert_eq!(headers["user-agent"], "travis-client/0.1");
        assert!(headers.get(AUTHORIZATION).is_none());
        assert!(headers.get(X_REQUEST_ID).is_some());
    }

    #[test]
    fn test_authorization_token() {
        let headers = build_headers(&BTreeMap::new(), Some("abc"), &RequestId::new()).unwrap();
        assert_eq!(headers[AUTHORIZATION], "token abc");
    }

    #[test]
    fn test_invalid_header_name() {
        let defaults = BTreeMap::from([("bad header".to_string(), "x".to_string())]);
        let err = build_headers(&defaults, None, &RequestId::new()).unwrap_err();
        assert!(matches!(err, TransportError::InvalidHeader { name, .. } if name == "bad header"));
    }
}
