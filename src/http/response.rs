//! Response decoding.
//!
//! # Responsibilities
//! - Decode response bodies into JSON values
//! - Turn non-success responses into [`HttpError`]s with full diagnostics
//!
//! # Design Decisions
//! - Bodies that are not JSON are kept as a JSON string
//! - Only 200 counts as success

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::http::HttpError;

/// Decode a response body. Empty bodies decode to `null`.
pub fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Headers as a plain name → value map. Non-UTF-8 values are dropped.
pub fn header_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

/// Error message for a failed response.
pub fn error_message(body: &Value, status: StatusCode) -> String {
    match body {
        Value::Null => status.canonical_reason().unwrap_or_default().to_string(),
        Value::String(text) if text.trim().is_empty() => {
            status.canonical_reason().unwrap_or_default().to_string()
        }
        Value::String(text) => text.trim().to_string(),
        other => other.to_string(),
    }
}

/// Map a response to its body, or to an [`HttpError`] for any status but 200.
pub fn into_result(
    status: StatusCode,
    headers: &HeaderMap,
    text: &str,
    url: &str,
) -> Result<Value, HttpError> {
    let body = decode_body(text);

    if status != StatusCode::OK {
        return Err(HttpError::new(error_message(&body, status), status.as_u16())
            .with_headers(header_map(headers))
            .with_body(body)
            .with_url(url));
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(r#"{"user":{"id":1}}"#), json!({"user": {"id": 1}}));
        assert_eq!(decode_body("plain text"), json!("plain text"));
        assert_eq!(decode_body("  "), Value::Null);
    }

    #[test]
    fn test_success() {
        let body =
            into_result(StatusCode::OK, &HeaderMap::new(), r#"[1,2]"#, "http://x/y").unwrap();
        assert_eq!(body, json!([1, 2]));
    }

    #[test]
    fn test_non_200_is_error() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json".parse().unwrap());

        let err = into_result(
            StatusCode::FORBIDDEN,
            &headers,
            r#"{"error":"denied"}"#,
            "https://api.travis-ci.org/users",
        )
        .unwrap_err();

        assert_eq!(err.code, 403);
        assert_eq!(err.message, r#"{"error":"denied"}"#);
        assert_eq!(err.body, json!({"error": "denied"}));
        assert_eq!(err.url, "https://api.travis-ci.org/users");
        assert_eq!(err.headers["content-type"], "application/json");
    }

    #[test]
    fn test_created_is_not_success() {
        assert!(into_result(StatusCode::CREATED, &HeaderMap::new(), "", "u").is_err());
    }

    #[test]
    fn test_message_falls_back_to_reason() {
        let err = into_result(StatusCode::NOT_FOUND, &HeaderMap::new(), "", "u").unwrap_err();
        assert_eq!(err.message, "Not Found");

        let err = into_result(StatusCode::BAD_GATEWAY, &HeaderMap::new(), " upstream down \n", "u")
            .unwrap_err();
        assert_eq!(err.message, "upstream down");
    }
}
