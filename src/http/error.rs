//! Transport errors.

use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// A non-success response from the API.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpError {
    /// Response body text (trimmed), or the status reason when the body is empty.
    pub message: String,
    pub code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Value,
    /// Fully resolved request URL.
    pub url: String,
}

impl HttpError {
    pub fn new(message: impl Into<String>, code: u16) -> Self {
        Self {
            message: message.into(),
            code,
            ..Self::default()
        }
    }

    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

impl Default for HttpError {
    fn default() -> Self {
        Self {
            message: String::new(),
            code: 500,
            headers: BTreeMap::new(),
            body: Value::Object(Default::default()),
            url: String::new(),
        }
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP {}: {}", self.code, self.message)
    }
}

impl std::error::Error for HttpError {}

/// Errors returned by a [`Transport`](super::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The API answered with a status other than 200.
    #[error(transparent)]
    Status(#[from] HttpError),

    /// The request never produced a response.
    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// A configured header could not be sent.
    #[error("Invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },
}

impl TransportError {
    /// HTTP status of a failed response, if there was one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TransportError::Status(err) => Some(err.code),
            _ => None,
        }
    }
}
