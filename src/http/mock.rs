//! In-memory transport for unit tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::http::{Transport, TransportError};

/// One recorded request.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub verb: String,
    pub path: String,
    pub payload: Option<Value>,
}

/// Records every request and answers from a queue (`{}` when empty).
#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<Call>>,
    responses: Mutex<VecDeque<Result<Value, TransportError>>>,
    token: Mutex<Option<String>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, response: Result<Value, TransportError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Option<Call> {
        self.calls.lock().unwrap().last().cloned()
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
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Value::Object(Default::default())))
    }

    fn set_access_token(&self, token: &str) {
        *self.token.lock().unwrap() = Some(token.to_string());
    }

    fn access_token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }
}
