//! Authentication flows.
//!
//! An access token is checked against `GET /users` before being stored in the
//! transport. A GitHub token is first exchanged through `POST /auth/github`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::TravisClient;
use crate::error::{ClientError, ClientResult};

/// Credentials passed to [`TravisClient::authenticate`].
///
/// Fields other than the two tokens are forwarded untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AuthMessage {
    pub fn access_token(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
            ..Self::default()
        }
    }

    pub fn github_token(token: impl Into<String>) -> Self {
        Self {
            github_token: Some(token.into()),
            ..Self::default()
        }
    }

    fn to_payload(&self) -> ClientResult<Value> {
        serde_json::to_value(self).map_err(|e| ClientError::Auth(e.to_string()))
    }
}

impl TravisClient {
    /// Authenticate with whichever token the message carries.
    pub async fn authenticate(&self, msg: AuthMessage) -> ClientResult<AuthMessage> {
        if msg.access_token.is_some() {
            self.authenticate_access_token(msg).await
        } else if msg.github_token.is_some() {
            self.authenticate_github_token(msg).await
        } else {
            Err(ClientError::Auth("Unexpected arguments!".into()))
        }
    }

    /// Verify an access token and store it for later requests.
    pub async fn authenticate_access_token(&self, msg: AuthMessage) -> ClientResult<AuthMessage> {
        let token = match msg.access_token.as_deref() {
            Some(token) if !token.is_empty() => token.to_string(),
            _ => return Err(ClientError::Auth("Invalid access_token".into())),
        };

        self.segment("users")?
            .leaf("get")?
            .invoke(Some(msg.to_payload()?))
            .await?;

        self.transport.set_access_token(&token);
        tracing::info!(api_url = %self.api_url, "Authenticated");

        Ok(msg)
    }

    /// Exchange a GitHub token for an access token, then authenticate with it.
    pub async fn authenticate_github_token(&self, msg: AuthMessage) -> ClientResult<AuthMessage> {
        match msg.github_token.as_deref() {
            Some(token) if !token.is_empty() => {}
            _ => return Err(ClientError::Auth("Invalid github_token".into())),
        }

        let response = self
            .segment("auth")?
            .segment("github")?
            .leaf("post")?
            .invoke(Some(msg.to_payload()?))
            .await?;

        let exchanged: AuthMessage = serde_json::from_value(response)
            .map_err(|e| {
                ClientError::Auth(format!("Unexpected response from /auth/github: {}", e))
            })?;

        tracing::debug!("GitHub token exchanged");
        self.authenticate_access_token(exchanged).await
    }

    pub fn is_authenticated(&self) -> bool {
        self.transport.access_token().is_some()
    }
}
