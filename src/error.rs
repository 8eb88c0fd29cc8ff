//! Error types shared across the client.

use thiserror::Error;

use crate::config::loader::ConfigError;
use crate::http::TransportError;

/// Errors raised while navigating a call chain.
#[derive(Debug, Error)]
pub enum ChainError {
    /// No parameter step of this size follows the segment.
    #[error("Invalid number of arguments given! `{segment}` does not take {given}")]
    InvalidArgumentCount { segment: String, given: usize },

    #[error("`{chain}` has no member `{member}`")]
    UnknownMember { chain: String, member: String },

    /// Only segment accessors are callable, and only before they are called.
    #[error("`{0}` is not callable")]
    NotCallable(String),

    #[error("`{0}` is a leaf, not a segment")]
    NotASegment(String),

    #[error("`{0}` is a segment, not a leaf")]
    NotALeaf(String),
}

/// Errors raised while resolving a leaf's request path.
#[derive(Debug, Error)]
pub enum UrlError {
    #[error(
        "Argument{} \"{}\" expected, but was not given!",
        plural_suffix(.0),
        .0.join(", ")
    )]
    MissingArguments(Vec<String>),

    #[error("Argument \"{token}\" expected to be of type string, but {found} given!")]
    ArgumentType { token: String, found: &'static str },
}

fn plural_suffix(names: &[String]) -> &'static str {
    if names.len() > 1 {
        "s"
    } else {
        ""
    }
}

/// Top-level error for client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Expected a valid URL, got {0}")]
    InvalidEndpoint(String),

    #[error("Unknown API version: {0}")]
    UnknownApiVersion(String),

    #[error("Invalid route description: {0}")]
    RouteDescription(#[source] serde_json::Error),

    #[error("Failed to read route description {path}: {source}")]
    RouteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Url(#[from] UrlError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Authentication input rejected before any request.
    #[error("{0}")]
    Auth(String),
}

impl ClientError {
    /// Short kind label, used by the CLI when printing errors.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::InvalidEndpoint(_)
            | ClientError::UnknownApiVersion(_)
            | ClientError::RouteDescription(_)
            | ClientError::RouteFile { .. }
            | ClientError::Config(_) => "ConfigError",
            ClientError::Chain(_) => "ChainError",
            ClientError::Url(_) => "TypeError",
            ClientError::Transport(TransportError::Status(_)) => "TravisHttpError",
            ClientError::Transport(_) => "TransportError",
            ClientError::Auth(_) => "AuthError",
        }
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ChainError::InvalidArgumentCount {
            segment: "repos".into(),
            given: 3,
        };
        assert!(err.to_string().starts_with("Invalid number of arguments given!"));

        let err = ClientError::InvalidEndpoint("xxx".into());
        assert_eq!(err.to_string(), "Expected a valid URL, got xxx");
        assert_eq!(err.kind(), "ConfigError");
    }

    #[test]
    fn test_wrapped_errors_are_transparent() {
        let err: ClientError = UrlError::MissingArguments(vec!["id".into()]).into();
        assert_eq!(err.to_string(), r#"Argument "id" expected, but was not given!"#);
        assert_eq!(err.kind(), "TypeError");
    }
}
