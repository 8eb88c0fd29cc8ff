//! Route descriptions.
//!
//! # Data Flow
//! ```text
//! bundled api/v<version>/routes.json  or  routes file on disk
//!     → serde_json (deserialize)
//!     → RouteDescription (Vec<ApiSection>, immutable)
//!     → routing::RouteTable::build
//! ```
//!
//! # Design Decisions
//! - Bundled versions are embedded at compile time, so a client never
//!   depends on the working directory
//! - Only the shape needed to compile the tree is validated

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ClientError;

/// API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "2.0.0";

const ROUTES_V2_0_0: &str = include_str!("../../api/v2.0.0/routes.json");

/// Ordered list of endpoint sections.
pub type RouteDescription = Vec<ApiSection>;

/// A group of related endpoints, as published by the API's `/endpoints`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    pub routes: Vec<RouteEntry>,
}

/// One endpoint: URI template plus HTTP verb.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteEntry {
    pub uri: String,
    pub verb: String,

    /// Access scopes. Carried along, never interpreted.
    #[serde(default)]
    pub scope: Vec<String>,
}

impl RouteEntry {
    pub fn new(uri: impl Into<String>, verb: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            verb: verb.into(),
            scope: Vec::new(),
        }
    }
}

/// Versions with a bundled route description.
pub fn bundled_versions() -> &'static [&'static str] {
    &["2.0.0"]
}

/// Load the bundled route description for `version`.
pub fn load_api(version: &str) -> Result<RouteDescription, ClientError> {
    let raw = match version {
        "2.0.0" => ROUTES_V2_0_0,
        other => return Err(ClientError::UnknownApiVersion(other.to_string())),
    };
    parse_description(raw)
}

/// Load a route description from a JSON file.
pub fn load_api_file(path: &Path) -> Result<RouteDescription, ClientError> {
    let raw = fs::read_to_string(path).map_err(|source| ClientError::RouteFile {
        path: path.display().to_string(),
        source,
    })?;
    parse_description(&raw)
}

/// Parse a route description from JSON text.
pub fn parse_description(raw: &str) -> Result<RouteDescription, ClientError> {
    serde_json::from_str(raw).map_err(ClientError::RouteDescription)
}

/// Write a route description as pretty-printed JSON.
pub fn save_api_file(path: &Path, description: &[ApiSection]) -> Result<(), ClientError> {
    let raw = serde_json::to_string_pretty(description).map_err(ClientError::RouteDescription)?;
    fs::write(path, raw + "\n").map_err(|source| ClientError::RouteFile {
        path: path.display().to_string(),
        source,
    })
}
