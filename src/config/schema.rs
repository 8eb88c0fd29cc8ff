//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::api::DEFAULT_API_VERSION;

/// Root configuration for a client.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Use the travis-ci.com API instead of travis-ci.org.
    pub pro: bool,

    /// Base URL of an enterprise installation (e.g. "https://travis.example.com").
    pub enterprise: Option<String>,

    /// Bundled route description version.
    pub version: String,

    /// Route description file; overrides `version` when set.
    pub routes_path: Option<PathBuf>,

    /// Headers sent with every request.
    pub headers: BTreeMap<String, String>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            pro: false,
            enterprise: None,
            version: DEFAULT_API_VERSION.to_string(),
            routes_path: None,
            headers: BTreeMap::new(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn pro() -> Self {
        Self {
            pro: true,
            ..Self::default()
        }
    }

    pub fn enterprise(url: impl Into<String>) -> Self {
        Self {
            enterprise: Some(url.into()),
            ..Self::default()
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.version, "2.0.0");
        assert!(!config.pro);
    }

    #[test]
    fn test_full_config() {
        let config: ClientConfig = toml::from_str(
            r#"
            pro = true
            version = "2.0.0"
            routes_path = "api/custom.json"

            [headers]
            User-Agent = "travis-client/0.1"

            [observability]
            log_level = "debug"
            "#,
        )
        .unwrap();

        assert!(config.pro);
        assert_eq!(config.routes_path, Some(PathBuf::from("api/custom.json")));
        assert_eq!(config.headers["User-Agent"], "travis-client/0.1");
        assert_eq!(config.observability.log_level, "debug");
    }
}
