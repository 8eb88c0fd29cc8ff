//! API client.
//!
//! # Data Flow
//! ```text
//! ClientConfig
//!     → resolve_api_url (org / com / enterprise)
//!     → api::load_api / load_api_file (route description)
//!     → RouteTable::build → SegmentTree::compile → Node::walk
//!     → TravisClient { root node, transport }
//!     → root() → Chain → ... → Leaf::invoke
//! ```
//!
//! # Design Decisions
//! - The object graph is compiled once per client and shared by every chain
//! - Transport is injectable; the default is `TravisHttp`

pub mod auth;

use std::sync::Arc;

use crate::api::{load_api, load_api_file, RouteDescription};
use crate::chain::{signature, Accessor, Chain, Node};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::{Transport, TravisHttp};
use crate::routing::{RouteRecord, RouteTable, SegmentTree};

pub use auth::AuthMessage;

pub const ORG_API_URL: &str = "https://api.travis-ci.org";
pub const PRO_API_URL: &str = "https://api.travis-ci.com";

/// API base URL for a configuration.
pub fn resolve_api_url(config: &ClientConfig) -> ClientResult<String> {
    let Some(enterprise) = config.enterprise.as_deref() else {
        let url = if config.pro { PRO_API_URL } else { ORG_API_URL };
        return Ok(url.to_string());
    };

    let invalid = || ClientError::InvalidEndpoint(enterprise.to_string());
    let parsed = url::Url::parse(enterprise).map_err(|_| invalid())?;
    let host = parsed.host_str().ok_or_else(invalid)?;

    Ok(match parsed.port() {
        Some(port) => format!("{}://{}:{}/api", parsed.scheme(), host, port),
        None => format!("{}://{}/api", parsed.scheme(), host),
    })
}

/// A compiled client for one API version.
pub struct TravisClient {
    api_url: String,
    pro: bool,
    enterprise: bool,
    transport: Arc<dyn Transport>,
    tree: SegmentTree,
    root: Arc<Node>,
}

impl TravisClient {
    /// Build a client talking HTTP to the configured endpoint.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let api_url = resolve_api_url(&config)?;
        let transport = Arc::new(TravisHttp::new(api_url, config.headers.clone()));
        Self::with_transport(config, transport)
    }

    /// Build a client on top of an existing transport.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> ClientResult<Self> {
        let api_url = resolve_api_url(&config)?;
        let description = load_description(&config)?;

        let table = RouteTable::build(&description);
        let tree = SegmentTree::compile(&table);
        let root = Arc::new(Node::walk("root", &tree));

        tracing::info!(
            api_url = %api_url,
            routes = table.record_count(),
            members = root.len(),
            "Client compiled"
        );

        Ok(Self {
            api_url,
            pro: config.pro,
            enterprise: config.enterprise.is_some(),
            transport,
            tree,
            root,
        })
    }

    /// Start a new chain. Root chains never carry arguments.
    pub fn root(&self) -> Chain {
        Chain::root(Arc::clone(&self.transport), Arc::clone(&self.root))
    }

    /// Resolve a top-level member.
    pub fn get(&self, name: &str) -> ClientResult<Accessor> {
        Ok(self.root().get(name)?)
    }

    /// Resolve a top-level segment.
    pub fn segment(&self, name: &str) -> ClientResult<Chain> {
        Ok(self.root().segment(name)?)
    }

    /// Every endpoint reachable through a chain, in registration order.
    ///
    /// Routes whose leaf is shadowed by an earlier member of the same name are
    /// left out.
    pub fn routes(&self) -> Vec<Arc<RouteRecord>> {
        let root = self.root();
        self.tree
            .leaves()
            .into_iter()
            .filter(|record| match root.locate(record) {
                Ok(leaf) => std::ptr::eq(leaf.record(), record.as_ref()),
                Err(_) => false,
            })
            .collect()
    }

    /// Fetch the live route description from `GET /endpoints`.
    pub async fn fetch_description(&self) -> ClientResult<RouteDescription> {
        let endpoints = self.segment("endpoints")?.leaf("get")?.invoke(None).await?;
        serde_json::from_value(endpoints).map_err(ClientError::RouteDescription)
    }

    /// Chain signatures of every reachable endpoint.
    pub fn signatures(&self) -> Vec<String> {
        self.routes().iter().map(|record| signature(record)).collect()
    }

    pub fn is_pro(&self) -> bool {
        self.pro
    }

    pub fn is_enterprise(&self) -> bool {
        self.enterprise
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }
}

impl std::fmt::Debug for TravisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TravisClient")
            .field("api_url", &self.api_url)
            .field("pro", &self.pro)
            .field("enterprise", &self.enterprise)
            .finish_non_exhaustive()
    }
}

fn load_description(config: &ClientConfig) -> ClientResult<RouteDescription> {
    match &config.routes_path {
        Some(path) => load_api_file(path),
        None => load_api(&config.version),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::mock::RecordingTransport;
    use serde_json::json;

    fn client() -> (Arc<RecordingTransport>, TravisClient) {
        let transport = Arc::new(RecordingTransport::new());
        let client =
            TravisClient::with_transport(ClientConfig::default(), transport.clone()).unwrap();
        (transport, client)
    }

    #[test]
    fn test_api_urls() {
        assert_eq!(resolve_api_url(&ClientConfig::default()).unwrap(), ORG_API_URL);
        assert_eq!(resolve_api_url(&ClientConfig::pro()).unwrap(), PRO_API_URL);
        assert_eq!(
            resolve_api_url(&ClientConfig::enterprise("https://travis.example.com/some/path"))
                .unwrap(),
            "https://travis.example.com/api"
        );
        assert_eq!(
            resolve_api_url(&ClientConfig::enterprise("http://localhost:8080")).unwrap(),
            "http://localhost:8080/api"
        );
    }

    #[test]
    fn test_invalid_enterprise_url() {
        let err = TravisClient::new(ClientConfig::enterprise("xxx")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidEndpoint(_)));
        assert_eq!(err.to_string(), "Expected a valid URL, got xxx");
    }

    #[test]
    fn test_flags() {
        let client = TravisClient::new(ClientConfig::pro()).unwrap();
        assert!(client.is_pro());
        assert!(!client.is_enterprise());

        let config = ClientConfig::enterprise("https://travis.example.com");
        let client = TravisClient::new(config).unwrap();
        assert!(client.is_enterprise());
        assert_eq!(client.api_url(), "https://travis.example.com/api");
    }

    #[test]
    fn test_unknown_version() {
        let config = ClientConfig {
            version: "9.9.9".into(),
            ..ClientConfig::default()
        };
        assert!(matches!(
            TravisClient::new(config),
            Err(ClientError::UnknownApiVersion(_))
        ));
    }

    #[tokio::test]
    async fn test_bundled_routes_are_chainable() {
        let (transport, client) = client();

        client
            .segment("repos")
            .unwrap()
            .call(["travis-ci", "travis-web"])
            .unwrap()
            .segment("builds")
            .unwrap()
            .leaf("get")
            .unwrap()
            .invoke(None)
            .await
            .unwrap();
        assert_eq!(transport.last_call().unwrap().path, "/repos/travis-ci/travis-web/builds");

        client
            .segment("settings")
            .unwrap()
            .segment("envVars")
            .unwrap()
            .leaf("post")
            .unwrap()
            .invoke(Some(json!({ "env_var": { "name": "X" } })))
            .await
            .unwrap();
        let call = transport.last_call().unwrap();
        assert_eq!((call.verb.as_str(), call.path.as_str()), ("POST", "/settings/env_vars"));
    }

    #[test]
    fn test_signatures_cover_every_route() {
        let (_, client) = client();
        let signatures = client.signatures();
        assert_eq!(signatures.len(), client.routes().len());
        assert!(signatures.contains(&"repos(owner_name, name).builds.get".to_string()));
        assert!(signatures.contains(&"auth.github.post".to_string()));
        // `GET /repos` is shadowed by the flattened `GET /repos/:id`.
        assert!(!signatures.contains(&"repos.get".to_string()));
        assert!(signatures.contains(&"repos(id).get".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_description() {
        let (transport, client) = client();
        transport.respond(Ok(json!([
            { "name": "Users", "prefix": "/users", "routes": [{ "uri": "/users", "verb": "GET" }] }
        ])));

        let description = client.fetch_description().await.unwrap();
        assert_eq!(description[0].routes[0].uri, "/users");
        assert_eq!(transport.last_call().unwrap().path, "/endpoints");

        transport.respond(Ok(json!({ "unexpected": true })));
        assert!(matches!(
            client.fetch_description().await,
            Err(ClientError::RouteDescription(_))
        ));
    }
}
