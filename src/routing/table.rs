//! Route table construction.
//!
//! # Responsibilities
//! - Flatten every section of a route description into one list
//! - Group routes by matcher URI, then by lower-cased HTTP verb
//! - Keep the source template next to the canonical one
//!
//! # Design Decisions
//! - Pure transform: no validation, verbs accepted as-is
//! - Duplicate (matcher URI, verb) pairs: the later entry replaces the earlier
//! - Insertion order is preserved at both levels

use indexmap::IndexMap;
use std::sync::Arc;

use crate::api::ApiSection;
use crate::routing::matcher::UriTemplate;

/// One callable endpoint, unique per (matcher URI, method).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord {
    /// Canonical template (all parameters collapsed).
    pub matcher_uri: String,
    /// Verb as written in the description (e.g. `GET`).
    pub verb: String,
    /// Lower-cased verb, used as the leaf name.
    pub method: String,
    /// Original template, used to build request paths.
    pub source: UriTemplate,
    pub scope: Vec<String>,
}

/// Routes grouped by matcher URI and method.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: IndexMap<String, IndexMap<String, Arc<RouteRecord>>>,
}

impl RouteTable {
    /// Build the table from a route description.
    pub fn build(description: &[ApiSection]) -> Self {
        let mut routes: IndexMap<String, IndexMap<String, Arc<RouteRecord>>> = IndexMap::new();

        for entry in description.iter().flat_map(|section| &section.routes) {
            let source = UriTemplate::parse(&entry.uri);
            let record = RouteRecord {
                matcher_uri: source.matcher_uri(),
                verb: entry.verb.clone(),
                method: entry.verb.to_lowercase(),
                source,
                scope: entry.scope.clone(),
            };

            let verbs = routes.entry(record.matcher_uri.clone()).or_default();
            if let Some(previous) = verbs.get(&record.method) {
                tracing::debug!(
                    matcher_uri = %record.matcher_uri,
                    method = %record.method,
                    replaced = %previous.source,
                    by = %record.source,
                    "Duplicate route, keeping the later registration"
                );
            }
            verbs.insert(record.method.clone(), Arc::new(record));
        }

        Self { routes }
    }

    /// Look up the record for a matcher URI and lower-cased method.
    pub fn get(&self, matcher_uri: &str, method: &str) -> Option<&Arc<RouteRecord>> {
        self.routes.get(matcher_uri)?.get(method)
    }

    /// Iterate matcher URIs with their per-method records.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &IndexMap<String, Arc<RouteRecord>>)> {
        self.routes.iter()
    }

    /// Number of distinct matcher URIs.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Total number of (matcher URI, method) records.
    pub fn record_count(&self) -> usize {
        self.routes.values().map(IndexMap::len).sum()
    }
}
