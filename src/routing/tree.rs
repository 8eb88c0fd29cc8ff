//! Segment tree compilation.
//!
//! # Responsibilities
//! - Split matcher URIs into camel-cased path segments
//! - Chain runs of consecutive parameters under one combined key
//! - Merge per-verb leaf records at each path's terminal node
//!
//! # Design Decisions
//! - A node may hold literal children and verb leaves at the same time
//! - Leaves are merged last and replace a same-named entry
//! - A path that runs through an existing leaf is dropped (the leaf keeps its slot)
//! - Entry order follows route registration order

use indexmap::IndexMap;
use std::sync::Arc;

use crate::routing::matcher::PLACEHOLDER;
use crate::routing::table::{RouteRecord, RouteTable};

/// Joins placeholders in a chained parameter key (`:arg,:arg`).
pub const CHAIN_SEPARATOR: &str = ",";

/// Key addressing a step that consumes `count` parameters.
///
/// Returns an empty string for zero.
pub fn param_key(count: usize) -> String {
    vec![PLACEHOLDER; count].join(CHAIN_SEPARATOR)
}

/// Whether a tree key is a (possibly chained) parameter step.
pub fn is_param_key(key: &str) -> bool {
    key.starts_with(':')
}

/// Whether a tree key is made of placeholders only, as built by [`param_key`].
///
/// Literal parts such as `:argname` start with `:` but take no arguments.
pub fn is_param_run(key: &str) -> bool {
    key.split(CHAIN_SEPARATOR).all(|part| part == PLACEHOLDER)
}

/// `env_vars` → `envVars`. Empty words are dropped.
pub fn to_camel_case(name: &str) -> String {
    name.split('_')
        .enumerate()
        .map(|(i, part)| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) if i > 0 => first.to_uppercase().chain(chars).collect(),
                _ => part.to_string(),
            }
        })
        .collect()
}

/// Path segments of a matcher URI, ready to be used as tree keys.
pub fn segment_keys(matcher_uri: &str) -> Vec<String> {
    let mut keys = Vec::new();
    let mut params = 0;

    for part in matcher_uri.split('/').filter(|part| !part.is_empty()) {
        if part == PLACEHOLDER {
            params += 1;
            continue;
        }
        if params > 0 {
            keys.push(param_key(params));
            params = 0;
        }
        keys.push(to_camel_case(part));
    }
    if params > 0 {
        keys.push(param_key(params));
    }

    keys
}

/// An entry under a segment tree node.
#[derive(Debug, Clone)]
pub enum SegmentEntry {
    Branch(Arc<SegmentTree>),
    Leaf(Arc<RouteRecord>),
}

impl SegmentEntry {
    pub fn as_branch(&self) -> Option<&SegmentTree> {
        match self {
            SegmentEntry::Branch(tree) => Some(tree.as_ref()),
            SegmentEntry::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Arc<RouteRecord>> {
        match self {
            SegmentEntry::Leaf(record) => Some(record),
            SegmentEntry::Branch(_) => None,
        }
    }
}

/// Nested mapping from segment names (or lower-cased verbs) to entries.
#[derive(Debug, Clone, Default)]
pub struct SegmentTree {
    entries: IndexMap<String, SegmentEntry>,
}

impl SegmentTree {
    /// Compile a route table into its segment tree.
    pub fn compile(table: &RouteTable) -> Self {
        let mut root = SegmentTree::default();

        'routes: for (matcher_uri, verbs) in table.iter() {
            let mut branch = &mut root;

            for key in segment_keys(matcher_uri) {
                match branch
                    .entries
                    .entry(key)
                    .or_insert_with(|| SegmentEntry::Branch(Arc::default()))
                {
                    // Sole owner while compiling, so this never clones.
                    SegmentEntry::Branch(child) => branch = Arc::make_mut(child),
                    SegmentEntry::Leaf(record) => {
                        tracing::debug!(
                            matcher_uri = %matcher_uri,
                            blocked_by = %record.source,
                            "Route path runs through a leaf, skipping"
                        );
                        continue 'routes;
                    }
                }
            }

            for (method, record) in verbs {
                branch
                    .entries
                    .insert(method.clone(), SegmentEntry::Leaf(Arc::clone(record)));
            }
        }

        tracing::debug!(
            matcher_uris = table.len(),
            top_level_segments = root.len(),
            "Segment tree compiled"
        );

        root
    }

    pub fn get(&self, key: &str) -> Option<&SegmentEntry> {
        self.entries.get(key)
    }

    /// Entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = (&String, &SegmentEntry)> {
        self.entries.iter()
    }

    /// Every leaf record, depth first in registration order.
    pub fn leaves(&self) -> Vec<Arc<RouteRecord>> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut Vec<Arc<RouteRecord>>) {
        for entry in self.entries.values() {
            match entry {
                SegmentEntry::Branch(child) => child.collect_leaves(out),
                SegmentEntry::Leaf(record) => out.push(Arc::clone(record)),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
