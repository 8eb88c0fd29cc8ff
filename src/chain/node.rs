//! Compiled object graph.
//!
//! # Responsibilities
//! - Mirror a segment tree as nodes of named members
//! - Flatten parameter steps into the segment that owns them
//! - Build each node on first access and keep it for later accesses
//!
//! # Design Decisions
//! - First registration wins: a member name is never replaced once set
//! - Nodes are immutable after construction and shared through `Arc`
//! - Per-arity parameter views are built together, on the first call

use indexmap::IndexMap;
use std::sync::{Arc, OnceLock};

use crate::routing::table::RouteRecord;
use crate::routing::tree::{
    is_param_key, is_param_run, param_key, SegmentEntry, SegmentTree, CHAIN_SEPARATOR,
};

/// A named member of a node.
#[derive(Debug, Clone)]
pub enum Member {
    Segment(Arc<SegmentAccessor>),
    Leaf(Arc<RouteRecord>),
}

/// One level of the object graph.
#[derive(Debug)]
pub struct Node {
    name: String,
    members: IndexMap<String, Member>,
}

impl Node {
    /// Build a node named `name` exposing the entries of `tree`.
    pub fn walk(name: &str, tree: &SegmentTree) -> Self {
        let mut node = Self {
            name: name.to_string(),
            members: IndexMap::new(),
        };
        node.populate(tree);
        node
    }

    fn populate(&mut self, tree: &SegmentTree) {
        for (key, entry) in tree.entries() {
            if self.members.contains_key(key) {
                tracing::trace!(node = %self.name, member = %key, "Member already registered");
                continue;
            }

            match entry {
                SegmentEntry::Leaf(record) => {
                    self.members
                        .insert(key.clone(), Member::Leaf(Arc::clone(record)));
                }
                SegmentEntry::Branch(subtree) if is_param_key(key) => self.populate(subtree),
                SegmentEntry::Branch(subtree) => {
                    let accessor = SegmentAccessor::new(key, Arc::clone(subtree));
                    self.members
                        .insert(key.clone(), Member::Segment(Arc::new(accessor)));
                }
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }

    /// Member names in registration order.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A callable segment: `repos`, `builds`, `envVars`, ...
pub struct SegmentAccessor {
    name: String,
    subtree: Arc<SegmentTree>,
    view: OnceLock<Arc<Node>>,
    param_views: OnceLock<IndexMap<String, Arc<Node>>>,
}

impl SegmentAccessor {
    fn new(name: &str, subtree: Arc<SegmentTree>) -> Self {
        Self {
            name: name.to_string(),
            subtree,
            view: OnceLock::new(),
            param_views: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Node seen when the accessor is used without being called.
    pub fn view(&self) -> &Arc<Node> {
        self.view
            .get_or_init(|| Arc::new(Node::walk(&self.name, &self.subtree)))
    }

    /// Node reached by calling the accessor with `count` arguments.
    ///
    /// `count` must be non-zero; zero-argument calls use [`Self::view`].
    pub fn param_view(&self, count: usize) -> Option<&Arc<Node>> {
        let views = self.param_views.get_or_init(|| {
            self.subtree
                .entries()
                .filter(|(key, _)| is_param_run(key))
                .filter_map(|(key, entry)| {
                    entry
                        .as_branch()
                        .map(|subtree| (key.clone(), Arc::new(Node::walk(&self.name, subtree))))
                })
                .collect()
        });
        views.get(&param_key(count))
    }

    /// Parameter counts this accessor accepts when called.
    pub fn arities(&self) -> Vec<usize> {
        self.subtree
            .entries()
            .filter(|(key, entry)| is_param_run(key) && entry.as_branch().is_some())
            .map(|(key, _)| key.split(CHAIN_SEPARATOR).count())
            .collect()
    }
}

impl std::fmt::Debug for SegmentAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SegmentAccessor")
            .field("name", &self.name)
            .field("arities", &self.arities())
            .finish()
    }
}
