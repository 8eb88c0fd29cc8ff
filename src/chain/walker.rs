//! Chain traversal.
//!
//! # Responsibilities
//! - Expose members of the current node (`get`, `segment`, `leaf`)
//! - Call segment accessors, collecting path arguments
//! - Hand the collected arguments to the leaf at the end of the chain
//!
//! # Design Decisions
//! - A `Chain` owns its arguments; every step returns a new value
//! - Chains started at the root always begin with no arguments
//! - Only an accessor that has not been called yet is callable
//! - Argument count errors are raised at the offending call

use serde_json::Value;
use std::sync::Arc;

use crate::chain::leaf::Leaf;
use crate::chain::node::{Member, Node, SegmentAccessor};
use crate::error::ChainError;
use crate::http::Transport;
use crate::routing::matcher::{matcher_uri, Piece, UriTemplate};
use crate::routing::table::RouteRecord;
use crate::routing::tree::to_camel_case;

/// A position in the object graph plus the arguments collected so far.
#[derive(Clone)]
pub struct Chain {
    transport: Arc<dyn Transport>,
    node: Arc<Node>,
    accessor: Option<Arc<SegmentAccessor>>,
    args: Vec<Value>,
}

/// A member resolved from a chain.
#[derive(Debug, Clone)]
pub enum Accessor {
    Segment(Chain),
    Leaf(Leaf),
}

impl Accessor {
    pub fn name(&self) -> &str {
        match self {
            Accessor::Segment(chain) => chain.name(),
            Accessor::Leaf(leaf) => leaf.name(),
        }
    }
}

impl Chain {
    /// A fresh chain at `root`.
    pub(crate) fn root(transport: Arc<dyn Transport>, root: Arc<Node>) -> Self {
        Self {
            transport,
            node: root,
            accessor: None,
            args: Vec::new(),
        }
    }

    /// Name of the segment this chain stands on.
    pub fn name(&self) -> &str {
        self.node.name()
    }

    /// Arguments collected so far.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Members reachable from here, in registration order.
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.node.member_names()
    }

    pub fn has_member(&self, name: &str) -> bool {
        self.node.get(name).is_some()
    }

    pub fn is_callable(&self) -> bool {
        self.accessor.is_some()
    }

    /// Whether both chains stand on the same node of the graph.
    pub fn same_node(&self, other: &Chain) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Resolve a member by name.
    pub fn get(&self, name: &str) -> Result<Accessor, ChainError> {
        match self.node.get(name) {
            Some(Member::Segment(accessor)) => Ok(Accessor::Segment(Chain {
                transport: Arc::clone(&self.transport),
                node: Arc::clone(accessor.view()),
                accessor: Some(Arc::clone(accessor)),
                args: self.args.clone(),
            })),
            Some(Member::Leaf(record)) => Ok(Accessor::Leaf(Leaf::new(
                Arc::clone(&self.transport),
                Arc::clone(record),
                self.args.clone(),
            ))),
            None => Err(ChainError::UnknownMember {
                chain: self.name().to_string(),
                member: name.to_string(),
            }),
        }
    }

    /// Resolve a segment member.
    pub fn segment(&self, name: &str) -> Result<Chain, ChainError> {
        match self.get(name)? {
            Accessor::Segment(chain) => Ok(chain),
            Accessor::Leaf(_) => Err(ChainError::NotASegment(name.to_string())),
        }
    }

    /// Resolve a leaf member.
    pub fn leaf(&self, verb: &str) -> Result<Leaf, ChainError> {
        match self.get(verb)? {
            Accessor::Leaf(leaf) => Ok(leaf),
            Accessor::Segment(_) => Err(ChainError::NotALeaf(verb.to_string())),
        }
    }

    /// Call the segment accessor with path arguments.
    ///
    /// With no arguments the chain continues into the segment itself.
    /// Otherwise the segment must have a parameter step of exactly that many
    /// parameters.
    pub fn call<I, A>(&self, args: I) -> Result<Chain, ChainError>
    where
        I: IntoIterator<Item = A>,
        A: Into<Value>,
    {
        let accessor = self
            .accessor
            .as_ref()
            .ok_or_else(|| ChainError::NotCallable(self.name().to_string()))?;

        let given: Vec<Value> = args.into_iter().map(Into::into).collect();

        let node = if given.is_empty() {
            Arc::clone(accessor.view())
        } else {
            accessor
                .param_view(given.len())
                .map(Arc::clone)
                .ok_or_else(|| ChainError::InvalidArgumentCount {
                    segment: accessor.name().to_string(),
                    given: given.len(),
                })?
        };

        let mut collected = self.args.clone();
        collected.extend(given);

        Ok(Chain {
            transport: Arc::clone(&self.transport),
            node,
            accessor: None,
            args: collected,
        })
    }

    /// Parameter counts accepted by [`Chain::call`], empty if not callable.
    pub fn arities(&self) -> Vec<usize> {
        self.accessor
            .as_ref()
            .map(|accessor| accessor.arities())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain")
            .field("name", &self.name())
            .field("callable", &self.is_callable())
            .field("args", &self.args)
            .finish()
    }
}

/// One step of the chain that reaches a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Segment(String),
    /// Call the current segment; holds the parameter names.
    Call(Vec<String>),
    Leaf(String),
}

/// Decompose a route into the chain steps that reach it.
pub fn steps(record: &RouteRecord) -> Vec<Step> {
    let mut steps = Vec::new();
    let mut params = Vec::new();

    for segment in record.source.source().split('/').filter(|s| !s.is_empty()) {
        match UriTemplate::parse(segment).pieces() {
            [Piece::Param(token)] => params.push(token.name()),
            _ => {
                if !params.is_empty() {
                    steps.push(Step::Call(std::mem::take(&mut params)));
                }
                steps.push(Step::Segment(to_camel_case(&matcher_uri(segment))));
            }
        }
    }
    if !params.is_empty() {
        steps.push(Step::Call(params));
    }
    steps.push(Step::Leaf(record.method.clone()));

    steps
}

/// How a route is reached, e.g. `repos(owner_name, name).builds.get`.
pub fn signature(record: &RouteRecord) -> String {
    let mut out = String::new();

    for step in steps(record) {
        match step {
            Step::Segment(name) | Step::Leaf(name) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(&name);
            }
            Step::Call(params) => {
                out.push('(');
                out.push_str(&params.join(", "));
                out.push(')');
            }
        }
    }

    out
}

impl Chain {
    /// Follow the steps of `record` from this chain, with placeholder
    /// arguments. The leaf found may belong to another route when a member
    /// name is shadowed.
    pub fn locate(&self, record: &RouteRecord) -> Result<Leaf, ChainError> {
        let mut steps = steps(record);
        let Some(Step::Leaf(verb)) = steps.pop() else {
            return Err(ChainError::NotALeaf(record.method.clone()));
        };

        let mut chain = self.clone();
        for step in steps {
            chain = match step {
                Step::Segment(name) => chain.segment(&name)?,
                Step::Call(params) => chain.call(vec![Value::Null; params.len()])?,
                Step::Leaf(name) => return Err(ChainError::NotASegment(name)),
            };
        }
        chain.leaf(&verb)
    }
}
