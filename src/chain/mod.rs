//! Call-chain subsystem.
//!
//! # Data Flow
//! ```text
//! SegmentTree (compiled once per client)
//!     → node.rs (Node::walk: members per level, parameter steps flattened)
//!     → walker.rs (Chain: get / segment / call, arguments collected by value)
//!     → leaf.rs (Leaf::invoke: build path, one transport request)
//! ```
//!
//! # Design Decisions
//! - The graph is typed: a node maps names to segment accessors or leaves
//! - Nodes are built lazily and memoized, so the same step yields the same node
//! - Chain state is an owned value, never shared between chains

pub mod leaf;
pub mod node;
pub mod walker;

pub use leaf::Leaf;
pub use node::{Member, Node, SegmentAccessor};
pub use walker::{signature, steps, Accessor, Chain, Step};
