//! Route compilation subsystem.
//!
//! # Data Flow
//! ```text
//! Route description (sections of uri + verb)
//!     → matcher.rs (parse URI templates, params → `:arg`)
//!     → table.rs (matcher URI → method → record, last wins)
//!     → tree.rs (nested segment tree, camelCase keys, `:arg` runs)
//!     → chain::Node::walk (typed object graph)
//!
//! Leaf invocation:
//!     record.source + args
//!     → url.rs (positional substitution)
//!     → concrete request path
//! ```
//!
//! # Design Decisions
//! - Compiled once per client, immutable afterwards
//! - No regex: templates are scanned segment by segment
//! - Insertion order preserved everywhere (IndexMap)

pub mod matcher;
pub mod table;
pub mod tree;
pub mod url;

pub use matcher::{matcher_uri, ParamToken, Piece, UriTemplate};
pub use table::{RouteRecord, RouteTable};
pub use tree::{SegmentEntry, SegmentTree};
pub use url::build_url;
