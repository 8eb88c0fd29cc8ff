//! Travis CI API client.
//!
//! Route descriptions (URI template + verb) are compiled into an object graph
//! of chainable segment accessors ending in HTTP verb leaves:
//!
//! ```text
//! client.segment("repos")?.call(["travis-ci", "travis-web"])?
//!       .segment("builds")?.leaf("get")?.invoke(None).await?
//!     → GET /repos/travis-ci/travis-web/builds
//! ```

// Route compilation
pub mod api;
pub mod routing;

// Object graph and client surface
pub mod chain;
pub mod client;

// Cross-cutting concerns
pub mod config;
pub mod error;
pub mod http;
pub mod observability;

pub use chain::{Accessor, Chain, Leaf};
pub use client::{AuthMessage, TravisClient};
pub use config::ClientConfig;
pub use error::{ChainError, ClientError, ClientResult, UrlError};
pub use http::{HttpError, Transport, TransportError, TravisHttp};
