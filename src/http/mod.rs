//! HTTP transport subsystem.
//!
//! # Data Flow
//! ```text
//! Leaf invocation (verb, resolved path, payload)
//!     → transport.rs (Transport trait, TravisHttp)
//!     → request.rs (request ID, Accept, Authorization, default headers)
//!     → reqwest
//!     → response.rs (decode body, map non-200 to HttpError)
//!     → JSON value back to the caller
//! ```

pub mod error;
pub mod request;
pub mod response;
pub mod transport;

pub use error::{HttpError, TransportError};
pub use request::{RequestId, TRAVIS_ACCEPT, X_REQUEST_ID};
pub use transport::{Transport, TravisHttp};

#[cfg(test)]
pub(crate) mod mock;
