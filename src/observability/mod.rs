//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! chain leaf invocation
//!     → http::transport (one request)
//!     → logging.rs (structured log events)
//!     → metrics.rs (request counter, latency histogram)
//! ```
//!
//! # Design Decisions
//! - Library code only emits events; the binary installs the subscriber
//! - Metrics go through the `metrics` facade, no exporter is bundled

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
