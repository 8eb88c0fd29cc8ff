//! Request metrics.
//!
//! # Metrics
//! - `travis_client_requests_total` (counter): requests by method and status
//! - `travis_client_request_duration_seconds` (histogram): round-trip latency
//!
//! Status `0` marks requests that never got a response. Without an installed
//! recorder the calls are no-ops.

use std::time::Instant;

pub const REQUESTS_TOTAL: &str = "travis_client_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "travis_client_request_duration_seconds";

/// Record one finished request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let method = method.to_uppercase();

    metrics::counter!(
        REQUESTS_TOTAL,
        "method" => method.clone(),
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!(REQUEST_DURATION_SECONDS, "method" => method)
        .record(start.elapsed().as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_without_recorder() {
        record_request("get", 200, Instant::now());
        record_request("POST", 0, Instant::now());
    }
}
