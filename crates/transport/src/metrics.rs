//! Transport metrics
//!
//! Emitted through the `metrics` facade; calls are no-ops until the host
//! application installs a recorder.
//!
//! - `medium_transport_requests_total` (counter): labels `method`, `status`
//! - `medium_transport_errors_total` (counter): labels `method`, `error_type`

/// Record a completed round trip with its HTTP status.
pub fn record_request(method: &'static str, status: u16) {
    metrics::counter!(
        "medium_transport_requests_total",
        "method" => method,
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record a failed round trip. `error_type` is `status` or `request`.
pub fn record_error(method: &'static str, error_type: &'static str) {
    metrics::counter!(
        "medium_transport_errors_total",
        "method" => method,
        "error_type" => error_type
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_functions_do_not_panic_without_recorder() {
        record_request("GET", 200);
        record_error("POST", "request");
    }
}
