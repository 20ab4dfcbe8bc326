//! Metric instrument factories for agrosense.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! Without one, instruments are no-ops.

use opentelemetry::metrics::{Counter, Histogram, Meter};

use super::SERVICE_NAME;

fn meter() -> Meter {
    opentelemetry::global::meter(SERVICE_NAME)
}

/// Counter: handler invocations.
/// Labels: `mode` ("azure" | "demo"), `outcome` ("ok" or the error code).
pub fn requests_handled() -> Counter<u64> {
    meter()
        .u64_counter("agrosense.requests.handled")
        .with_description("Number of requests handled")
        .build()
}

/// Histogram: time spent in the handler, in milliseconds.
/// Labels: `mode`, `outcome`.
pub fn request_duration_ms() -> Histogram<f64> {
    meter()
        .f64_histogram("agrosense.request.duration_ms")
        .with_description("Handler duration in milliseconds")
        .with_unit("ms")
        .build()
}
