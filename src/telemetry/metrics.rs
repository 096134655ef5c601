//! Metric instrument factories for dispatch-rs.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! All instruments are created lazily from the `"dispatch-rs"` meter.

use opentelemetry::metrics::{Counter, Histogram, Meter};

/// Returns the shared meter for dispatch-rs instruments.
fn meter() -> Meter {
    opentelemetry::global::meter("dispatch-rs")
}

/// Counter: planning cycles run.
/// Labels: `mode` ("store" | "ephemeral"), `path` ("advisory" | "fallback" | "empty").
pub fn cycles() -> Counter<u64> {
    meter()
        .u64_counter("dispatch.cycles")
        .with_description("Number of planning cycles")
        .build()
}

/// Counter: advisory call outcomes.
/// Labels: `result` ("ok" | "failed" | "unconfigured").
pub fn advisory_outcomes() -> Counter<u64> {
    meter()
        .u64_counter("dispatch.advisory.outcomes")
        .with_description("Outcomes of dispatch advisory calls")
        .build()
}

/// Counter: commit stage results per proposal.
/// Labels: `result` ("created" | "existing" | "failed").
pub fn commits() -> Counter<u64> {
    meter()
        .u64_counter("dispatch.commits")
        .with_description("Assignment commits by result")
        .build()
}

/// Counter: job status transitions applied by the engine.
/// Labels: `from`, `to`.
pub fn job_transitions() -> Counter<u64> {
    meter()
        .u64_counter("dispatch.job.transitions")
        .with_description("Number of job status transitions")
        .build()
}

/// Histogram: operation duration in milliseconds.
/// Labels: `operation`.
pub fn operation_duration_ms() -> Histogram<f64> {
    meter()
        .f64_histogram("dispatch.operation.duration_ms")
        .with_description("Operation duration in milliseconds")
        .with_unit("ms")
        .build()
}
