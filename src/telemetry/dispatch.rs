//! Planning cycle span helpers.

use tracing::Span;

/// Start a span covering one planning cycle.
///
/// `dispatch.path` and `dispatch.jobs_assigned` are declared empty and filled
/// in by [`record_cycle_result`].
pub fn start_cycle_span(mode: &str, company: Option<&str>) -> Span {
    tracing::info_span!(
        "dispatch.cycle",
        "dispatch.mode" = mode,
        "dispatch.company" = company.unwrap_or("-"),
        "dispatch.path" = tracing::field::Empty,
        "dispatch.jobs_assigned" = tracing::field::Empty,
    )
}

/// Record which planner path ran and how many jobs it placed.
pub fn record_cycle_result(span: &Span, path: &str, jobs_assigned: usize) {
    span.record("dispatch.path", path);
    span.record("dispatch.jobs_assigned", jobs_assigned as u64);
}

/// Record a commit-stage outcome for one job as an event on the span.
pub fn record_commit(span: &Span, job_number: &str, outcome: &str) {
    span.in_scope(|| {
        tracing::info!(job = job_number, outcome = outcome, "assignment_commit");
    });
}
