//! Dispatch engine: candidates, planning, commit, metrics.
//!
//! One call is one synchronous pass. The store is read once at the start and
//! written once per proposal at the end; the advisory is called at most once
//! in between.

pub mod candidates;
pub mod commit;
pub mod metrics;
pub mod planner;

pub use candidates::{Candidates, Indexed};
pub use commit::{CommitOutcome, commit};
pub use planner::{PlanOutcome, PlanPath, Planner};

use chrono::Utc;
use opentelemetry::KeyValue;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info};

use crate::error::Result;
use crate::model::*;
use crate::store::EntityStore;
use crate::telemetry::dispatch::{record_cycle_result, start_cycle_span};
use crate::telemetry::metrics as instruments;

/// Runs planning cycles for one entity store.
#[derive(Clone)]
pub struct DispatchEngine {
    store: Arc<dyn EntityStore>,
    planner: Planner,
}

impl DispatchEngine {
    pub fn new(store: Arc<dyn EntityStore>, planner: Planner) -> Self {
        Self { store, planner }
    }

    /// Validate a caller request and run the matching entry point.
    ///
    /// Returns `Error::InvalidRequest` before any planning when the request
    /// is inconsistent.
    pub async fn dispatch(
        &self,
        company: CompanyId,
        request: PlanningRequest,
    ) -> Result<PlanningResponse> {
        match request.into_mode()? {
            PlanningMode::Store {
                window,
                optimize_for,
            } => self.plan_for_company(company, window, optimize_for).await,
            PlanningMode::Ephemeral {
                jobs,
                technicians,
                optimize_for,
            } => plan_ephemeral(&self.planner, jobs, technicians, optimize_for).await,
        }
    }

    /// Full cycle against the store: build candidates, plan, commit, report.
    ///
    /// Only store read failures are returned as errors. Advisory failures and
    /// per-proposal commit failures end up in `warnings`.
    pub async fn plan_for_company(
        &self,
        company: CompanyId,
        window: PlanningWindow,
        optimize_for: OptimizeFor,
    ) -> Result<PlanningResponse> {
        let company_label = company.to_string();
        let span = start_cycle_span("store", Some(company_label.as_str()));

        async {
            let started = Instant::now();
            let candidates = Candidates::load(self.store.as_ref(), company, window).await?;
            if let Some((warning, unassigned)) = candidates.short_circuit() {
                info!(warning, "nothing to plan");
                finish_cycle(&span, "store", "empty", 0, started);
                return Ok(PlanningResponse::empty(unassigned, warning));
            }

            info!(
                jobs = candidates.jobs.len(),
                technicians = candidates.technicians.len(),
                %optimize_for,
                "planning cycle started"
            );

            let plan = self.planner.plan(&candidates, optimize_for, Utc::now()).await?;
            let committed = commit(self.store.as_ref(), plan.proposals).await;

            // Proposals that failed to commit are unassigned after all.
            let unassigned = plan.unassigned_count + committed.failed.len();
            let mut warnings = plan.warnings;
            warnings.extend(committed.warnings);

            let response = PlanningResponse {
                metrics: metrics::aggregate(&committed.committed, unassigned),
                assignments: committed.committed,
                warnings,
            };
            finish_cycle(
                &span,
                "store",
                plan.path.as_str(),
                response.metrics.jobs_assigned,
                started,
            );
            Ok(response)
        }
        .instrument(span.clone())
        .await
    }
}

/// Plan over caller-supplied jobs and technicians without touching any store.
///
/// The inputs are indexed as given. Proposals are returned but never
/// persisted.
pub async fn plan_ephemeral(
    planner: &Planner,
    jobs: Vec<Job>,
    technicians: Vec<Technician>,
    optimize_for: OptimizeFor,
) -> Result<PlanningResponse> {
    let span = start_cycle_span("ephemeral", None);

    async {
        let started = Instant::now();
        let candidates = Candidates::from_lists(jobs, technicians);
        if let Some((warning, unassigned)) = candidates.short_circuit() {
            finish_cycle(&span, "ephemeral", "empty", 0, started);
            return Ok(PlanningResponse::empty(unassigned, warning));
        }

        let plan = planner.plan(&candidates, optimize_for, Utc::now()).await?;
        let response = PlanningResponse {
            metrics: metrics::aggregate(&plan.proposals, plan.unassigned_count),
            assignments: plan.proposals,
            warnings: plan.warnings,
        };
        finish_cycle(
            &span,
            "ephemeral",
            plan.path.as_str(),
            response.metrics.jobs_assigned,
            started,
        );
        Ok(response)
    }
    .instrument(span.clone())
    .await
}

fn finish_cycle(span: &tracing::Span, mode: &str, path: &str, jobs_assigned: usize, started: Instant) {
    record_cycle_result(span, path, jobs_assigned);
    instruments::cycles().add(
        1,
        &[
            KeyValue::new("mode", mode.to_string()),
            KeyValue::new("path", path.to_string()),
        ],
    );
    instruments::operation_duration_ms().record(
        started.elapsed().as_secs_f64() * 1000.0,
        &[KeyValue::new("operation", "dispatch.plan")],
    );
}
