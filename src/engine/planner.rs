//! Assignment planning: advisory first, round-robin fallback on any failure.

use chrono::{DateTime, TimeDelta, Utc};
use opentelemetry::KeyValue;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::candidates::Candidates;
use crate::advisory::{AdvisoryPlan, Advisor, RoundRobinAdvisor};
use crate::error::{Error, Result};
use crate::model::*;
use crate::telemetry::metrics;

/// Travel time used when the advisory gives none or an unusable one.
pub const DEFAULT_TRAVEL_MINUTES: u32 = 20;

pub const FALLBACK_WARNING: &str = "AI optimization failed, using simple assignment";
pub const UNCONFIGURED_WARNING: &str = "AI optimization not configured, using simple assignment";

const DEFAULT_REASON: &str = "Matched on skills and availability";

/// Which advisor produced a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanPath {
    Advisory,
    Fallback,
}

impl PlanPath {
    pub fn as_str(self) -> &'static str {
        match self {
            PlanPath::Advisory => "advisory",
            PlanPath::Fallback => "fallback",
        }
    }
}

/// Output of [`Planner::plan`].
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub proposals: Vec<AssignmentProposal>,
    pub unassigned_count: usize,
    pub warnings: Vec<String>,
    pub path: PlanPath,
}

/// Chooses technicians for candidate jobs.
#[derive(Clone)]
pub struct Planner {
    advisor: Option<Arc<dyn Advisor>>,
    fallback: Arc<dyn Advisor>,
}

impl Planner {
    /// Planner that consults `advisor` and falls back to round-robin.
    pub fn new(advisor: Arc<dyn Advisor>) -> Self {
        Self {
            advisor: Some(advisor),
            fallback: Arc::new(RoundRobinAdvisor),
        }
    }

    /// Planner with no advisory configured.
    pub fn fallback_only() -> Self {
        Self {
            advisor: None,
            fallback: Arc::new(RoundRobinAdvisor),
        }
    }

    /// Replace the fallback advisor.
    pub fn with_fallback(mut self, fallback: Arc<dyn Advisor>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Produce proposals for `candidates`. Arrival times are `now` plus the
    /// travel estimate.
    pub async fn plan(
        &self,
        candidates: &Candidates,
        optimize_for: OptimizeFor,
        now: DateTime<Utc>,
    ) -> Result<PlanOutcome> {
        let mut warnings = Vec::new();

        match &self.advisor {
            Some(advisor) => match advisor.propose(candidates, optimize_for).await {
                Ok(plan) => {
                    metrics::advisory_outcomes().add(1, &[KeyValue::new("result", "ok")]);
                    info!(advisor = advisor.name(), "advisory plan accepted");
                    return Ok(hydrate(plan, candidates, now, warnings, PlanPath::Advisory));
                }
                Err(e) => {
                    metrics::advisory_outcomes().add(1, &[KeyValue::new("result", "failed")]);
                    warn!(advisor = advisor.name(), error = %e, "advisory failed, falling back");
                    warnings.push(FALLBACK_WARNING.to_string());
                }
            },
            None => {
                metrics::advisory_outcomes().add(1, &[KeyValue::new("result", "unconfigured")]);
                warnings.push(UNCONFIGURED_WARNING.to_string());
            }
        }

        let plan = self
            .fallback
            .propose(candidates, optimize_for)
            .await
            .map_err(|e| Error::Other(format!("fallback planner failed: {e}")))?;
        Ok(hydrate(plan, candidates, now, warnings, PlanPath::Fallback))
    }
}

/// Resolve an index-based plan back to real jobs and technicians.
///
/// Entries with an unknown index are dropped, as are repeat entries for a job
/// that already has a proposal.
fn hydrate(
    plan: AdvisoryPlan,
    candidates: &Candidates,
    now: DateTime<Utc>,
    mut warnings: Vec<String>,
    path: PlanPath,
) -> PlanOutcome {
    let mut proposals = Vec::with_capacity(plan.assignments.len());
    let mut placed = HashSet::new();

    for entry in &plan.assignments {
        let (Some(job), Some(tech)) = (
            entry.job_index.and_then(|i| candidates.job(i)),
            entry.tech_index.and_then(|i| candidates.technician(i)),
        ) else {
            debug!(
                job_index = ?entry.job_index,
                tech_index = ?entry.tech_index,
                "dropping proposal with unknown index"
            );
            continue;
        };
        if !placed.insert(job.id) {
            debug!(job = %job.number, "dropping repeat proposal for job");
            continue;
        }

        let minutes = entry.travel_minutes().unwrap_or(DEFAULT_TRAVEL_MINUTES);
        proposals.push(AssignmentProposal {
            job_id: job.id,
            job_number: job.number.clone(),
            technician_id: tech.id,
            technician_name: tech.name.clone(),
            estimated_travel_minutes: minutes,
            estimated_arrival: now + TimeDelta::minutes(i64::from(minutes)),
            rationale: entry
                .reason
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .unwrap_or(DEFAULT_REASON)
                .to_string(),
        });
    }

    // Assigned plus unassigned must cover every candidate job, whatever the
    // advisory reported.
    let unassigned_count = candidates.jobs.len() - proposals.len();
    if let Some(reported) = &plan.unassigned_job_indexes
        && reported.len() != unassigned_count
    {
        debug!(
            reported = reported.len(),
            computed = unassigned_count,
            "advisory unassigned count disagrees with proposals"
        );
    }

    warnings.extend(plan.warnings.into_iter().filter(|w| !w.trim().is_empty()));

    PlanOutcome {
        proposals,
        unassigned_count,
        warnings,
        path,
    }
}
