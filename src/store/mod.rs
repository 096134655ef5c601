//! The entity store the dispatch engine reads candidates from and commits
//! assignments to.
//!
//! [`Db`](crate::db::Db) is the Postgres implementation; [`MemoryStore`] keeps
//! everything in process for tests and local runs.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::*;

#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Jobs in PENDING or SCHEDULED with no assignment at all, whose scheduled
    /// start is unset or inside `window`.
    ///
    /// Ordered by priority (most urgent first), then scheduled start with
    /// unscheduled jobs last, then creation time.
    async fn unassigned_jobs(&self, company: CompanyId, window: PlanningWindow) -> Result<Vec<Job>>;

    /// Technicians that are AVAILABLE or ON_JOB, with `assigned_job_count`
    /// set to the assignments they already hold inside `window`.
    ///
    /// Ordered by that count, then by name.
    async fn available_technicians(
        &self,
        company: CompanyId,
        window: PlanningWindow,
    ) -> Result<Vec<Technician>>;

    /// Look up the assignment for a (job, technician) pair.
    async fn find_assignment(
        &self,
        job: JobId,
        technician: TechnicianId,
    ) -> Result<Option<Assignment>>;

    /// Insert an assignment. A pair that is already linked comes back as
    /// [`AssignmentWrite::Existing`] instead of an error.
    async fn create_assignment(&self, new: NewAssignment) -> Result<AssignmentWrite>;

    /// Insert an assignment and, in the same atomic write, move its job from
    /// PENDING to SCHEDULED. Jobs in any other status are left as they are.
    ///
    /// On error nothing is written. A pair that is already linked comes back
    /// as [`AssignmentWrite::Existing`] and the job is not touched.
    async fn assign_and_schedule(&self, new: NewAssignment) -> Result<AssignmentWrite>;

    /// Move a job from `from` to `to` if it is still in `from`.
    ///
    /// Returns `Ok(false)` when the job was in some other state. Disallowed
    /// transitions are an [`Error::InvalidTransition`](crate::error::Error).
    async fn transition_job(&self, job: JobId, from: JobStatus, to: JobStatus) -> Result<bool>;
}

/// Validate a job state transition, returning an error if disallowed.
pub(crate) fn validate_transition(from: JobStatus, to: JobStatus) -> Result<()> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(crate::error::Error::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}
