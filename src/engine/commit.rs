//! Commit stage: persist proposals as primary assignments.
//!
//! Proposals are applied one at a time, in order. A failure on one proposal
//! becomes a warning and never stops the rest.

use opentelemetry::KeyValue;
use tracing::{Span, warn};

use crate::error::Result;
use crate::model::*;
use crate::store::EntityStore;
use crate::telemetry::dispatch::record_commit;
use crate::telemetry::metrics;

/// Output of [`commit`].
#[derive(Debug, Clone, Default)]
pub struct CommitOutcome {
    /// Proposals now backed by an assignment, new or pre-existing.
    pub committed: Vec<AssignmentProposal>,
    /// Proposals that could not be written.
    pub failed: Vec<AssignmentProposal>,
    /// One warning per failed proposal, naming the job.
    pub warnings: Vec<String>,
}

/// What happened to a single proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommitResult {
    Created,
    Existing,
}

impl CommitResult {
    fn as_str(self) -> &'static str {
        match self {
            CommitResult::Created => "created",
            CommitResult::Existing => "existing",
        }
    }
}

/// Apply `proposals` to the store.
///
/// A (job, technician) pair that is already linked is left alone and still
/// counts as committed, so running the same proposals twice writes nothing
/// the second time.
pub async fn commit(store: &dyn EntityStore, proposals: Vec<AssignmentProposal>) -> CommitOutcome {
    let span = Span::current();
    let mut outcome = CommitOutcome::default();

    for proposal in proposals {
        match commit_one(store, &proposal).await {
            Ok(result) => {
                metrics::commits().add(1, &[KeyValue::new("result", result.as_str())]);
                record_commit(&span, &proposal.job_number, result.as_str());
                outcome.committed.push(proposal);
            }
            Err(e) => {
                metrics::commits().add(1, &[KeyValue::new("result", "failed")]);
                record_commit(&span, &proposal.job_number, "failed");
                warn!(job = %proposal.job_number, error = %e, "assignment commit failed");
                outcome
                    .warnings
                    .push(format!("Failed to assign job {}: {e}", proposal.job_number));
                outcome.failed.push(proposal);
            }
        }
    }

    outcome
}

async fn commit_one(store: &dyn EntityStore, proposal: &AssignmentProposal) -> Result<CommitResult> {
    if store
        .find_assignment(proposal.job_id, proposal.technician_id)
        .await?
        .is_some()
    {
        return Ok(CommitResult::Existing);
    }

    // Assignment row and PENDING -> SCHEDULED land together or not at all.
    let write = store
        .assign_and_schedule(NewAssignment::primary(proposal.job_id, proposal.technician_id))
        .await?;
    if !write.is_created() {
        // Lost a race with another writer for the same pair.
        return Ok(CommitResult::Existing);
    }

    Ok(CommitResult::Created)
}
