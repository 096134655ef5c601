//! Assignments (persisted) and proposals (ephemeral).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AssignmentId, JobId, TechnicianId};

/// A persisted link between one job and one technician.
///
/// At most one assignment exists per (job, technician) pair; the pair is the
/// idempotency key of the commit stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: AssignmentId,
    pub job_id: JobId,
    pub technician_id: TechnicianId,
    /// The engine only ever writes primary assignments.
    pub is_primary: bool,
    pub assigned_at: DateTime<Utc>,
}

/// Parameters for creating an assignment.
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub job_id: JobId,
    pub technician_id: TechnicianId,
    pub is_primary: bool,
}

impl NewAssignment {
    pub fn primary(job_id: JobId, technician_id: TechnicianId) -> Self {
        Self {
            job_id,
            technician_id,
            is_primary: true,
        }
    }
}

/// Result of writing an assignment.
#[derive(Debug, Clone)]
pub enum AssignmentWrite {
    /// A new row was inserted.
    Created(Assignment),
    /// The (job, technician) pair was already linked; nothing was written.
    Existing(Assignment),
}

impl AssignmentWrite {
    pub fn assignment(&self) -> &Assignment {
        match self {
            AssignmentWrite::Created(a) | AssignmentWrite::Existing(a) => a,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, AssignmentWrite::Created(_))
    }
}

/// A job-to-technician match produced by the planner, not yet persisted.
///
/// Serializes directly as an entry of the planning response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentProposal {
    pub job_id: JobId,
    pub job_number: String,
    pub technician_id: TechnicianId,
    pub technician_name: String,
    #[serde(rename = "estimatedTravelTime")]
    pub estimated_travel_minutes: u32,
    pub estimated_arrival: DateTime<Utc>,
    #[serde(rename = "reason")]
    pub rationale: String,
}
