//! Core data model.
//!
//! Jobs and technicians are owned by the surrounding field-service system;
//! the dispatch engine reads them, links them with assignments, and moves a
//! job from pending to scheduled when it receives its first technician.

pub mod assignment;
pub mod job;
pub mod plan;
pub mod technician;

pub use assignment::{Assignment, AssignmentProposal, AssignmentWrite, NewAssignment};
pub use job::{Job, JobPriority, JobStatus, TradeType};
pub use plan::{
    OptimizeFor, PlanMetrics, PlanningMode, PlanningRequest, PlanningResponse, PlanningWindow,
};
pub use technician::{Technician, TechnicianStatus};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                // Short display: first 8 chars of UUID
                write!(f, "{}", &self.0.to_string()[..8])
            }
        }
    };
}

uuid_id!(
    /// Tenant that owns jobs and technicians. Every store query is scoped by it.
    CompanyId
);
uuid_id!(
    /// Identifier of a service job.
    JobId
);
uuid_id!(
    /// Identifier of a field technician.
    TechnicianId
);
uuid_id!(
    /// Identifier of a persisted job/technician link.
    AssignmentId
);
