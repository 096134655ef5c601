//! Summary statistics over a cycle's final assignment list.

use crate::model::{AssignmentProposal, PlanMetrics};

/// Reduce `assignments` to totals. The average is rounded to the nearest
/// minute and is 0 when nothing was assigned.
pub fn aggregate(assignments: &[AssignmentProposal], unassigned_jobs: usize) -> PlanMetrics {
    let total: u64 = assignments
        .iter()
        .map(|a| u64::from(a.estimated_travel_minutes))
        .sum();
    let count = assignments.len();
    let avg = if count == 0 {
        0
    } else {
        (total as f64 / count as f64).round() as u32
    };

    PlanMetrics {
        total_travel_time: u32::try_from(total).unwrap_or(u32::MAX),
        avg_travel_time: avg,
        jobs_assigned: count,
        unassigned_jobs,
    }
}
