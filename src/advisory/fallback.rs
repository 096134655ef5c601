//! Deterministic round-robin fallback with skill preference.

use async_trait::async_trait;
use rand::Rng;

use super::{AdvisoryAssignment, AdvisoryError, AdvisoryPlan, Advisor};
use crate::engine::Candidates;
use crate::model::OptimizeFor;

/// Lowest synthesized travel time, in minutes.
pub const MIN_TRAVEL_MINUTES: u32 = 15;
/// Number of distinct synthesized values: travel time lands in `[15, 34]`.
pub const TRAVEL_SPREAD_MINUTES: u32 = 20;

/// Round-robin assignment with a skill-preference override.
///
/// A cursor walks the technician list once. Each job takes the technician
/// under the cursor, unless that technician lacks the job's trade and some
/// other technician has it, in which case the first such technician is used.
/// The cursor advances by one per job regardless of who was picked; once it
/// passes the last technician the remaining jobs stay unassigned.
///
/// Travel time is a random approximation, not a routing result.
#[derive(Debug, Default, Clone, Copy)]
pub struct RoundRobinAdvisor;

#[async_trait]
impl Advisor for RoundRobinAdvisor {
    fn name(&self) -> &str {
        "round_robin"
    }

    async fn propose(
        &self,
        candidates: &Candidates,
        _optimize_for: OptimizeFor,
    ) -> Result<AdvisoryPlan, AdvisoryError> {
        Ok(round_robin(candidates))
    }
}

fn round_robin(candidates: &Candidates) -> AdvisoryPlan {
    let technicians = &candidates.technicians;
    let mut rng = rand::thread_rng();
    let mut cursor = 0;
    let mut plan = AdvisoryPlan::default();
    let mut unassigned = Vec::new();

    for job in &candidates.jobs {
        let Some(at_cursor) = technicians.get(cursor) else {
            unassigned.push(serde_json::Value::from(job.index));
            continue;
        };

        let trade = job.item.trade_type;
        let (chosen, reason) = if at_cursor.item.has_skill(trade) {
            (at_cursor, skill_reason(&at_cursor.item.name, trade.as_str()))
        } else if let Some(skilled) = technicians.iter().find(|t| t.item.has_skill(trade)) {
            (skilled, skill_reason(&skilled.item.name, trade.as_str()))
        } else {
            (
                at_cursor,
                format!(
                    "Assigned to {} by availability; no technician lists {trade} skills",
                    at_cursor.item.name
                ),
            )
        };

        let travel = MIN_TRAVEL_MINUTES + rng.gen_range(0..TRAVEL_SPREAD_MINUTES);
        plan.assignments
            .push(AdvisoryAssignment::new(job.index, chosen.index, travel, reason));
        cursor += 1;
    }

    plan.unassigned_job_indexes = Some(unassigned);
    plan
}

fn skill_reason(name: &str, trade: &str) -> String {
    format!("Skill match: {name} is qualified for {trade} work")
}
