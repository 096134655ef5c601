//! Rendering of the advisory request: a system message with dispatcher
//! guidance and a user message enumerating the indexed candidates.

use std::fmt::Write as _;

use crate::engine::Candidates;
use crate::model::OptimizeFor;

/// Output contract appended to every user message.
pub const RESPONSE_SCHEMA: &str = r#"{
  "assignments": [
    { "jobIndex": <number>, "techIndex": <number>, "estimatedTravelTime": <minutes>, "reason": "<short explanation>" }
  ],
  "unassignedJobIndexes": [<number>],
  "warnings": ["<string>"]
}"#;

/// The two messages sent to the advisory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryPrompt {
    pub system: String,
    pub user: String,
}

impl AdvisoryPrompt {
    pub fn render(candidates: &Candidates, optimize_for: OptimizeFor) -> Self {
        Self {
            system: system_message(optimize_for),
            user: user_message(candidates),
        }
    }
}

fn guidance(optimize_for: OptimizeFor) -> &'static str {
    match optimize_for {
        OptimizeFor::Time => {
            "Minimize total travel time so technicians reach their jobs as early as possible."
        }
        OptimizeFor::Distance => {
            "Minimize total distance driven by grouping jobs that are close to each other."
        }
        OptimizeFor::Balanced => {
            "Balance travel efficiency against an even workload across technicians."
        }
    }
}

fn system_message(optimize_for: OptimizeFor) -> String {
    format!(
        "You are a dispatcher for a field-service company. Assign service jobs to technicians.\n\
         Goal: {}\n\
         Rules:\n\
         - Prefer technicians whose skills include the job's trade.\n\
         - Handle EMERGENCY and URGENT jobs first.\n\
         - Account for the jobs each technician already has today.\n\
         - Assign each job to at most one technician.\n\
         - Estimate travel time in whole minutes from the addresses given.\n\
         Respond with JSON only, no prose.",
        guidance(optimize_for)
    )
}

fn user_message(candidates: &Candidates) -> String {
    let mut out = String::from("JOBS:\n");
    for job in &candidates.jobs {
        let j = &job.item;
        let _ = writeln!(
            out,
            "{}. #{} \"{}\" | priority: {} | trade: {} | address: {} | duration: {} min",
            job.index,
            j.number,
            j.title,
            j.priority,
            j.trade_type,
            if j.address.is_empty() { "unknown" } else { j.address.as_str() },
            j.estimated_duration_minutes,
        );
    }

    out.push_str("\nTECHNICIANS:\n");
    for tech in &candidates.technicians {
        let t = &tech.item;
        let skills = if t.skills.is_empty() {
            "none".to_string()
        } else {
            t.skills
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        let _ = writeln!(
            out,
            "{}. {} | skills: {} | status: {} | jobs today: {}",
            tech.index, t.name, skills, t.status, t.assigned_job_count,
        );
    }

    let _ = write!(
        out,
        "\nUse the numbers above as jobIndex and techIndex. Return exactly this JSON shape:\n{RESPONSE_SCHEMA}"
    );
    out
}
