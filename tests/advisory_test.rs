//! Advisory prompt rendering, reply parsing, and the round-robin fallback.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use dispatch_rs::advisory::prompt::{AdvisoryPrompt, RESPONSE_SCHEMA};
use dispatch_rs::advisory::response::parse_plan;
use dispatch_rs::advisory::{
    AdvisoryAssignment, AdvisoryError, AdvisoryPlan, Advisor, RoundRobinAdvisor,
};
use dispatch_rs::engine::{Candidates, PlanPath, Planner};
use dispatch_rs::model::*;

fn job(number: &str, trade: TradeType) -> Job {
    Job {
        id: JobId::new(),
        number: number.to_string(),
        title: "No hot water".to_string(),
        priority: JobPriority::Urgent,
        trade_type: trade,
        estimated_duration_minutes: 45,
        address: String::new(),
        status: JobStatus::Pending,
        scheduled_start: None,
        created_at: Utc::now(),
    }
}

fn tech(name: &str, skills: &[TradeType]) -> Technician {
    Technician {
        id: TechnicianId::new(),
        name: name.to_string(),
        status: TechnicianStatus::Available,
        skills: skills.to_vec(),
        assigned_job_count: 0,
    }
}

fn with_travel(value: serde_json::Value) -> AdvisoryAssignment {
    AdvisoryAssignment {
        job_index: Some(1),
        tech_index: Some(1),
        estimated_travel_time: Some(value),
        reason: None,
    }
}

/// Advisor that hands back an already parsed reply.
struct Replay(AdvisoryPlan);

#[async_trait]
impl Advisor for Replay {
    fn name(&self) -> &str {
        "replay"
    }

    async fn propose(
        &self,
        _candidates: &Candidates,
        _optimize_for: OptimizeFor,
    ) -> Result<AdvisoryPlan, AdvisoryError> {
        Ok(self.0.clone())
    }
}

// ---------------------------------------------------------------------------
// Prompt
// ---------------------------------------------------------------------------

#[test]
fn prompt_enumerates_candidates_by_index() {
    let mut heater = job("J-1042", TradeType::Plumbing);
    heater.address = "14 Harbor Rd".to_string();
    let mut ana = tech("Ana Ruiz", &[TradeType::Plumbing, TradeType::Hvac]);
    ana.assigned_job_count = 2;
    let candidates = Candidates::from_lists(
        vec![heater, job("J-1043", TradeType::Electrical)],
        vec![ana, tech("Ben Cho", &[])],
    );

    let prompt = AdvisoryPrompt::render(&candidates, OptimizeFor::Balanced);

    assert!(prompt.user.contains(
        "1. #J-1042 \"No hot water\" | priority: URGENT | trade: PLUMBING | address: 14 Harbor Rd | duration: 45 min"
    ));
    assert!(prompt.user.contains("2. #J-1043"));
    assert!(prompt.user.contains("address: unknown"));
    assert!(
        prompt
            .user
            .contains("1. Ana Ruiz | skills: PLUMBING, HVAC | status: AVAILABLE | jobs today: 2")
    );
    assert!(prompt.user.contains("2. Ben Cho | skills: none"));
    assert!(prompt.user.ends_with(RESPONSE_SCHEMA));
    assert!(prompt.system.contains("JSON only"));
}

#[test]
fn prompt_guidance_follows_the_goal() {
    let candidates = Candidates::from_lists(vec![job("J-1", TradeType::Hvac)], vec![tech("Ana", &[])]);

    let time = AdvisoryPrompt::render(&candidates, OptimizeFor::Time);
    let distance = AdvisoryPrompt::render(&candidates, OptimizeFor::Distance);
    let balanced = AdvisoryPrompt::render(&candidates, OptimizeFor::Balanced);

    assert!(time.system.contains("travel time"));
    assert!(distance.system.contains("distance"));
    assert!(balanced.system.contains("workload"));
    assert_eq!(time.user, distance.user);
}

// ---------------------------------------------------------------------------
// Reply parsing
// ---------------------------------------------------------------------------

#[test]
fn bare_json_reply_parses() {
    let plan = parse_plan(
        r#"{"assignments":[{"jobIndex":1,"techIndex":2,"estimatedTravelTime":18,"reason":"Nearby"}],
            "unassignedJobIndexes":[2],"warnings":["Tight schedule"]}"#,
    )
    .unwrap();

    assert_eq!(plan.assignments.len(), 1);
    assert_eq!(plan.assignments[0].job_index, Some(1));
    assert_eq!(plan.assignments[0].tech_index, Some(2));
    assert_eq!(plan.assignments[0].travel_minutes(), Some(18));
    assert_eq!(plan.unassigned_job_indexes, Some(vec![json!(2)]));
    assert_eq!(plan.warnings, vec!["Tight schedule".to_string()]);
}

#[test]
fn fenced_reply_parses() {
    let raw = "```json\n{\"assignments\": [{\"jobIndex\": 1, \"techIndex\": 1}]}\n```\n";
    let plan = parse_plan(raw).unwrap();
    assert_eq!(plan.assignments.len(), 1);
    assert!(plan.unassigned_job_indexes.is_none());
    assert_eq!(plan.assignments[0].travel_minutes(), None);
}

#[test]
fn oversized_index_only_loses_its_own_entry() {
    let plan = parse_plan(
        r#"{"assignments":[
            {"jobIndex":1,"techIndex":1,"estimatedTravelTime":12},
            {"jobIndex":99999999999999999999,"techIndex":1,"estimatedTravelTime":5},
            {"jobIndex":2,"techIndex":18446744073709551615}
        ],"unassignedJobIndexes":[99999999999999999999]}"#,
    )
    .unwrap();

    assert_eq!(plan.assignments.len(), 3);
    assert_eq!(plan.assignments[0].job_index, Some(1));
    assert_eq!(plan.assignments[1].job_index, None);
    assert_eq!(plan.assignments[2].tech_index, None);
}

#[test]
fn fractional_index_is_malformed() {
    assert!(matches!(
        parse_plan(r#"{"assignments":[{"jobIndex":1.5,"techIndex":1}]}"#),
        Err(AdvisoryError::Malformed(_))
    ));
}

#[tokio::test]
async fn parsed_reply_with_oversized_index_keeps_valid_entries() {
    let plan = parse_plan(
        r#"{"assignments":[
            {"jobIndex":1,"techIndex":1,"estimatedTravelTime":12},
            {"jobIndex":99999999999999999999,"techIndex":1}
        ]}"#,
    )
    .unwrap();
    let candidates = Candidates::from_lists(
        vec![job("J-1", TradeType::Hvac), job("J-2", TradeType::Hvac)],
        vec![tech("Ana", &[TradeType::Hvac])],
    );

    let outcome = Planner::new(Arc::new(Replay(plan)))
        .plan(&candidates, OptimizeFor::Balanced, Utc::now())
        .await
        .unwrap();

    assert_eq!(outcome.path, PlanPath::Advisory);
    assert!(outcome.warnings.is_empty());
    assert_eq!(outcome.proposals.len(), 1);
    assert_eq!(outcome.proposals[0].job_number, "J-1");
    assert_eq!(outcome.proposals[0].estimated_travel_minutes, 12);
    assert_eq!(outcome.unassigned_count, 1);
}

#[test]
fn reply_without_assignments_is_malformed() {
    assert!(matches!(
        parse_plan(r#"{"warnings": []}"#),
        Err(AdvisoryError::Malformed(_))
    ));
}

#[test]
fn prose_and_empty_replies_are_malformed() {
    for raw in ["", "   ", "```json\n```", "Sure! Here is the plan you asked for."] {
        assert!(
            matches!(parse_plan(raw), Err(AdvisoryError::Malformed(_))),
            "expected malformed for {raw:?}"
        );
    }
}

#[test]
fn travel_time_accepts_numbers_and_numeric_strings() {
    assert_eq!(with_travel(json!(25)).travel_minutes(), Some(25));
    assert_eq!(with_travel(json!(12.6)).travel_minutes(), Some(13));
    assert_eq!(with_travel(json!(" 40 ")).travel_minutes(), Some(40));
    assert_eq!(with_travel(json!(0)).travel_minutes(), Some(0));
}

#[test]
fn travel_time_rejects_unusable_values() {
    assert_eq!(with_travel(json!(-5)).travel_minutes(), None);
    assert_eq!(with_travel(json!("about 20")).travel_minutes(), None);
    assert_eq!(with_travel(json!(null)).travel_minutes(), None);
    assert_eq!(with_travel(json!([20])).travel_minutes(), None);
    assert_eq!(with_travel(json!(1e12)).travel_minutes(), None);
}

// ---------------------------------------------------------------------------
// Round-robin fallback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn round_robin_stops_when_technicians_run_out() {
    let candidates = Candidates::from_lists(
        vec![
            job("J-1", TradeType::General),
            job("J-2", TradeType::General),
            job("J-3", TradeType::General),
        ],
        vec![tech("Ana", &[TradeType::General]), tech("Ben", &[TradeType::General])],
    );

    let plan = RoundRobinAdvisor
        .propose(&candidates, OptimizeFor::Balanced)
        .await
        .unwrap();

    let pairs: Vec<(Option<i64>, Option<i64>)> = plan
        .assignments
        .iter()
        .map(|a| (a.job_index, a.tech_index))
        .collect();
    assert_eq!(pairs, vec![(Some(1), Some(1)), (Some(2), Some(2))]);
    assert_eq!(plan.unassigned_job_indexes, Some(vec![json!(3)]));
    assert!(plan.warnings.is_empty());
}

#[tokio::test]
async fn round_robin_prefers_a_skilled_technician_over_the_cursor() {
    let candidates = Candidates::from_lists(
        vec![job("J-1", TradeType::Hvac), job("J-2", TradeType::Plumbing)],
        vec![tech("Ana", &[TradeType::Plumbing]), tech("Ben", &[TradeType::Hvac])],
    );

    let plan = RoundRobinAdvisor
        .propose(&candidates, OptimizeFor::Time)
        .await
        .unwrap();

    // J-1 skips Ana for Ben; J-2 then sits on Ben's cursor slot and finds Ana.
    assert_eq!(plan.assignments[0].tech_index, Some(2));
    assert_eq!(plan.assignments[1].tech_index, Some(1));
    assert_eq!(
        plan.assignments[0].reason.as_deref(),
        Some("Skill match: Ben is qualified for HVAC work")
    );
}

#[tokio::test]
async fn round_robin_travel_stays_in_range() {
    let jobs = (0..50).map(|n| job(&format!("J-{n}"), TradeType::General)).collect();
    let technicians = (0..50).map(|n| tech(&format!("T-{n}"), &[])).collect();
    let candidates = Candidates::from_lists(jobs, technicians);

    let plan = RoundRobinAdvisor
        .propose(&candidates, OptimizeFor::Balanced)
        .await
        .unwrap();

    assert_eq!(plan.assignments.len(), 50);
    for entry in &plan.assignments {
        let minutes = entry.travel_minutes().unwrap();
        assert!((15..=34).contains(&minutes), "travel {minutes} out of range");
    }
}
