//! Caller-facing planning request/response types.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::assignment::AssignmentProposal;
use super::job::Job;
use super::technician::Technician;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Optimization goal
// ---------------------------------------------------------------------------

/// What the advisory should optimize for. Only changes advisory wording;
/// the fallback heuristic ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizeFor {
    Time,
    Distance,
    #[default]
    Balanced,
}

impl OptimizeFor {
    pub fn as_str(self) -> &'static str {
        match self {
            OptimizeFor::Time => "time",
            OptimizeFor::Distance => "distance",
            OptimizeFor::Balanced => "balanced",
        }
    }
}

impl std::fmt::Display for OptimizeFor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OptimizeFor {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "time" => Ok(OptimizeFor::Time),
            "distance" => Ok(OptimizeFor::Distance),
            "balanced" => Ok(OptimizeFor::Balanced),
            _ => Err(Error::InvalidValue(format!(
                "optimizeFor must be time, distance or balanced, got {s}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

/// Half-open day window `[start, end)` a planning cycle covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanningWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl PlanningWindow {
    /// The UTC day of `date`: `[date 00:00, date+1 00:00)`.
    pub fn for_date(date: NaiveDate) -> Self {
        let start = date.and_time(NaiveTime::MIN).and_utc();
        Self {
            start,
            end: start + TimeDelta::days(1),
        }
    }

    /// Today's UTC window.
    pub fn today() -> Self {
        Self::for_date(Utc::now().date_naive())
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Body of a planning request. The company comes from the authenticated
/// caller, never from the body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningRequest {
    /// Target day; today when absent.
    #[serde(default)]
    pub date: Option<NaiveDate>,

    #[serde(default)]
    pub optimize_for: Option<OptimizeFor>,

    /// Plan over the inline `jobs`/`technicians` and persist nothing.
    #[serde(default)]
    pub demo: bool,

    #[serde(default)]
    pub jobs: Option<Vec<Job>>,

    #[serde(default)]
    pub technicians: Option<Vec<Technician>>,
}

/// A validated planning request.
#[derive(Debug, Clone)]
pub enum PlanningMode {
    /// Read candidates from the store and commit the result.
    Store {
        window: PlanningWindow,
        optimize_for: OptimizeFor,
    },
    /// Plan over caller-supplied data; nothing is read or written.
    Ephemeral {
        jobs: Vec<Job>,
        technicians: Vec<Technician>,
        optimize_for: OptimizeFor,
    },
}

impl PlanningRequest {
    /// Validate the request and decide which entry point serves it.
    pub fn into_mode(self) -> Result<PlanningMode> {
        let optimize_for = self.optimize_for.unwrap_or_default();

        if self.demo {
            let (Some(jobs), Some(technicians)) = (self.jobs, self.technicians) else {
                return Err(Error::InvalidRequest(
                    "demo mode requires both jobs and technicians".to_string(),
                ));
            };
            return Ok(PlanningMode::Ephemeral {
                jobs,
                technicians,
                optimize_for,
            });
        }

        if self.jobs.is_some() || self.technicians.is_some() {
            return Err(Error::InvalidRequest(
                "inline jobs and technicians are only accepted in demo mode".to_string(),
            ));
        }

        let window = match self.date {
            Some(date) => PlanningWindow::for_date(date),
            None => PlanningWindow::today(),
        };
        Ok(PlanningMode::Store {
            window,
            optimize_for,
        })
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Summary statistics over the final assignment list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanMetrics {
    pub total_travel_time: u32,
    pub avg_travel_time: u32,
    pub jobs_assigned: usize,
    pub unassigned_jobs: usize,
}

/// Result of one planning cycle. Always returned for best-effort outcomes;
/// only infrastructure faults surface as errors instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningResponse {
    pub assignments: Vec<AssignmentProposal>,
    pub metrics: PlanMetrics,
    pub warnings: Vec<String>,
}

impl PlanningResponse {
    /// A response with no assignments, e.g. when a candidate list is empty.
    pub fn empty(unassigned_jobs: usize, warning: impl Into<String>) -> Self {
        Self {
            assignments: Vec::new(),
            metrics: PlanMetrics {
                unassigned_jobs,
                ..PlanMetrics::default()
            },
            warnings: vec![warning.into()],
        }
    }
}
