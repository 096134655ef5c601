//! Service jobs and their lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::JobId;
use crate::error::Error;

// ---------------------------------------------------------------------------
// Job
// ---------------------------------------------------------------------------

/// A unit of field work waiting for, or already given to, a technician.
///
/// Serialized in camelCase so that demo callers can post jobs directly;
/// everything except `number` and `title` has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(default)]
    pub id: JobId,

    /// Human-readable job number shown to dispatchers (e.g. "J-1042").
    pub number: String,

    pub title: String,

    #[serde(default)]
    pub priority: JobPriority,

    #[serde(default)]
    pub trade_type: TradeType,

    /// Estimated on-site duration in minutes.
    #[serde(default = "default_duration", rename = "estimatedDuration")]
    pub estimated_duration_minutes: u32,

    /// Display location. Never geocoded by the engine.
    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub status: JobStatus,

    #[serde(default)]
    pub scheduled_start: Option<DateTime<Utc>>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn default_duration() -> u32 {
    60
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Created, nobody assigned yet.
    #[default]
    Pending,
    /// A technician has been assigned.
    Scheduled,
    /// Technician is on the way.
    Dispatched,
    InProgress,
    /// Paused on site (parts, customer approval). Resumes to in-progress.
    OnHold,
    /// Terminal.
    Completed,
    /// Terminal.
    Cancelled,
}

impl JobStatus {
    /// Can transition from self to `to`?
    pub fn can_transition_to(self, to: JobStatus) -> bool {
        use JobStatus::*;
        if to == Cancelled {
            return !self.is_terminal();
        }
        matches!(
            (self, to),
            (Pending, Scheduled)
                | (Scheduled, Dispatched)
                | (Dispatched, InProgress)
                | (InProgress, Completed)
                | (InProgress, OnHold)
                | (OnHold, InProgress)
        )
    }

    /// Is this a terminal state?
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Cancelled)
    }

    /// States in which a job without assignments is a dispatch candidate.
    pub fn is_dispatchable(self) -> bool {
        matches!(self, JobStatus::Pending | JobStatus::Scheduled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Scheduled => "SCHEDULED",
            JobStatus::Dispatched => "DISPATCHED",
            JobStatus::InProgress => "IN_PROGRESS",
            JobStatus::OnHold => "ON_HOLD",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JobStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(JobStatus::Pending),
            "SCHEDULED" => Ok(JobStatus::Scheduled),
            "DISPATCHED" => Ok(JobStatus::Dispatched),
            "IN_PROGRESS" => Ok(JobStatus::InProgress),
            "ON_HOLD" => Ok(JobStatus::OnHold),
            "COMPLETED" => Ok(JobStatus::Completed),
            "CANCELLED" => Ok(JobStatus::Cancelled),
            _ => Err(Error::InvalidValue(format!("unknown job status: {s}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Job urgency. Variant order is the ordering: `Low < ... < Emergency`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobPriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
    Emergency,
}

impl JobPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            JobPriority::Low => "LOW",
            JobPriority::Normal => "NORMAL",
            JobPriority::High => "HIGH",
            JobPriority::Urgent => "URGENT",
            JobPriority::Emergency => "EMERGENCY",
        }
    }
}

impl std::fmt::Display for JobPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JobPriority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LOW" => Ok(JobPriority::Low),
            "NORMAL" => Ok(JobPriority::Normal),
            "HIGH" => Ok(JobPriority::High),
            "URGENT" => Ok(JobPriority::Urgent),
            "EMERGENCY" => Ok(JobPriority::Emergency),
            _ => Err(Error::InvalidValue(format!("unknown job priority: {s}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Trade
// ---------------------------------------------------------------------------

/// Trade category of a job, and the unit of technician skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeType {
    Hvac,
    Plumbing,
    Electrical,
    #[default]
    General,
}

impl TradeType {
    pub fn as_str(self) -> &'static str {
        match self {
            TradeType::Hvac => "HVAC",
            TradeType::Plumbing => "PLUMBING",
            TradeType::Electrical => "ELECTRICAL",
            TradeType::General => "GENERAL",
        }
    }
}

impl std::fmt::Display for TradeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TradeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "HVAC" => Ok(TradeType::Hvac),
            "PLUMBING" => Ok(TradeType::Plumbing),
            "ELECTRICAL" => Ok(TradeType::Electrical),
            "GENERAL" => Ok(TradeType::General),
            _ => Err(Error::InvalidValue(format!("unknown trade type: {s}"))),
        }
    }
}
