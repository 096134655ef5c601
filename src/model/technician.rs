//! Field technicians.

use serde::{Deserialize, Serialize};

use super::TechnicianId;
use super::job::TradeType;
use crate::error::Error;

/// A technician as seen by one planning cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technician {
    #[serde(default)]
    pub id: TechnicianId,

    pub name: String,

    #[serde(default)]
    pub status: TechnicianStatus,

    /// Trades this technician is qualified for.
    #[serde(default)]
    pub skills: Vec<TradeType>,

    /// Assignments already held inside the planning window. Filled by the
    /// store; supplied by the caller in demo mode.
    #[serde(default, alias = "currentJobCount")]
    pub assigned_job_count: u32,
}

impl Technician {
    pub fn has_skill(&self, trade: TradeType) -> bool {
        self.skills.contains(&trade)
    }
}

/// Operational status of a technician.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TechnicianStatus {
    #[default]
    Available,
    OnJob,
    EnRoute,
    Break,
    OffDuty,
}

impl TechnicianStatus {
    /// Statuses eligible to receive new work in a planning cycle.
    pub fn is_dispatchable(self) -> bool {
        matches!(self, TechnicianStatus::Available | TechnicianStatus::OnJob)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TechnicianStatus::Available => "AVAILABLE",
            TechnicianStatus::OnJob => "ON_JOB",
            TechnicianStatus::EnRoute => "EN_ROUTE",
            TechnicianStatus::Break => "BREAK",
            TechnicianStatus::OffDuty => "OFF_DUTY",
        }
    }
}

impl std::fmt::Display for TechnicianStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TechnicianStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AVAILABLE" => Ok(TechnicianStatus::Available),
            "ON_JOB" => Ok(TechnicianStatus::OnJob),
            "EN_ROUTE" => Ok(TechnicianStatus::EnRoute),
            "BREAK" => Ok(TechnicianStatus::Break),
            "OFF_DUTY" => Ok(TechnicianStatus::OffDuty),
            _ => Err(Error::InvalidValue(format!("unknown technician status: {s}"))),
        }
    }
}
