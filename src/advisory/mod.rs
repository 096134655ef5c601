//! Assignment advisories.
//!
//! An [`Advisor`] looks at the indexed candidates of a planning cycle and
//! proposes job/technician pairs by index. The LLM-backed
//! [`AnthropicAdvisor`] is tried first; [`RoundRobinAdvisor`] is the
//! deterministic fallback the planner switches to on any advisory failure.

pub mod anthropic;
pub mod fallback;
pub mod prompt;
pub mod response;

pub use anthropic::AnthropicAdvisor;
pub use fallback::RoundRobinAdvisor;

use async_trait::async_trait;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::engine::Candidates;
use crate::model::OptimizeFor;

/// Why an advisory produced nothing usable. Never escapes the planner.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("advisory transport error: {0}")]
    Transport(String),

    #[error("advisory timed out after {0:?}")]
    Timeout(Duration),

    #[error("advisory response malformed: {0}")]
    Malformed(String),
}

/// Proposes assignments for one planning cycle.
#[async_trait]
pub trait Advisor: Send + Sync {
    /// Short name for logs and metrics (e.g. "anthropic", "round_robin").
    fn name(&self) -> &str;

    async fn propose(
        &self,
        candidates: &Candidates,
        optimize_for: OptimizeFor,
    ) -> Result<AdvisoryPlan, AdvisoryError>;
}

/// A plan expressed in candidate indexes. This is also the JSON contract the
/// LLM is asked to answer with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryPlan {
    pub assignments: Vec<AdvisoryAssignment>,

    /// Jobs the advisor chose to leave unassigned. `None` when not reported.
    /// Only ever counted, so entries are kept as raw JSON.
    #[serde(default)]
    pub unassigned_job_indexes: Option<Vec<serde_json::Value>>,

    #[serde(default)]
    pub warnings: Vec<String>,
}

/// One proposed pair. Indexes are 1-based and unchecked; the planner drops
/// entries that do not resolve to a candidate.
///
/// An integer index too large for `i64` reads as `None` so that only its own
/// entry is dropped. A non-integer index fails the whole reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryAssignment {
    #[serde(deserialize_with = "index")]
    pub job_index: Option<i64>,
    #[serde(deserialize_with = "index")]
    pub tech_index: Option<i64>,

    /// Minutes. Kept as raw JSON: LLMs send numbers, strings, or nothing.
    #[serde(default)]
    pub estimated_travel_time: Option<serde_json::Value>,

    #[serde(default)]
    pub reason: Option<String>,
}

impl AdvisoryAssignment {
    pub fn new(job_index: usize, tech_index: usize, travel_minutes: u32, reason: String) -> Self {
        Self {
            job_index: i64::try_from(job_index).ok(),
            tech_index: i64::try_from(tech_index).ok(),
            estimated_travel_time: Some(serde_json::Value::from(travel_minutes)),
            reason: Some(reason),
        }
    }

    /// Travel time as non-negative whole minutes, if the value is usable.
    pub fn travel_minutes(&self) -> Option<u32> {
        let minutes = match self.estimated_travel_time.as_ref()? {
            serde_json::Value::Number(n) => n.as_f64()?,
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        if !minutes.is_finite() || minutes < 0.0 || minutes > f64::from(u32::MAX) {
            return None;
        }
        Some(minutes.round() as u32)
    }
}

fn index<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(i) = number.as_i64() {
        return Ok(Some(i));
    }
    if number.is_u64() {
        return Ok(None);
    }
    match number.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 => {
            let fits = f >= i64::MIN as f64 && f < i64::MAX as f64;
            Ok(fits.then_some(f as i64))
        }
        _ => Err(D::Error::custom(format!("index must be an integer, got {number}"))),
    }
}
