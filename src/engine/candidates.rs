//! Candidate building: the indexed job and technician lists a planning cycle
//! works on.

use crate::error::Result;
use crate::model::*;
use crate::store::EntityStore;

/// Warning returned when there is nothing to plan.
pub const NO_JOBS_WARNING: &str = "No unassigned jobs found for the selected date";
/// Warning returned when nobody can take work.
pub const NO_TECHNICIANS_WARNING: &str = "No available technicians found";

/// A candidate with its stable 1-based index, the handle used in advisory
/// prompts and replies.
#[derive(Debug, Clone, PartialEq)]
pub struct Indexed<T> {
    pub index: usize,
    pub item: T,
}

/// The jobs and technicians eligible for one planning cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidates {
    pub jobs: Vec<Indexed<Job>>,
    pub technicians: Vec<Indexed<Technician>>,
}

impl Candidates {
    /// Index caller-supplied lists as given, without filtering.
    pub fn from_lists(jobs: Vec<Job>, technicians: Vec<Technician>) -> Self {
        Self {
            jobs: index_all(jobs),
            technicians: index_all(technicians),
        }
    }

    /// Read the candidates for `company` in `window` from the store.
    ///
    /// Technicians are not queried when there are no jobs.
    pub async fn load(
        store: &dyn EntityStore,
        company: CompanyId,
        window: PlanningWindow,
    ) -> Result<Self> {
        let jobs = store.unassigned_jobs(company, window).await?;
        if jobs.is_empty() {
            return Ok(Self::default());
        }
        let technicians = store.available_technicians(company, window).await?;
        Ok(Self::from_lists(jobs, technicians))
    }

    /// Resolve a 1-based job index.
    pub fn job(&self, index: i64) -> Option<&Job> {
        lookup(&self.jobs, index)
    }

    /// Resolve a 1-based technician index.
    pub fn technician(&self, index: i64) -> Option<&Technician> {
        lookup(&self.technicians, index)
    }

    /// If planning cannot proceed, the warning and the number of jobs left
    /// unassigned.
    pub fn short_circuit(&self) -> Option<(&'static str, usize)> {
        if self.jobs.is_empty() {
            Some((NO_JOBS_WARNING, 0))
        } else if self.technicians.is_empty() {
            Some((NO_TECHNICIANS_WARNING, self.jobs.len()))
        } else {
            None
        }
    }
}

fn index_all<T>(items: Vec<T>) -> Vec<Indexed<T>> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| Indexed { index: i + 1, item })
        .collect()
}

fn lookup<T>(items: &[Indexed<T>], index: i64) -> Option<&T> {
    let position = usize::try_from(index).ok()?.checked_sub(1)?;
    items.get(position).map(|c| &c.item)
}
