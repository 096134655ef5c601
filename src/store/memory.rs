//! In-process entity store.

use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Reverse;
use tokio::sync::Mutex;

use super::{EntityStore, validate_transition};
use crate::error::{Error, Result};
use crate::model::*;

#[derive(Default)]
struct Inner {
    jobs: Vec<(CompanyId, Job)>,
    technicians: Vec<(CompanyId, Technician)>,
    assignments: Vec<Assignment>,
}

/// Entity store held entirely in memory.
///
/// Honors the same rules as the Postgres store, including one assignment per
/// (job, technician) pair.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_job(&self, company: CompanyId, job: Job) -> JobId {
        let id = job.id;
        self.inner.lock().await.jobs.push((company, job));
        id
    }

    pub async fn insert_technician(&self, company: CompanyId, technician: Technician) -> TechnicianId {
        let id = technician.id;
        self.inner.lock().await.technicians.push((company, technician));
        id
    }

    /// Get a job by ID.
    pub async fn job(&self, id: JobId) -> Result<Job> {
        self.inner
            .lock()
            .await
            .jobs
            .iter()
            .find(|(_, job)| job.id == id)
            .map(|(_, job)| job.clone())
            .ok_or_else(|| Error::NotFound(format!("job {id}")))
    }

    /// All assignments, in insertion order.
    pub async fn assignments(&self) -> Vec<Assignment> {
        self.inner.lock().await.assignments.clone()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn unassigned_jobs(&self, company: CompanyId, window: PlanningWindow) -> Result<Vec<Job>> {
        let inner = self.inner.lock().await;
        let mut jobs: Vec<Job> = inner
            .jobs
            .iter()
            .filter(|(owner, job)| {
                *owner == company
                    && job.status.is_dispatchable()
                    && job.scheduled_start.is_none_or(|at| window.contains(at))
                    && !inner.assignments.iter().any(|a| a.job_id == job.id)
            })
            .map(|(_, job)| job.clone())
            .collect();

        jobs.sort_by_key(|job| {
            (
                Reverse(job.priority),
                job.scheduled_start.is_none(),
                job.scheduled_start,
                job.created_at,
            )
        });
        Ok(jobs)
    }

    async fn available_technicians(
        &self,
        company: CompanyId,
        window: PlanningWindow,
    ) -> Result<Vec<Technician>> {
        let inner = self.inner.lock().await;
        let mut technicians: Vec<Technician> = inner
            .technicians
            .iter()
            .filter(|(owner, tech)| *owner == company && tech.status.is_dispatchable())
            .map(|(_, tech)| {
                let held = inner
                    .assignments
                    .iter()
                    .filter(|a| a.technician_id == tech.id)
                    .filter(|a| {
                        let scheduled = inner
                            .jobs
                            .iter()
                            .find(|(_, job)| job.id == a.job_id)
                            .and_then(|(_, job)| job.scheduled_start);
                        window.contains(scheduled.unwrap_or(a.assigned_at))
                    })
                    .count();
                Technician {
                    assigned_job_count: held as u32,
                    ..tech.clone()
                }
            })
            .collect();

        technicians.sort_by(|a, b| {
            a.assigned_job_count
                .cmp(&b.assigned_job_count)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(technicians)
    }

    async fn find_assignment(
        &self,
        job: JobId,
        technician: TechnicianId,
    ) -> Result<Option<Assignment>> {
        Ok(self
            .inner
            .lock()
            .await
            .assignments
            .iter()
            .find(|a| a.job_id == job && a.technician_id == technician)
            .cloned())
    }

    async fn create_assignment(&self, new: NewAssignment) -> Result<AssignmentWrite> {
        let mut inner = self.inner.lock().await;
        if let Some(existing) = inner
            .assignments
            .iter()
            .find(|a| a.job_id == new.job_id && a.technician_id == new.technician_id)
        {
            return Ok(AssignmentWrite::Existing(existing.clone()));
        }

        let assignment = Assignment {
            id: AssignmentId::new(),
            job_id: new.job_id,
            technician_id: new.technician_id,
            is_primary: new.is_primary,
            assigned_at: Utc::now(),
        };
        inner.assignments.push(assignment.clone());
        Ok(AssignmentWrite::Created(assignment))
    }

    async fn assign_and_schedule(&self, new: NewAssignment) -> Result<AssignmentWrite> {
        let mut inner = self.inner.lock().await;
        if let Some(existing) = inner
            .assignments
            .iter()
            .find(|a| a.job_id == new.job_id && a.technician_id == new.technician_id)
        {
            return Ok(AssignmentWrite::Existing(existing.clone()));
        }

        let (_, job) = inner
            .jobs
            .iter_mut()
            .find(|(_, job)| job.id == new.job_id)
            .ok_or_else(|| Error::NotFound(format!("job {}", new.job_id)))?;
        if job.status == JobStatus::Pending {
            job.status = JobStatus::Scheduled;
        }

        let assignment = Assignment {
            id: AssignmentId::new(),
            job_id: new.job_id,
            technician_id: new.technician_id,
            is_primary: new.is_primary,
            assigned_at: Utc::now(),
        };
        inner.assignments.push(assignment.clone());
        Ok(AssignmentWrite::Created(assignment))
    }

    async fn transition_job(&self, job: JobId, from: JobStatus, to: JobStatus) -> Result<bool> {
        validate_transition(from, to)?;

        let mut inner = self.inner.lock().await;
        let (_, stored) = inner
            .jobs
            .iter_mut()
            .find(|(_, stored)| stored.id == job)
            .ok_or_else(|| Error::NotFound(format!("job {job}")))?;

        if stored.status != from {
            return Ok(false);
        }
        stored.status = to;
        Ok(true)
    }
}
