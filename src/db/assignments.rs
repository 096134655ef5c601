//! Assignment writes with pair-level idempotency.

use opentelemetry::KeyValue;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::*;
use crate::telemetry::metrics;

const INSERT_ASSIGNMENT: &str = "INSERT INTO assignments (id, job_id, technician_id, is_primary, assigned_at)
     VALUES ($1, $2, $3, $4, now())
     ON CONFLICT (job_id, technician_id) DO NOTHING
     RETURNING id, job_id, technician_id, is_primary, assigned_at";

/// An assignment joined with the job and technician it links, for listings.
#[derive(Debug, Clone)]
pub struct AssignmentListing {
    pub assignment: Assignment,
    pub job_number: String,
    pub job_status: String,
    pub technician_name: String,
}

impl super::Db {
    /// Get the assignment for a (job, technician) pair, if any.
    pub(crate) async fn get_assignment(
        &self,
        job: JobId,
        technician: TechnicianId,
    ) -> Result<Option<Assignment>> {
        let row: Option<AssignmentRow> = sqlx::query_as(
            "SELECT id, job_id, technician_id, is_primary, assigned_at
             FROM assignments WHERE job_id = $1 AND technician_id = $2",
        )
        .bind(job.0)
        .bind(technician.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Assignment::from))
    }

    /// Insert an assignment.
    ///
    /// The unique constraint on (job_id, technician_id) settles concurrent
    /// writers: the loser gets `Existing` with the winner's row.
    pub(crate) async fn insert_assignment(&self, new: NewAssignment) -> Result<AssignmentWrite> {
        let inserted: Option<AssignmentRow> = sqlx::query_as(INSERT_ASSIGNMENT)
            .bind(Uuid::new_v4())
            .bind(new.job_id.0)
            .bind(new.technician_id.0)
            .bind(new.is_primary)
            .fetch_optional(&self.pool)
            .await?;

        match inserted {
            Some(row) => Ok(AssignmentWrite::Created(row.into())),
            None => self.existing_assignment(&new).await,
        }
    }

    /// Insert an assignment and move its job from PENDING to SCHEDULED in
    /// one transaction.
    ///
    /// Either both writes land or neither does. A job in any other status
    /// keeps it. An already linked pair writes nothing and returns
    /// `Existing`.
    pub(crate) async fn insert_assignment_and_schedule(
        &self,
        new: NewAssignment,
    ) -> Result<AssignmentWrite> {
        let mut tx = self.pool.begin().await?;

        let inserted: Option<AssignmentRow> = sqlx::query_as(INSERT_ASSIGNMENT)
            .bind(Uuid::new_v4())
            .bind(new.job_id.0)
            .bind(new.technician_id.0)
            .bind(new.is_primary)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = inserted else {
            tx.rollback().await?;
            return self.existing_assignment(&new).await;
        };

        let scheduled = sqlx::query(
            "UPDATE jobs SET status = $1, updated_at = now() WHERE id = $2 AND status = $3",
        )
        .bind(JobStatus::Scheduled.as_str())
        .bind(new.job_id.0)
        .bind(JobStatus::Pending.as_str())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        if scheduled > 0 {
            metrics::job_transitions().add(
                1,
                &[
                    KeyValue::new("from", JobStatus::Pending.as_str()),
                    KeyValue::new("to", JobStatus::Scheduled.as_str()),
                ],
            );
        }

        Ok(AssignmentWrite::Created(row.into()))
    }

    /// The row that won a pair conflict.
    async fn existing_assignment(&self, new: &NewAssignment) -> Result<AssignmentWrite> {
        self.get_assignment(new.job_id, new.technician_id)
            .await?
            .map(AssignmentWrite::Existing)
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "assignment for job {} and technician {}",
                    new.job_id, new.technician_id
                ))
            })
    }

    /// Most recent assignments for a company.
    pub async fn list_assignments(
        &self,
        company: CompanyId,
        limit: i64,
    ) -> Result<Vec<AssignmentListing>> {
        let rows: Vec<(Uuid, Uuid, Uuid, bool, chrono::DateTime<chrono::Utc>, String, String, String)> =
            sqlx::query_as(
                "SELECT a.id, a.job_id, a.technician_id, a.is_primary, a.assigned_at, j.number, j.status, t.name
                 FROM assignments a
                 JOIN jobs j ON j.id = a.job_id
                 JOIN technicians t ON t.id = a.technician_id
                 WHERE j.company_id = $1
                 ORDER BY a.assigned_at DESC
                 LIMIT $2",
            )
            .bind(company.0)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(
                |(id, job_id, technician_id, is_primary, assigned_at, job_number, job_status, technician_name)| {
                    AssignmentListing {
                        assignment: Assignment {
                            id: AssignmentId(id),
                            job_id: JobId(job_id),
                            technician_id: TechnicianId(technician_id),
                            is_primary,
                            assigned_at,
                        },
                        job_number,
                        job_status,
                        technician_name,
                    }
                },
            )
            .collect())
    }
}

/// Internal row type for sqlx::FromRow.
#[derive(sqlx::FromRow)]
struct AssignmentRow {
    id: Uuid,
    job_id: Uuid,
    technician_id: Uuid,
    is_primary: bool,
    assigned_at: chrono::DateTime<chrono::Utc>,
}

impl From<AssignmentRow> for Assignment {
    fn from(row: AssignmentRow) -> Self {
        Self {
            id: AssignmentId(row.id),
            job_id: JobId(row.job_id),
            technician_id: TechnicianId(row.technician_id),
            is_primary: row.is_primary,
            assigned_at: row.assigned_at,
        }
    }
}
