//! Job queries: dispatch candidates and lifecycle transitions.

use opentelemetry::KeyValue;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::*;
use crate::store::validate_transition;
use crate::telemetry::metrics;

const JOB_COLUMNS: &str = "j.id, j.number, j.title, j.priority, j.trade_type, \
     j.estimated_duration_minutes, j.address, j.status, j.scheduled_start, j.created_at";

impl super::Db {
    /// Insert a job for a company. Jobs normally come from the surrounding
    /// CRUD system; this exists for seeding and tests.
    pub async fn create_job(&self, company: CompanyId, job: &Job) -> Result<Job> {
        let duration = i32::try_from(job.estimated_duration_minutes).map_err(|_| {
            Error::InvalidValue(format!("estimated duration {}", job.estimated_duration_minutes))
        })?;
        sqlx::query(
            "INSERT INTO jobs (id, company_id, number, title, priority, trade_type, estimated_duration_minutes, address, status, scheduled_start, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)",
        )
        .bind(job.id.0)
        .bind(company.0)
        .bind(&job.number)
        .bind(&job.title)
        .bind(job.priority.as_str())
        .bind(job.trade_type.as_str())
        .bind(duration)
        .bind(&job.address)
        .bind(job.status.as_str())
        .bind(job.scheduled_start)
        .bind(job.created_at)
        .execute(&self.pool)
        .await?;

        self.get_job(job.id).await
    }

    /// Get a job by ID.
    pub async fn get_job(&self, id: JobId) -> Result<Job> {
        let row: Option<JobRow> =
            sqlx::query_as(&format!("SELECT {JOB_COLUMNS} FROM jobs j WHERE j.id = $1"))
                .bind(id.0)
                .fetch_optional(&self.pool)
                .await?;

        row.ok_or_else(|| Error::NotFound(format!("job {id}")))?
            .try_into_job()
    }

    /// Dispatchable jobs without any assignment, scheduled in the window or
    /// not scheduled at all.
    pub(crate) async fn list_unassigned_jobs(
        &self,
        company: CompanyId,
        window: PlanningWindow,
    ) -> Result<Vec<Job>> {
        let rows: Vec<JobRow> = sqlx::query_as(&format!(
            "SELECT {JOB_COLUMNS}
             FROM jobs j
             WHERE j.company_id = $1
             AND j.status IN ('PENDING', 'SCHEDULED')
             AND NOT EXISTS (SELECT 1 FROM assignments a WHERE a.job_id = j.id)
             AND (j.scheduled_start IS NULL OR (j.scheduled_start >= $2 AND j.scheduled_start < $3))
             ORDER BY
                CASE j.priority
                    WHEN 'EMERGENCY' THEN 0
                    WHEN 'URGENT' THEN 1
                    WHEN 'HIGH' THEN 2
                    WHEN 'NORMAL' THEN 3
                    ELSE 4
                END,
                j.scheduled_start ASC NULLS LAST,
                j.created_at ASC"
        ))
        .bind(company.0)
        .bind(window.start)
        .bind(window.end)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(JobRow::try_into_job).collect()
    }

    /// Transition a job's status with optimistic concurrency.
    pub(crate) async fn transition_job_status(
        &self,
        id: JobId,
        from: JobStatus,
        to: JobStatus,
    ) -> Result<bool> {
        validate_transition(from, to)?;

        let rows_affected = sqlx::query(
            "UPDATE jobs SET status = $1, updated_at = now() WHERE id = $2 AND status = $3",
        )
        .bind(to.as_str())
        .bind(id.0)
        .bind(from.as_str())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected > 0 {
            metrics::job_transitions().add(
                1,
                &[
                    KeyValue::new("from", from.as_str()),
                    KeyValue::new("to", to.as_str()),
                ],
            );
        }

        Ok(rows_affected > 0)
    }
}

/// Internal row type for sqlx::FromRow.
#[derive(sqlx::FromRow)]
struct JobRow {
    id: Uuid,
    number: String,
    title: String,
    priority: String,
    trade_type: String,
    estimated_duration_minutes: i32,
    address: String,
    status: String,
    scheduled_start: Option<chrono::DateTime<chrono::Utc>>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl JobRow {
    fn try_into_job(self) -> Result<Job> {
        Ok(Job {
            id: JobId(self.id),
            number: self.number,
            title: self.title,
            priority: self.priority.parse()?,
            trade_type: self.trade_type.parse()?,
            estimated_duration_minutes: self.estimated_duration_minutes.max(0) as u32,
            address: self.address,
            status: self.status.parse()?,
            scheduled_start: self.scheduled_start,
            created_at: self.created_at,
        })
    }
}
