//! Database connection pool, migrations, and health check.
//!
//! [`Db`] is the Postgres-backed [`EntityStore`]: the jobs, technicians and
//! assignments tables of the field-service schema.

pub mod assignments;
pub mod jobs;
pub mod technicians;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::error::Result;
use crate::model::*;
use crate::store::EntityStore;

/// Database handle. Owns the connection pool shared across all modules.
pub struct Db {
    pool: PgPool,
}

impl Db {
    /// Connect to Postgres and create a connection pool.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(url)
            .await?;
        Ok(Self { pool })
    }

    /// Run all pending migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Simple health check: run a SELECT 1.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl EntityStore for Db {
    async fn unassigned_jobs(&self, company: CompanyId, window: PlanningWindow) -> Result<Vec<Job>> {
        self.list_unassigned_jobs(company, window).await
    }

    async fn available_technicians(
        &self,
        company: CompanyId,
        window: PlanningWindow,
    ) -> Result<Vec<Technician>> {
        self.list_available_technicians(company, window).await
    }

    async fn find_assignment(
        &self,
        job: JobId,
        technician: TechnicianId,
    ) -> Result<Option<Assignment>> {
        self.get_assignment(job, technician).await
    }

    async fn create_assignment(&self, new: NewAssignment) -> Result<AssignmentWrite> {
        self.insert_assignment(new).await
    }

    async fn assign_and_schedule(&self, new: NewAssignment) -> Result<AssignmentWrite> {
        self.insert_assignment_and_schedule(new).await
    }

    async fn transition_job(&self, job: JobId, from: JobStatus, to: JobStatus) -> Result<bool> {
        self.transition_job_status(job, from, to).await
    }
}
