//! Technician queries.

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::*;

impl super::Db {
    /// Insert a technician for a company (seeding and tests).
    pub async fn create_technician(&self, company: CompanyId, tech: &Technician) -> Result<()> {
        let skills: Vec<&str> = tech.skills.iter().map(|s| s.as_str()).collect();
        sqlx::query(
            "INSERT INTO technicians (id, company_id, name, status, skills)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(tech.id.0)
        .bind(company.0)
        .bind(&tech.name)
        .bind(tech.status.as_str())
        .bind(&skills)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Dispatchable technicians with their assignment count for the window.
    ///
    /// An assignment counts toward the window when its job is scheduled in
    /// it, or, for unscheduled jobs, when it was made in it.
    pub(crate) async fn list_available_technicians(
        &self,
        company: CompanyId,
        window: PlanningWindow,
    ) -> Result<Vec<Technician>> {
        let rows: Vec<TechnicianRow> = sqlx::query_as(
            "SELECT t.id, t.name, t.status, t.skills,
                (SELECT COUNT(*)
                 FROM assignments a
                 JOIN jobs j ON j.id = a.job_id
                 WHERE a.technician_id = t.id
                 AND COALESCE(j.scheduled_start, a.assigned_at) >= $2
                 AND COALESCE(j.scheduled_start, a.assigned_at) < $3) AS assigned_job_count
             FROM technicians t
             WHERE t.company_id = $1
             AND t.status IN ('AVAILABLE', 'ON_JOB')
             ORDER BY assigned_job_count ASC, t.name ASC",
        )
        .bind(company.0)
        .bind(window.start)
        .bind(window.end)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TechnicianRow::try_into_technician).collect()
    }
}

/// Internal row type for sqlx::FromRow.
#[derive(sqlx::FromRow)]
struct TechnicianRow {
    id: Uuid,
    name: String,
    status: String,
    skills: Vec<String>,
    assigned_job_count: i64,
}

impl TechnicianRow {
    fn try_into_technician(self) -> Result<Technician> {
        let skills = self
            .skills
            .iter()
            .map(|s| s.parse())
            .collect::<Result<Vec<TradeType>>>()?;

        Ok(Technician {
            id: TechnicianId(self.id),
            name: self.name,
            status: self.status.parse()?,
            skills,
            assigned_job_count: u32::try_from(self.assigned_job_count).map_err(|_| {
                Error::InvalidValue(format!("assignment count {}", self.assigned_job_count))
            })?,
        })
    }
}
