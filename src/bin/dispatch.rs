//! dispatch CLI: operator interface to the dispatch assignment engine.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dispatch_rs::advisory::AnthropicAdvisor;
use dispatch_rs::config::secrets::{ExposeSecret, SecretString};
use dispatch_rs::config::{AdvisoryConfig, Config};
use dispatch_rs::db::Db;
use dispatch_rs::engine::{DispatchEngine, Planner, plan_ephemeral};
use dispatch_rs::llm::anthropic_client;
use dispatch_rs::model::{
    CompanyId, Job, OptimizeFor, PlanningRequest, PlanningResponse, Technician,
};
use dispatch_rs::telemetry::{TelemetryConfig, init_telemetry};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "dispatch", about = "Assign field-service jobs to technicians")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run pending database migrations
    Migrate,
    /// Run a planning cycle for a company and commit the assignments
    Plan {
        /// Company ID
        #[arg(long)]
        company: Uuid,
        /// Target day (YYYY-MM-DD), defaults to today (UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Optimization goal: time, distance or balanced
        #[arg(long, default_value = "balanced")]
        optimize_for: OptimizeFor,
    },
    /// Plan over jobs and technicians from a JSON file without persisting
    Demo {
        /// File containing {"jobs": [...], "technicians": [...]}
        #[arg(long)]
        input: PathBuf,
        /// Optimization goal: time, distance or balanced
        #[arg(long, default_value = "balanced")]
        optimize_for: OptimizeFor,
    },
    /// List recent assignments for a company
    Assignments {
        /// Company ID
        #[arg(long)]
        company: Uuid,
        /// Maximum rows to show
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
}

/// Input file for `dispatch demo`.
#[derive(Deserialize)]
struct DemoInput {
    jobs: Vec<Job>,
    technicians: Vec<Technician>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Migrate => {
            let config = Config::from_env()?;
            let db = Db::connect(config.database_url.expose_secret()).await?;
            db.migrate().await?;
            println!("Migrations applied.");
            Ok(())
        }
        Command::Plan {
            company,
            date,
            optimize_for,
        } => cmd_plan(CompanyId(company), date, optimize_for).await,
        Command::Demo {
            input,
            optimize_for,
        } => cmd_demo(input, optimize_for).await,
        Command::Assignments { company, limit } => {
            let config = Config::from_env()?;
            let db = Db::connect(config.database_url.expose_secret()).await?;
            cmd_assignments(&db, CompanyId(company), limit).await
        }
    }
}

/// Build the planner from config: advisory when a key is present,
/// round-robin only otherwise.
fn build_planner(config: &Config) -> anyhow::Result<Planner> {
    Ok(match &config.anthropic_api_key {
        Some(key) => {
            let client = anthropic_client(key)?;
            Planner::new(Arc::new(AnthropicAdvisor::new(
                client,
                config.advisory.clone(),
            )))
        }
        None => Planner::fallback_only(),
    })
}

async fn cmd_plan(
    company: CompanyId,
    date: Option<NaiveDate>,
    optimize_for: OptimizeFor,
) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let _guard = init_telemetry(TelemetryConfig {
        endpoint: config.otel_endpoint.clone(),
        service_name: "dispatch".to_string(),
        log_level: config.log_level.clone(),
    })?;

    let db = Db::connect(config.database_url.expose_secret()).await?;
    db.migrate().await?;

    let engine = DispatchEngine::new(Arc::new(db), build_planner(&config)?);
    let response = engine
        .dispatch(
            company,
            PlanningRequest {
                date,
                optimize_for: Some(optimize_for),
                ..PlanningRequest::default()
            },
        )
        .await?;

    print_response(&response)
}

async fn cmd_demo(input: PathBuf, optimize_for: OptimizeFor) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(&input).await?;
    let demo: DemoInput = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("bad demo input {}: {e}", input.display()))?;

    // Demo mode needs no database; only the advisory and logging vars are read.
    let _guard = init_telemetry(TelemetryConfig {
        endpoint: std::env::var("OTEL_ENDPOINT").ok(),
        service_name: "dispatch".to_string(),
        log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".to_string()),
    })?;

    let planner = match std::env::var("ANTHROPIC_API_KEY") {
        Ok(key) if !key.is_empty() => {
            let key = SecretString::from(key);
            Planner::new(Arc::new(AnthropicAdvisor::new(
                anthropic_client(&key)?,
                AdvisoryConfig::from_env()?,
            )))
        }
        _ => Planner::fallback_only(),
    };

    let response = plan_ephemeral(&planner, demo.jobs, demo.technicians, optimize_for).await?;
    print_response(&response)
}

async fn cmd_assignments(db: &Db, company: CompanyId, limit: i64) -> anyhow::Result<()> {
    let rows = db.list_assignments(company, limit).await?;

    if rows.is_empty() {
        println!("No assignments found.");
        return Ok(());
    }

    println!(
        "{:<8}  {:<12}  {:<12}  {:<24}  {:<7}  ASSIGNED",
        "ID", "JOB", "STATUS", "TECHNICIAN", "PRIMARY"
    );
    println!("{}", "-".repeat(90));

    for row in &rows {
        let name = if row.technician_name.chars().count() > 24 {
            row.technician_name.chars().take(24).collect::<String>()
        } else {
            row.technician_name.clone()
        };
        println!(
            "{:<8}  {:<12}  {:<12}  {:<24}  {:<7}  {}",
            row.assignment.id.to_string(),
            row.job_number,
            row.job_status,
            name,
            if row.assignment.is_primary { "yes" } else { "no" },
            row.assignment.assigned_at.format("%Y-%m-%d %H:%M")
        );
    }

    println!("\n{} assignment(s)", rows.len());
    Ok(())
}

fn print_response(response: &PlanningResponse) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(())
}
