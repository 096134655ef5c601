//! # dispatch-rs
//!
//! Dispatch assignment engine for field-service work.
//!
//! Matches unassigned service jobs to technicians, either from an LLM
//! advisory (rig-core) or from a deterministic round-robin fallback, and
//! commits the result to Postgres with at most one assignment per
//! (job, technician) pair. Instrumented with tracing and OpenTelemetry.

pub mod advisory;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod llm;
pub mod model;
pub mod store;
pub mod telemetry;
