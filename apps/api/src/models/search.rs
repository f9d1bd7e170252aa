use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::job::JobSource;

/// One search submission, kept append-only for audit. Discovered jobs
/// carry the originating `search_id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SearchRequestRow {
    pub id: Uuid,
    pub keywords: Vec<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub platforms: Vec<JobSource>,
    pub max_results_per_platform: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "source_run_status", rename_all = "snake_case")]
pub enum SourceRunStatus {
    Pending,
    Succeeded,
    Failed,
}

/// Per-adapter outcome of a search fan-out. One adapter timing out or
/// failing is recorded here instead of failing the search, so callers see
/// exactly which platforms delivered.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SearchSourceRun {
    pub id: Uuid,
    pub search_id: Uuid,
    pub source: JobSource,
    pub status: SourceRunStatus,
    pub jobs_found: i32,
    pub jobs_inserted: i32,
    pub error: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}
