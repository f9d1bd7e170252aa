use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::discovery::dedup::dedup_key;
use crate::discovery::orchestrator::{start_search, SearchSubmission};
use crate::discovery::scoring::score_relevance;
use crate::errors::AppError;
use crate::models::job::{Job, JobSource};
use crate::models::search::{SearchRequestRow, SearchSourceRun};
use crate::profile::store::get_or_default_profile;
use crate::state::AppState;

const DEFAULT_JOB_LIMIT: i64 = 50;
const MAX_JOB_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct SearchJobsRequest {
    pub keywords: Vec<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub platforms: Option<Vec<JobSource>>,
    #[serde(default = "default_max_results")]
    pub max_results_per_platform: i32,
}

fn default_max_results() -> i32 {
    50
}

#[derive(Debug, Serialize)]
pub struct SearchJobsResponse {
    pub search_id: Uuid,
    pub platforms: Vec<JobSource>,
}

/// POST /api/jobs/search
/// Queues the fan-out and returns immediately; completion is observed via
/// the job list or the per-source runs.
pub async fn handle_search_jobs(
    State(state): State<AppState>,
    Json(req): Json<SearchJobsRequest>,
) -> Result<Json<SearchJobsResponse>, AppError> {
    if req.keywords.is_empty() {
        return Err(AppError::Validation("keywords must not be empty".to_string()));
    }

    let started = start_search(
        &state,
        SearchSubmission {
            keywords: req.keywords,
            location: req.location,
            job_type: req.job_type,
            platforms: req.platforms.unwrap_or_default(),
            max_results_per_platform: req.max_results_per_platform,
        },
    )
    .await?;

    Ok(Json(SearchJobsResponse {
        search_id: started.search_id,
        platforms: started.platforms,
    }))
}

#[derive(Debug, Serialize)]
pub struct SearchDetailResponse {
    #[serde(flatten)]
    pub search: SearchRequestRow,
    pub sources: Vec<SearchSourceRun>,
}

/// GET /api/jobs/search/:search_id
/// The search plus its per-source runs, so partial failure is visible
/// instead of collapsing into a generic notice.
pub async fn handle_get_search(
    State(state): State<AppState>,
    Path(search_id): Path<Uuid>,
) -> Result<Json<SearchDetailResponse>, AppError> {
    let search: Option<SearchRequestRow> = sqlx::query_as("SELECT * FROM searches WHERE id = $1")
        .bind(search_id)
        .fetch_optional(&state.db)
        .await?;
    let search =
        search.ok_or_else(|| AppError::NotFound(format!("Search {search_id} not found")))?;

    let sources: Vec<SearchSourceRun> =
        sqlx::query_as("SELECT * FROM search_sources WHERE search_id = $1 ORDER BY source")
            .bind(search_id)
            .fetch_all(&state.db)
            .await?;

    Ok(Json(SearchDetailResponse { search, sources }))
}

#[derive(Debug, Deserialize)]
pub struct JobsQuery {
    pub source: Option<JobSource>,
    pub applied: Option<bool>,
    pub limit: Option<i64>,
}

/// GET /api/jobs?source=&applied=&limit=
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobsQuery>,
) -> Result<Json<Vec<Job>>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_JOB_LIMIT).clamp(1, MAX_JOB_LIMIT);

    let jobs: Vec<Job> = sqlx::query_as(
        r#"
        SELECT * FROM jobs
        WHERE ($1::job_source IS NULL OR source = $1)
          AND ($2::boolean IS NULL OR applied = $2)
        ORDER BY discovered_at DESC
        LIMIT $3
        "#,
    )
    .bind(params.source)
    .bind(params.applied)
    .bind(limit)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(jobs))
}

/// GET /api/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>, AppError> {
    let job: Option<Job> = sqlx::query_as("SELECT * FROM jobs WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;

    job.map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub job_type: String,
    #[serde(default)]
    pub url: String,
    pub salary: Option<String>,
    pub contact_email: Option<String>,
}

/// POST /api/jobs — manual entry. Scored against the current profile like
/// any discovered posting, and subject to the same identity constraint.
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<Json<Job>, AppError> {
    if req.title.trim().is_empty() || req.company.trim().is_empty() {
        return Err(AppError::Validation(
            "title and company must not be empty".to_string(),
        ));
    }

    let profile = get_or_default_profile(&state.db).await?;
    let job_text = format!("{} {}", req.title, req.description);
    let (score, matched) = score_relevance(&job_text, &profile.target_keywords);
    let key = dedup_key(JobSource::Manual, None, &req.title, &req.company, &req.location);

    let job: Option<Job> = sqlx::query_as(
        r#"
        INSERT INTO jobs
            (id, title, company, description, location, job_type, source, url,
             salary, contact_email, relevance_score, keywords_matched, dedup_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        ON CONFLICT (dedup_key) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&req.title)
    .bind(&req.company)
    .bind(&req.description)
    .bind(&req.location)
    .bind(&req.job_type)
    .bind(JobSource::Manual)
    .bind(&req.url)
    .bind(&req.salary)
    .bind(&req.contact_email)
    .bind(score)
    .bind(&matched)
    .bind(&key)
    .fetch_optional(&state.db)
    .await?;

    job.map(Json).ok_or_else(|| {
        AppError::Validation(format!(
            "a job titled '{}' at '{}' already exists",
            req.title, req.company
        ))
    })
}

/// DELETE /api/jobs/:id
/// Returns the removed job. Dependent applications are deliberately left
/// in place, referencing the now-absent id.
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>, AppError> {
    let job: Option<Job> = sqlx::query_as("DELETE FROM jobs WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;

    job.map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}
