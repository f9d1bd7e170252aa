//! Discovery Orchestrator — fans a search out to the selected adapters
//! concurrently, deduplicates, scores against the profile, and persists.
//!
//! Fire-and-forget: the caller gets a search_id immediately and observes
//! completion by querying the job store (or the per-source runs). Each
//! adapter runs under its own timeout; one adapter failing or timing out
//! never aborts the others.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::discovery::dedup::dedup_key;
use crate::discovery::scoring::score_relevance;
use crate::discovery::sources::{RawPosting, SearchQuery, SearchSource, SourceError};
use crate::errors::AppError;
use crate::models::job::JobSource;
use crate::models::search::SourceRunStatus;
use crate::profile::store::get_or_default_profile;
use crate::state::AppState;

pub const MIN_RESULTS_PER_PLATFORM: i32 = 10;
pub const MAX_RESULTS_PER_PLATFORM: i32 = 100;

/// A validated search submission.
#[derive(Debug, Clone)]
pub struct SearchSubmission {
    pub keywords: Vec<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    /// Empty = every registered adapter.
    pub platforms: Vec<JobSource>,
    pub max_results_per_platform: i32,
}

pub struct StartedSearch {
    pub search_id: Uuid,
    pub platforms: Vec<JobSource>,
}

/// Validates the submission, records it, and spawns the fan-out as a
/// detached task. Returns as soon as the search is queued.
pub async fn start_search(
    state: &AppState,
    submission: SearchSubmission,
) -> Result<StartedSearch, AppError> {
    if submission.keywords.iter().all(|k| k.trim().is_empty()) {
        return Err(AppError::Validation(
            "keywords must contain at least one non-empty term".to_string(),
        ));
    }
    if submission.max_results_per_platform < MIN_RESULTS_PER_PLATFORM
        || submission.max_results_per_platform > MAX_RESULTS_PER_PLATFORM
    {
        return Err(AppError::Validation(format!(
            "max_results_per_platform must be between {MIN_RESULTS_PER_PLATFORM} and {MAX_RESULTS_PER_PLATFORM}"
        )));
    }

    // Resolve the target adapter set against the registry.
    let adapters: Vec<Arc<dyn SearchSource>> = if submission.platforms.is_empty() {
        state.sources.all()
    } else {
        submission
            .platforms
            .iter()
            .map(|&platform| {
                state.sources.get(platform).ok_or_else(|| {
                    AppError::Validation(format!("unknown platform '{platform}'"))
                })
            })
            .collect::<Result<_, _>>()?
    };
    let platforms: Vec<JobSource> = adapters.iter().map(|a| a.source()).collect();

    let search_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO searches (id, keywords, location, job_type, platforms, max_results_per_platform)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(search_id)
    .bind(&submission.keywords)
    .bind(&submission.location)
    .bind(&submission.job_type)
    .bind(&platforms)
    .bind(submission.max_results_per_platform)
    .execute(&state.db)
    .await?;

    for &platform in &platforms {
        sqlx::query(
            "INSERT INTO search_sources (id, search_id, source) VALUES ($1, $2, $3)",
        )
        .bind(Uuid::new_v4())
        .bind(search_id)
        .bind(platform)
        .execute(&state.db)
        .await?;
    }

    let query = SearchQuery {
        keywords: submission.keywords,
        location: submission.location,
        job_type: submission.job_type,
        max_results: submission.max_results_per_platform as usize,
    };
    let pool = state.db.clone();
    let timeout = Duration::from_secs(state.config.source_timeout_secs);

    tokio::spawn(run_search(pool, adapters, query, search_id, timeout));

    info!("Search {search_id} started across {} platforms", platforms.len());
    Ok(StartedSearch {
        search_id,
        platforms,
    })
}

/// The detached fan-out. One task per adapter, each under an independent
/// timeout; results are persisted as they arrive.
async fn run_search(
    pool: PgPool,
    adapters: Vec<Arc<dyn SearchSource>>,
    query: SearchQuery,
    search_id: Uuid,
    timeout: Duration,
) {
    // Scored against the profile as of search time, not retroactively.
    let profile_keywords = match get_or_default_profile(&pool).await {
        Ok(profile) => profile.target_keywords,
        Err(e) => {
            error!("Search {search_id}: failed to load profile: {e}");
            return;
        }
    };

    let mut tasks: JoinSet<(JobSource, Result<Vec<RawPosting>, SourceError>)> = JoinSet::new();
    for adapter in adapters {
        let query = query.clone();
        tasks.spawn(async move {
            let source = adapter.source();
            let outcome = match tokio::time::timeout(timeout, adapter.search(&query)).await {
                Ok(result) => result,
                Err(_) => Err(SourceError::Timeout(timeout.as_secs())),
            };
            (source, outcome)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let (source, outcome) = match joined {
            Ok(pair) => pair,
            Err(e) => {
                error!("Search {search_id}: adapter task panicked: {e}");
                continue;
            }
        };

        match outcome {
            Ok(postings) => {
                let found = postings.len();
                match persist_postings(&pool, search_id, source, postings, &profile_keywords)
                    .await
                {
                    Ok(inserted) => {
                        info!(
                            "Search {search_id}: {source} yielded {found} postings, {inserted} new"
                        );
                        record_run(
                            &pool,
                            search_id,
                            source,
                            SourceRunStatus::Succeeded,
                            found as i32,
                            inserted as i32,
                            None,
                        )
                        .await;
                    }
                    Err(e) => {
                        error!("Search {search_id}: failed to persist {source} postings: {e}");
                        record_run(
                            &pool,
                            search_id,
                            source,
                            SourceRunStatus::Failed,
                            found as i32,
                            0,
                            Some(e.to_string()),
                        )
                        .await;
                    }
                }
            }
            Err(e) => {
                // Per-source failure: logged and recorded, never fatal to the batch.
                warn!("Search {search_id}: {source} failed: {e}");
                record_run(
                    &pool,
                    search_id,
                    source,
                    SourceRunStatus::Failed,
                    0,
                    0,
                    Some(e.to_string()),
                )
                .await;
            }
        }
    }

    info!("Search {search_id} complete");
}

/// Scores and inserts the postings from one source. The unique dedup_key
/// constraint serializes concurrent inserts of the same identity:
/// ON CONFLICT DO NOTHING makes replays and overlaps idempotent.
async fn persist_postings(
    pool: &PgPool,
    search_id: Uuid,
    source: JobSource,
    postings: Vec<RawPosting>,
    profile_keywords: &[String],
) -> Result<u64, sqlx::Error> {
    let mut inserted = 0;

    for posting in postings {
        let key = dedup_key(
            source,
            posting.external_id.as_deref(),
            &posting.title,
            &posting.company,
            &posting.location,
        );
        let job_text = format!("{} {}", posting.title, posting.description);
        let (score, matched) = score_relevance(&job_text, profile_keywords);

        let result = sqlx::query(
            r#"
            INSERT INTO jobs
                (id, title, company, description, location, job_type, source, url,
                 salary, relevance_score, keywords_matched, dedup_key, search_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (dedup_key) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&posting.title)
        .bind(&posting.company)
        .bind(&posting.description)
        .bind(&posting.location)
        .bind(&posting.job_type)
        .bind(source)
        .bind(&posting.url)
        .bind(&posting.salary)
        .bind(score)
        .bind(&matched)
        .bind(&key)
        .bind(search_id)
        .execute(pool)
        .await?;

        inserted += result.rows_affected();
    }

    Ok(inserted)
}

async fn record_run(
    pool: &PgPool,
    search_id: Uuid,
    source: JobSource,
    status: SourceRunStatus,
    jobs_found: i32,
    jobs_inserted: i32,
    error_detail: Option<String>,
) {
    let result = sqlx::query(
        r#"
        UPDATE search_sources
        SET status = $3, jobs_found = $4, jobs_inserted = $5, error = $6, completed_at = now()
        WHERE search_id = $1 AND source = $2
        "#,
    )
    .bind(search_id)
    .bind(source)
    .bind(status)
    .bind(jobs_found)
    .bind(jobs_inserted)
    .bind(error_detail)
    .execute(pool)
    .await;

    if let Err(e) = result {
        error!("Search {search_id}: failed to record {source} run: {e}");
    }
}
