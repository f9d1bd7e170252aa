//! Read-only dashboard rollups over the job, application, and email
//! stores. Deliberately simple: plain counts plus recent activity.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::job::Job;
use crate::state::AppState;

const RECENT_LIMIT: i64 = 5;

#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub total_jobs_discovered: i64,
    pub total_applications: i64,
    pub pending_applications: i64,
    pub interviewing: i64,
    pub rejected: i64,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub metrics: DashboardMetrics,
    pub recent_jobs: Vec<Job>,
    pub recent_applications: Vec<Application>,
}

/// GET /api/analytics/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, AppError> {
    let total_jobs_discovered: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs")
        .fetch_one(&state.db)
        .await?;
    let total_applications: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM applications")
        .fetch_one(&state.db)
        .await?;

    let count_by_status = |status: ApplicationStatus| {
        let db = state.db.clone();
        async move {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM applications WHERE status = $1")
                .bind(status)
                .fetch_one(&db)
                .await
        }
    };
    let pending_applications = count_by_status(ApplicationStatus::Pending).await?;
    let interviewing = count_by_status(ApplicationStatus::Interviewing).await?;
    let rejected = count_by_status(ApplicationStatus::Rejected).await?;

    let recent_jobs: Vec<Job> =
        sqlx::query_as("SELECT * FROM jobs ORDER BY discovered_at DESC LIMIT $1")
            .bind(RECENT_LIMIT)
            .fetch_all(&state.db)
            .await?;
    let recent_applications: Vec<Application> =
        sqlx::query_as("SELECT * FROM applications ORDER BY applied_at DESC LIMIT $1")
            .bind(RECENT_LIMIT)
            .fetch_all(&state.db)
            .await?;

    Ok(Json(DashboardResponse {
        metrics: DashboardMetrics {
            total_jobs_discovered,
            total_applications,
            pending_applications,
            interviewing,
            rejected,
        },
        recent_jobs,
        recent_applications,
    }))
}
