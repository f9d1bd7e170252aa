//! Application Lifecycle Manager — owns creation, status transitions, and
//! timestamps.
//!
//! Transitions are caller-driven and unconstrained by a graph: the status
//! enum is closed at the store boundary, but any status may follow any
//! other (reopening a rejected application is legitimate). Status updates
//! are single-statement read-modify-write; concurrent writers race and the
//! last one wins, with `version` making lost updates visible.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{Application, ApplicationStatus};

pub struct CreateApplicationParams {
    pub job_id: Uuid,
    pub cover_letter_id: Option<Uuid>,
    pub application_method: String,
    pub status: Option<ApplicationStatus>,
    pub notes: Option<String>,
}

/// Creates an application against an existing job and marks the job
/// applied. The job reference is validated at creation time only; the job
/// may be deleted later, orphaning the application by design.
pub async fn create_application(
    pool: &PgPool,
    params: CreateApplicationParams,
) -> Result<Application, AppError> {
    let job_exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM jobs WHERE id = $1")
        .bind(params.job_id)
        .fetch_optional(pool)
        .await?;
    if job_exists.is_none() {
        return Err(AppError::Validation(format!(
            "job {} does not exist",
            params.job_id
        )));
    }

    sqlx::query("UPDATE jobs SET applied = TRUE, applied_at = now() WHERE id = $1")
        .bind(params.job_id)
        .execute(pool)
        .await?;

    let status = params.status.unwrap_or(ApplicationStatus::Pending);
    let application: Application = sqlx::query_as(
        r#"
        INSERT INTO applications (id, job_id, cover_letter_id, status, application_method, notes)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(params.job_id)
    .bind(params.cover_letter_id)
    .bind(status)
    .bind(&params.application_method)
    .bind(&params.notes)
    .fetch_one(pool)
    .await?;

    info!(
        "Created application {} for job {} ({status:?})",
        application.id, params.job_id
    );
    Ok(application)
}

/// Sets the status, always bumping `updated_at` and `version`; repeating
/// the current status is an idempotent touch. No reachability check is
/// performed; `rejected` (or anything else) is reachable from any state.
pub async fn update_status(
    pool: &PgPool,
    application_id: Uuid,
    new_status: ApplicationStatus,
) -> Result<Application, AppError> {
    let application: Option<Application> = sqlx::query_as(
        r#"
        UPDATE applications
        SET status = $2, updated_at = now(), version = version + 1
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(application_id)
    .bind(new_status)
    .fetch_optional(pool)
    .await?;

    let application = application
        .ok_or_else(|| AppError::NotFound(format!("Application {application_id} not found")))?;

    if new_status.is_terminal() {
        info!("Application {application_id} reached terminal status {new_status:?}");
    }
    Ok(application)
}
