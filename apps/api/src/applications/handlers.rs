use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::applications::lifecycle::{create_application, update_status, CreateApplicationParams};
use crate::errors::AppError;
use crate::models::application::{Application, ApplicationStatus};
use crate::state::AppState;

const DEFAULT_APPLICATION_LIMIT: i64 = 50;
const MAX_APPLICATION_LIMIT: i64 = 100;

fn default_application_method() -> String {
    "email".to_string()
}

#[derive(Debug, Deserialize)]
pub struct CreateApplicationRequest {
    pub job_id: Uuid,
    pub cover_letter_id: Option<Uuid>,
    #[serde(default = "default_application_method")]
    pub application_method: String,
    pub status: Option<ApplicationStatus>,
    pub notes: Option<String>,
}

/// POST /api/applications
pub async fn handle_create_application(
    State(state): State<AppState>,
    Json(req): Json<CreateApplicationRequest>,
) -> Result<Json<Application>, AppError> {
    let application = create_application(
        &state.db,
        CreateApplicationParams {
            job_id: req.job_id,
            cover_letter_id: req.cover_letter_id,
            application_method: req.application_method,
            status: req.status,
            notes: req.notes,
        },
    )
    .await?;
    Ok(Json(application))
}

#[derive(Debug, Deserialize)]
pub struct ApplicationsQuery {
    pub status: Option<ApplicationStatus>,
    pub limit: Option<i64>,
}

/// GET /api/applications?status=&limit=
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Query(params): Query<ApplicationsQuery>,
) -> Result<Json<Vec<Application>>, AppError> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_APPLICATION_LIMIT)
        .clamp(1, MAX_APPLICATION_LIMIT);

    let applications: Vec<Application> = sqlx::query_as(
        r#"
        SELECT * FROM applications
        WHERE ($1::application_status IS NULL OR status = $1)
        ORDER BY applied_at DESC
        LIMIT $2
        "#,
    )
    .bind(params.status)
    .bind(limit)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(applications))
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: ApplicationStatus,
}

/// PUT /api/applications/:id/status?status=
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<StatusQuery>,
) -> Result<Json<Application>, AppError> {
    let application = update_status(&state.db, id, params.status).await?;
    Ok(Json(application))
}
