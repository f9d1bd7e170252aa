use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::mailer::dispatcher::{send_application_email, send_follow_up_email};
use crate::models::email_log::EmailLog;
use crate::state::AppState;

const DEFAULT_LOG_LIMIT: i64 = 20;
const MAX_LOG_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct ApplicationIdQuery {
    pub application_id: Uuid,
}

/// POST /api/emails/send-application?application_id=
/// Returns the finalized log whether delivery succeeded or failed.
pub async fn handle_send_application(
    State(state): State<AppState>,
    Query(params): Query<ApplicationIdQuery>,
) -> Result<Json<EmailLog>, AppError> {
    let log = send_application_email(&state.db, &state.mailer, params.application_id).await?;
    Ok(Json(log))
}

/// POST /api/emails/send-follow-up?application_id=
pub async fn handle_send_follow_up(
    State(state): State<AppState>,
    Query(params): Query<ApplicationIdQuery>,
) -> Result<Json<EmailLog>, AppError> {
    let log = send_follow_up_email(&state.db, &state.mailer, params.application_id).await?;
    Ok(Json(log))
}

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<i64>,
}

/// GET /api/emails/logs?limit= — newest first.
pub async fn handle_list_logs(
    State(state): State<AppState>,
    Query(params): Query<LogsQuery>,
) -> Result<Json<Vec<EmailLog>>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_LOG_LIMIT).clamp(1, MAX_LOG_LIMIT);

    let logs: Vec<EmailLog> =
        sqlx::query_as("SELECT * FROM email_logs ORDER BY sent_at DESC LIMIT $1")
            .bind(limit)
            .fetch_all(&state.db)
            .await?;

    Ok(Json(logs))
}
