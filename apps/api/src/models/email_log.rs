use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "email_status", rename_all = "snake_case")]
pub enum EmailStatus {
    Pending,
    Sent,
    Failed,
}

/// Record of one delivery attempt through the mail gateway. A transport
/// failure lands here as `failed` with the error detail; it is never
/// retried automatically, and re-sending is an explicit caller action.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmailLog {
    pub id: Uuid,
    pub application_id: Option<Uuid>,
    pub recipient_email: String,
    pub subject: String,
    pub content: String,
    pub status: EmailStatus,
    pub sent_at: DateTime<Utc>,
    pub error_message: Option<String>,
}
