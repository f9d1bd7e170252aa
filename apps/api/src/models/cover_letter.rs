use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A generated cover letter. Immutable once created: regeneration for the
/// same job always inserts a new row, so letters can be A/B compared.
/// `job_title` and `company` are snapshots taken at generation time; a
/// later job edit or deletion cannot corrupt the letter.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CoverLetter {
    pub id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub company: String,
    pub content: String,
    pub customizations: Option<String>,
    pub generated_at: DateTime<Utc>,
}
