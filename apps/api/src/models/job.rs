use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Platform a job posting came from. `Manual` marks jobs added by hand
/// rather than discovered by an adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "job_source", rename_all = "snake_case")]
pub enum JobSource {
    Remotive,
    Weworkremotely,
    RemoteCo,
    Manual,
}

impl sqlx::postgres::PgHasArrayType for JobSource {
    fn array_type_info() -> sqlx::postgres::PgTypeInfo {
        sqlx::postgres::PgTypeInfo::with_name("_job_source")
    }
}

impl JobSource {
    pub fn as_str(self) -> &'static str {
        match self {
            JobSource::Remotive => "remotive",
            JobSource::Weworkremotely => "weworkremotely",
            JobSource::RemoteCo => "remote_co",
            JobSource::Manual => "manual",
        }
    }
}

impl std::fmt::Display for JobSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted job posting. `dedup_key` is the stable identity a posting
/// keeps across repeated searches; `relevance_score` is computed against
/// the profile at discovery time and never retroactively updated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub description: String,
    pub location: String,
    pub job_type: String,
    pub source: JobSource,
    pub url: String,
    pub salary: Option<String>,
    pub contact_email: Option<String>,
    pub relevance_score: f64,
    pub keywords_matched: Vec<String>,
    pub dedup_key: String,
    pub search_id: Option<Uuid>,
    pub discovered_at: DateTime<Utc>,
    pub applied: bool,
    pub applied_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_wire_names() {
        assert_eq!(
            serde_json::to_string(&JobSource::RemoteCo).unwrap(),
            "\"remote_co\""
        );
        assert_eq!(
            serde_json::to_string(&JobSource::Weworkremotely).unwrap(),
            "\"weworkremotely\""
        );
    }

    #[test]
    fn test_source_display_matches_serde() {
        for source in [
            JobSource::Remotive,
            JobSource::Weworkremotely,
            JobSource::RemoteCo,
            JobSource::Manual,
        ] {
            let wire = serde_json::to_string(&source).unwrap();
            assert_eq!(wire, format!("\"{source}\""));
        }
    }
}
