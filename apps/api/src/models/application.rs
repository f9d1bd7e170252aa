use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Closed set of application states, enforced at the store boundary as a
/// Postgres enum. `pending → applied → interviewing → {rejected, offered}
/// → accepted` is the expected path; any state may jump straight to
/// `rejected`. No transition graph is enforced; reopening a terminal
/// application is a legitimate real-world need.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "application_status", rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Applied,
    Interviewing,
    Rejected,
    Offered,
    Accepted,
}

impl ApplicationStatus {
    /// Terminal by convention only; transitions out are still accepted.
    pub fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Accepted | ApplicationStatus::Rejected)
    }
}

/// One submission of the candidate to a job. References the job by id
/// only; deleting the job orphans the application rather than cascading.
/// `version` is a last-writer-wins stamp bumped on every status update.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub cover_letter_id: Option<Uuid>,
    pub status: ApplicationStatus,
    pub application_method: String,
    pub notes: Option<String>,
    pub follow_up_date: Option<DateTime<Utc>>,
    pub interview_date: Option<DateTime<Utc>>,
    pub version: i32,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(ApplicationStatus::Accepted.is_terminal());
        assert!(ApplicationStatus::Rejected.is_terminal());
        assert!(!ApplicationStatus::Pending.is_terminal());
        assert!(!ApplicationStatus::Offered.is_terminal());
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&ApplicationStatus::Interviewing).unwrap(),
            "\"interviewing\""
        );
        let parsed: ApplicationStatus = serde_json::from_str("\"offered\"").unwrap();
        assert_eq!(parsed, ApplicationStatus::Offered);
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!(serde_json::from_str::<ApplicationStatus>("\"ghosted\"").is_err());
    }
}
