//! Cover-letter generation — loads the job and profile, invokes the LLM,
//! and persists the returned text verbatim as a new immutable letter.
//!
//! Flow: fetch job → load profile → build prompt → LLM call → INSERT.
//! Repeated calls for the same job insert independent letters, so drafts
//! can be compared side by side. The LLM call is never retried here: a
//! failure surfaces as `AppError::Generation` and retrying stays an
//! explicit caller decision.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::letters::prompts::{COVER_LETTER_PROMPT_TEMPLATE, COVER_LETTER_SYSTEM};
use crate::llm_client::LlmClient;
use crate::models::cover_letter::CoverLetter;
use crate::models::job::Job;
use crate::models::profile::Profile;
use crate::profile::store::get_or_default_profile;

pub struct GenerateParams {
    pub job_id: Uuid,
    pub custom_prompt: Option<String>,
}

pub async fn generate_cover_letter(
    pool: &PgPool,
    llm: &LlmClient,
    params: GenerateParams,
) -> Result<CoverLetter, AppError> {
    let job: Option<Job> = sqlx::query_as("SELECT * FROM jobs WHERE id = $1")
        .bind(params.job_id)
        .fetch_optional(pool)
        .await?;
    let job = job.ok_or_else(|| AppError::NotFound(format!("Job {} not found", params.job_id)))?;

    let profile = get_or_default_profile(pool).await?;

    let prompt = build_prompt(&job, &profile, params.custom_prompt.as_deref());

    // The insert happens after the await: no store lock is held while the
    // external collaborator is in flight.
    let response = llm
        .call(&prompt, COVER_LETTER_SYSTEM)
        .await
        .map_err(|e| AppError::Generation(e.to_string()))?;
    let content = response
        .text()
        .ok_or_else(|| AppError::Generation("model returned no text".to_string()))?;

    let letter: CoverLetter = sqlx::query_as(
        r#"
        INSERT INTO cover_letters (id, job_id, job_title, company, content, customizations)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(job.id)
    .bind(&job.title)
    .bind(&job.company)
    .bind(content)
    .bind(&params.custom_prompt)
    .fetch_one(pool)
    .await?;

    info!(
        "Generated cover letter {} for '{}' at {}",
        letter.id, job.title, job.company
    );
    Ok(letter)
}

/// Fills the letter prompt from the job and profile. Optional custom
/// instructions from the request are appended at the end.
fn build_prompt(job: &Job, profile: &Profile, custom_prompt: Option<&str>) -> String {
    let mut prompt = COVER_LETTER_PROMPT_TEMPLATE
        .replace("{job_title}", &job.title)
        .replace("{company}", &job.company)
        .replace("{job_description}", &job.description)
        .replace("{full_name}", &profile.full_name)
        .replace("{bio}", &profile.bio)
        .replace("{skills}", &profile.skills.join(", "))
        .replace("{experience}", &profile.experience.join("; "))
        .replace("{languages}", &profile.languages.join(", "))
        .replace("{target_keywords}", &profile.target_keywords.join(", "));

    if let Some(custom) = custom_prompt {
        if !custom.trim().is_empty() {
            prompt.push_str("\n\nAdditional instructions from the candidate:\n");
            prompt.push_str(custom);
        }
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::JobSource;
    use chrono::Utc;

    fn job() -> Job {
        Job {
            id: Uuid::new_v4(),
            title: "Rust Engineer".to_string(),
            company: "Acme".to_string(),
            description: "Build distributed systems.".to_string(),
            location: "Remote".to_string(),
            job_type: "full_time".to_string(),
            source: JobSource::Remotive,
            url: String::new(),
            salary: None,
            contact_email: None,
            relevance_score: 0.5,
            keywords_matched: vec![],
            dedup_key: "remotive:1".to_string(),
            search_id: None,
            discovered_at: Utc::now(),
            applied: false,
            applied_at: None,
        }
    }

    fn profile() -> Profile {
        Profile {
            id: Uuid::new_v4(),
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: String::new(),
            location: String::new(),
            bio: "Systems programmer.".to_string(),
            skills: vec!["Rust".to_string(), "SQL".to_string()],
            experience: vec!["10 years backend".to_string()],
            education: vec![],
            languages: vec!["English".to_string()],
            preferred_job_types: vec![],
            target_keywords: vec!["rust".to_string()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_prompt_contains_job_and_profile_fields() {
        let prompt = build_prompt(&job(), &profile(), None);
        assert!(prompt.contains("Rust Engineer"));
        assert!(prompt.contains("Acme"));
        assert!(prompt.contains("Ada Lovelace"));
        assert!(prompt.contains("Rust, SQL"));
        assert!(!prompt.contains("{job_title}"));
        assert!(!prompt.contains("{bio}"));
    }

    #[test]
    fn test_custom_prompt_is_appended() {
        let prompt = build_prompt(&job(), &profile(), Some("Mention open source work."));
        assert!(prompt.ends_with("Mention open source work."));
    }

    #[test]
    fn test_blank_custom_prompt_is_ignored() {
        let without = build_prompt(&job(), &profile(), None);
        let with_blank = build_prompt(&job(), &profile(), Some("   "));
        assert_eq!(without, with_blank);
    }
}
