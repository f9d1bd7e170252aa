//! Email dispatcher — resolves an application into a concrete outbound
//! message and records the outcome.
//!
//! Every send is logged: the row is inserted `pending`, one transport
//! attempt is made, and the row is finalized as `sent` or `failed` with
//! the error detail. The finalized log is returned either way: a
//! transport failure is data, not an API error. Re-sending is an explicit
//! caller action.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::mailer::client::MailClient;
use crate::models::application::Application;
use crate::models::cover_letter::CoverLetter;
use crate::models::email_log::{EmailLog, EmailStatus};
use crate::models::job::Job;
use crate::models::profile::Profile;
use crate::profile::store::get_or_default_profile;

pub async fn send_application_email(
    pool: &PgPool,
    mailer: &MailClient,
    application_id: Uuid,
) -> Result<EmailLog, AppError> {
    let (application, job, profile) = resolve_context(pool, application_id).await?;

    // Newest letter wins when the job has several.
    let letter: Option<CoverLetter> = sqlx::query_as(
        "SELECT * FROM cover_letters WHERE job_id = $1 ORDER BY generated_at DESC LIMIT 1",
    )
    .bind(application.job_id)
    .fetch_optional(pool)
    .await?;
    let letter = letter.ok_or_else(|| {
        AppError::NotFound(format!("No cover letter exists for job {}", application.job_id))
    })?;

    let recipient = recipient_for(&job)?;
    let subject = application_subject(&job, &profile);
    let body = application_body(&job, &letter, &application, &profile, mailer.sender());

    deliver(pool, mailer, &application, &recipient, &subject, &body).await
}

/// Follow-up outreach for an application that already went out. Needs no
/// cover letter; the body references the original application date.
pub async fn send_follow_up_email(
    pool: &PgPool,
    mailer: &MailClient,
    application_id: Uuid,
) -> Result<EmailLog, AppError> {
    let (application, job, profile) = resolve_context(pool, application_id).await?;

    let recipient = recipient_for(&job)?;
    let subject = follow_up_subject(&job, &profile);
    let body = follow_up_body(&job, &application, &profile, mailer.sender());

    deliver(pool, mailer, &application, &recipient, &subject, &body).await
}

async fn resolve_context(
    pool: &PgPool,
    application_id: Uuid,
) -> Result<(Application, Job, Profile), AppError> {
    let application: Option<Application> =
        sqlx::query_as("SELECT * FROM applications WHERE id = $1")
            .bind(application_id)
            .fetch_optional(pool)
            .await?;
    let application = application
        .ok_or_else(|| AppError::NotFound(format!("Application {application_id} not found")))?;

    let job: Option<Job> = sqlx::query_as("SELECT * FROM jobs WHERE id = $1")
        .bind(application.job_id)
        .fetch_optional(pool)
        .await?;
    let job = job.ok_or_else(|| {
        AppError::NotFound(format!(
            "Job {} referenced by application {application_id} no longer exists",
            application.job_id
        ))
    })?;

    let profile = get_or_default_profile(pool).await?;
    Ok((application, job, profile))
}

fn recipient_for(job: &Job) -> Result<String, AppError> {
    job.contact_email
        .as_ref()
        .filter(|email| !email.trim().is_empty())
        .cloned()
        .ok_or_else(|| {
            AppError::Validation(format!(
                "job '{}' at '{}' has no contact email",
                job.title, job.company
            ))
        })
}

/// Inserts the pending log, makes exactly one transport attempt, and
/// finalizes the row. No store lock is held across the gateway call.
async fn deliver(
    pool: &PgPool,
    mailer: &MailClient,
    application: &Application,
    recipient: &str,
    subject: &str,
    body: &str,
) -> Result<EmailLog, AppError> {
    let log: EmailLog = sqlx::query_as(
        r#"
        INSERT INTO email_logs (id, application_id, recipient_email, subject, content, status)
        VALUES ($1, $2, $3, $4, $5, 'pending')
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(application.id)
    .bind(recipient)
    .bind(subject)
    .bind(body)
    .fetch_one(pool)
    .await?;

    let (status, error_message) = match mailer.send(recipient, subject, body).await {
        Ok(()) => {
            info!("Application email {} sent to {recipient}", log.id);
            (EmailStatus::Sent, None)
        }
        Err(e) => {
            // Recorded, not retried: at-least-once is the caller's call.
            warn!("Application email {} to {recipient} failed: {e}", log.id);
            (EmailStatus::Failed, Some(e.to_string()))
        }
    };

    let finalized: EmailLog = sqlx::query_as(
        r#"
        UPDATE email_logs
        SET status = $2, error_message = $3, sent_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(log.id)
    .bind(status)
    .bind(error_message)
    .fetch_one(pool)
    .await?;

    Ok(finalized)
}

fn signature_name(profile: &Profile) -> &str {
    if profile.full_name.trim().is_empty() {
        "the candidate"
    } else {
        &profile.full_name
    }
}

fn format_date(date: DateTime<Utc>) -> String {
    date.format("%B %d, %Y").to_string()
}

fn application_subject(job: &Job, profile: &Profile) -> String {
    format!(
        "Application for {} Position - {}",
        job.title,
        signature_name(profile)
    )
}

fn application_body(
    job: &Job,
    letter: &CoverLetter,
    application: &Application,
    profile: &Profile,
    sender_email: &str,
) -> String {
    format!(
        r#"<html>
  <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
      <h2>Job Application: {title}</h2>
      <p>Dear Hiring Manager,</p>
      <div style="background-color: #f8f9fa; padding: 20px; border-left: 4px solid #007bff; margin: 20px 0;">
        {letter}
      </div>
      <p><strong>Position:</strong> {title} at {company}<br>
         <strong>Applied via:</strong> {method}<br>
         <strong>Date:</strong> {date}</p>
      <p>Best regards,<br>{name}<br>{email}</p>
    </div>
  </body>
</html>"#,
        title = job.title,
        company = job.company,
        letter = letter.content.replace('\n', "<br>"),
        method = application.application_method,
        date = format_date(application.applied_at),
        name = signature_name(profile),
        email = sender_email,
    )
}

fn follow_up_subject(job: &Job, profile: &Profile) -> String {
    format!(
        "Following up on {} Application - {}",
        job.title,
        signature_name(profile)
    )
}

fn follow_up_body(
    job: &Job,
    application: &Application,
    profile: &Profile,
    sender_email: &str,
) -> String {
    format!(
        r#"<html>
  <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
      <h2>Follow-up: {title} Application</h2>
      <p>Dear Hiring Manager,</p>
      <p>I wanted to follow up on my application for the {title} position at {company},
         submitted on {date}. I remain very interested in this opportunity and would
         welcome the chance to discuss how my experience could contribute to your team.</p>
      <p>If you need any additional information, please don't hesitate to reach out.</p>
      <p>Best regards,<br>{name}<br>{email}</p>
    </div>
  </body>
</html>"#,
        title = job.title,
        company = job.company,
        date = format_date(application.applied_at),
        name = signature_name(profile),
        email = sender_email,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::application::ApplicationStatus;
    use crate::models::job::JobSource;

    fn job(contact_email: Option<&str>) -> Job {
        Job {
            id: Uuid::new_v4(),
            title: "Rust Engineer".to_string(),
            company: "Acme".to_string(),
            description: String::new(),
            location: "Remote".to_string(),
            job_type: "full_time".to_string(),
            source: JobSource::Manual,
            url: String::new(),
            salary: None,
            contact_email: contact_email.map(str::to_string),
            relevance_score: 0.0,
            keywords_matched: vec![],
            dedup_key: "manual:x".to_string(),
            search_id: None,
            discovered_at: Utc::now(),
            applied: true,
            applied_at: Some(Utc::now()),
        }
    }

    fn profile(name: &str) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            full_name: name.to_string(),
            email: "ada@example.com".to_string(),
            phone: String::new(),
            location: String::new(),
            bio: String::new(),
            skills: vec![],
            experience: vec![],
            education: vec![],
            languages: vec![],
            preferred_job_types: vec![],
            target_keywords: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn application() -> Application {
        Application {
            id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            cover_letter_id: None,
            status: ApplicationStatus::Pending,
            application_method: "email".to_string(),
            notes: None,
            follow_up_date: None,
            interview_date: None,
            version: 1,
            applied_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn letter() -> CoverLetter {
        CoverLetter {
            id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            job_title: "Rust Engineer".to_string(),
            company: "Acme".to_string(),
            content: "First line.\nSecond line.".to_string(),
            customizations: None,
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_recipient_requires_contact_email() {
        assert!(recipient_for(&job(None)).is_err());
        assert!(recipient_for(&job(Some("  "))).is_err());
        assert_eq!(
            recipient_for(&job(Some("hr@acme.test"))).unwrap(),
            "hr@acme.test"
        );
    }

    #[test]
    fn test_application_subject_names_role_and_candidate() {
        let subject = application_subject(&job(None), &profile("Ada Lovelace"));
        assert_eq!(subject, "Application for Rust Engineer Position - Ada Lovelace");
    }

    #[test]
    fn test_empty_profile_name_falls_back() {
        let subject = application_subject(&job(None), &profile(""));
        assert!(subject.ends_with("- the candidate"));
    }

    #[test]
    fn test_application_body_embeds_letter_with_breaks() {
        let body = application_body(
            &job(None),
            &letter(),
            &application(),
            &profile("Ada Lovelace"),
            "ada@example.com",
        );
        assert!(body.contains("First line.<br>Second line."));
        assert!(body.contains("Rust Engineer at Acme"));
        assert!(body.contains("ada@example.com"));
    }

    #[test]
    fn test_follow_up_body_references_application_date() {
        let app = application();
        let body = follow_up_body(&job(None), &app, &profile("Ada"), "ada@example.com");
        assert!(body.contains(&format_date(app.applied_at)));
        assert!(body.contains("Follow-up: Rust Engineer Application"));
    }
}
