//! Candidate profile store. The profile is a singleton row, seeded empty
//! by the initial migration; the scorer and the letter generator read it
//! through `get_or_default_profile`.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::Profile;

/// Returns the singleton profile, materializing an empty default if the
/// seed row is somehow missing.
pub async fn get_or_default_profile(pool: &PgPool) -> Result<Profile, AppError> {
    let existing: Option<Profile> = sqlx::query_as("SELECT * FROM profile LIMIT 1")
        .fetch_optional(pool)
        .await?;
    if let Some(profile) = existing {
        return Ok(profile);
    }

    let created: Profile = sqlx::query_as("INSERT INTO profile (id) VALUES ($1) RETURNING *")
        .bind(Uuid::new_v4())
        .fetch_one(pool)
        .await?;
    Ok(created)
}

/// Full replacement of the profile fields. Keeps the row id and
/// created_at; bumps updated_at.
pub struct ProfileUpdate {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub bio: String,
    pub skills: Vec<String>,
    pub experience: Vec<String>,
    pub education: Vec<String>,
    pub languages: Vec<String>,
    pub preferred_job_types: Vec<String>,
    pub target_keywords: Vec<String>,
}

pub async fn replace_profile(pool: &PgPool, update: ProfileUpdate) -> Result<Profile, AppError> {
    let current = get_or_default_profile(pool).await?;

    let profile: Profile = sqlx::query_as(
        r#"
        UPDATE profile
        SET full_name = $2, email = $3, phone = $4, location = $5, bio = $6,
            skills = $7, experience = $8, education = $9, languages = $10,
            preferred_job_types = $11, target_keywords = $12, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(current.id)
    .bind(&update.full_name)
    .bind(&update.email)
    .bind(&update.phone)
    .bind(&update.location)
    .bind(&update.bio)
    .bind(&update.skills)
    .bind(&update.experience)
    .bind(&update.education)
    .bind(&update.languages)
    .bind(&update.preferred_job_types)
    .bind(&update.target_keywords)
    .fetch_one(pool)
    .await?;

    Ok(profile)
}
