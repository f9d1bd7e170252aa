use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::profile::Profile;
use crate::profile::store::{get_or_default_profile, replace_profile, ProfileUpdate};
use crate::state::AppState;

/// GET /api/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
) -> Result<Json<Profile>, AppError> {
    let profile = get_or_default_profile(&state.db).await?;
    Ok(Json(profile))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<String>,
    #[serde(default)]
    pub education: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub preferred_job_types: Vec<String>,
    #[serde(default)]
    pub target_keywords: Vec<String>,
}

/// PUT /api/profile — full replacement. Already-discovered jobs keep the
/// relevance score they were given at discovery time.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    if req.email.trim().is_empty() {
        return Err(AppError::Validation("email must not be empty".to_string()));
    }

    let profile = replace_profile(
        &state.db,
        ProfileUpdate {
            full_name: req.full_name,
            email: req.email,
            phone: req.phone,
            location: req.location,
            bio: req.bio,
            skills: req.skills,
            experience: req.experience,
            education: req.education,
            languages: req.languages,
            preferred_job_types: req.preferred_job_types,
            target_keywords: req.target_keywords,
        },
    )
    .await?;

    Ok(Json(profile))
}
