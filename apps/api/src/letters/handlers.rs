use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::letters::generator::{generate_cover_letter, GenerateParams};
use crate::models::cover_letter::CoverLetter;
use crate::state::AppState;

const DEFAULT_LETTER_LIMIT: i64 = 20;
const MAX_LETTER_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct GenerateLetterRequest {
    pub job_id: Uuid,
    pub custom_prompt: Option<String>,
}

/// POST /api/cover-letters/generate
pub async fn handle_generate_letter(
    State(state): State<AppState>,
    Json(req): Json<GenerateLetterRequest>,
) -> Result<Json<CoverLetter>, AppError> {
    let letter = generate_cover_letter(
        &state.db,
        &state.llm,
        GenerateParams {
            job_id: req.job_id,
            custom_prompt: req.custom_prompt,
        },
    )
    .await?;
    Ok(Json(letter))
}

#[derive(Debug, Deserialize)]
pub struct LettersQuery {
    pub limit: Option<i64>,
}

/// GET /api/cover-letters?limit=
pub async fn handle_list_letters(
    State(state): State<AppState>,
    Query(params): Query<LettersQuery>,
) -> Result<Json<Vec<CoverLetter>>, AppError> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_LETTER_LIMIT)
        .clamp(1, MAX_LETTER_LIMIT);

    let letters: Vec<CoverLetter> =
        sqlx::query_as("SELECT * FROM cover_letters ORDER BY generated_at DESC LIMIT $1")
            .bind(limit)
            .fetch_all(&state.db)
            .await?;

    Ok(Json(letters))
}

/// GET /api/cover-letters/:id
pub async fn handle_get_letter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CoverLetter>, AppError> {
    let letter: Option<CoverLetter> = sqlx::query_as("SELECT * FROM cover_letters WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;

    letter
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Cover letter {id} not found")))
}
