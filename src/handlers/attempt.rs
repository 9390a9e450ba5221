// src/handlers/attempt.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::attempt::AttemptReviewResponse,
    scoring::{feedback, percentage, review},
    store::QuizStore,
};

/// Returns a recorded attempt with its answer review.
///
/// The review is rebuilt from the quiz's answer key on every request.
pub async fn get_attempt(
    State(store): State<Arc<dyn QuizStore>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let attempt = store
        .find_attempt(id)
        .await?
        .ok_or(AppError::NotFound("Attempt not found".to_string()))?;

    let quiz = store
        .find_quiz(&attempt.quiz_id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    let pct = percentage(attempt.score, attempt.total_questions);
    let review = review(&quiz.questions, &attempt.selected_answers);

    Ok(Json(AttemptReviewResponse {
        attempt,
        percentage: pct,
        feedback: feedback(pct),
        review,
    }))
}
