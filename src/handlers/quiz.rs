// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        attempt::{NewAttempt, SelectedAnswers, SubmitQuizRequest, SubmitQuizResponse},
        quiz::{CreateQuizRequest, NewQuiz, PublicQuiz, QuizSummary},
    },
    scoring::{feedback, score_answers},
    store::QuizStore,
    utils::jwt::Session,
};

/// Lists every quiz, oldest first, without answer keys.
pub async fn list_quizzes(
    State(store): State<Arc<dyn QuizStore>>,
) -> Result<impl IntoResponse, AppError> {
    let quizzes = store.load_quizzes().await?;
    let summaries: Vec<QuizSummary> = quizzes.iter().map(QuizSummary::from).collect();

    Ok(Json(summaries))
}

/// Returns a quiz for taking. The answer key is hidden.
pub async fn get_quiz(
    State(store): State<Arc<dyn QuizStore>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = store
        .find_quiz(&id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    Ok(Json(PublicQuiz::from(quiz)))
}

/// Creates a quiz authored by the signed-in user.
///
/// * Validates title, question text and the four options of every question.
///   Fields holding only markup count as blank.
/// * Stores text exactly as submitted; clients render it as plain text.
/// * Returns 201 Created with the new quiz id.
pub async fn create_quiz(
    State(store): State<Arc<dyn QuizStore>>,
    Extension(session): Extension<Session>,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let new_quiz = NewQuiz {
        title: payload.title,
        description: payload.description,
        questions: payload.questions,
        created_by: session.user_id,
    };

    let quiz = store.insert_quiz(new_quiz).await?;
    tracing::info!("Quiz {} created by {}", quiz.id, quiz.created_by);

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({"id": quiz.id})),
    ))
}

/// Every question index `0..count` has an answer and nothing else was sent.
fn answers_every_question(selected: &SelectedAnswers, count: usize) -> bool {
    selected.len() == count && (0..count).all(|index| selected.contains_key(&index))
}

/// Scores a submission and records the attempt.
///
/// * Unknown quiz: 404, nothing is scored.
/// * Unanswered questions: 400.
/// * Recording is best-effort: if the store fails the computed result is still
///   returned, with `saved: false`.
pub async fn submit_quiz(
    State(store): State<Arc<dyn QuizStore>>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Json(req): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = store
        .find_quiz(&id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    if !answers_every_question(&req.selected_answers, quiz.questions.len()) {
        return Err(AppError::BadRequest(
            "Please answer all questions before submitting.".to_string(),
        ));
    }

    let summary = score_answers(&quiz.questions, &req.selected_answers);
    let percentage = summary.percentage();
    let timestamp = Utc::now();

    let attempt = NewAttempt {
        quiz_id: quiz.id.clone(),
        quiz_title: quiz.title.clone(),
        user_id: session.user_id.clone(),
        score: summary.score,
        total_questions: summary.total_questions,
        selected_answers: req.selected_answers.clone(),
        timestamp,
    };

    let attempt_id = match store.append_attempt(attempt).await {
        Ok(stored) => Some(stored.id),
        Err(e) => {
            tracing::error!("Failed to save quiz attempt for {}: {}", quiz.id, e);
            None
        }
    };

    Ok(Json(SubmitQuizResponse {
        attempt_id,
        quiz_id: quiz.id,
        quiz_title: quiz.title,
        user_id: session.user_id,
        score: summary.score,
        total_questions: summary.total_questions,
        percentage,
        feedback: feedback(percentage),
        selected_answers: req.selected_answers,
        timestamp,
        saved: attempt_id.is_some(),
    }))
}
