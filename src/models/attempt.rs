// src/models/attempt.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};

use crate::scoring::QuestionReview;

/// Selected answers of one submission.
/// Key: question index. Value: option index.
pub type SelectedAnswers = BTreeMap<usize, usize>;

/// Represents the 'attempts' table in the database.
/// One row per completed submission; rows are never updated or deleted.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub id: i64,
    pub quiz_id: String,
    /// Title copied at submission time.
    pub quiz_title: String,
    /// Email of the submitter, or "guest".
    pub user_id: String,
    pub score: u32,
    pub total_questions: u32,
    pub selected_answers: Json<SelectedAnswers>,
    pub timestamp: DateTime<Utc>,
}

/// Attempt fields ready to be appended to the history.
#[derive(Debug, Clone)]
pub struct NewAttempt {
    pub quiz_id: String,
    pub quiz_title: String,
    pub user_id: String,
    pub score: u32,
    pub total_questions: u32,
    pub selected_answers: SelectedAnswers,
    pub timestamp: DateTime<Utc>,
}

/// DTO for submitting a quiz attempt.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    pub selected_answers: SelectedAnswers,
}

/// Result of a submission.
/// `saved` is false when the attempt could not be recorded; the score is still valid.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizResponse {
    pub attempt_id: Option<i64>,
    pub quiz_id: String,
    pub quiz_title: String,
    pub user_id: String,
    pub score: u32,
    pub total_questions: u32,
    pub percentage: u32,
    pub feedback: &'static str,
    pub selected_answers: SelectedAnswers,
    pub timestamp: DateTime<Utc>,
    pub saved: bool,
}

/// A stored attempt together with its per-question answer review.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptReviewResponse {
    pub attempt: Attempt,
    pub percentage: u32,
    pub feedback: &'static str,
    pub review: Vec<QuestionReview>,
}
