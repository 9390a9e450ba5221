// src/models/quiz.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::{Validate, ValidationError};

use crate::{config::OPTIONS_PER_QUESTION, utils::html::is_blank_text};

/// Represents the 'quizzes' table in the database.
/// A quiz is immutable once created.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    /// Opaque identifier of the form `quiz_<uuid>`.
    pub id: String,

    pub title: String,

    pub description: String,

    /// Ordered question list, stored as a JSON array.
    pub questions: Json<Vec<Question>>,

    /// Email of the signed-in author.
    pub created_by: String,

    pub created_at: DateTime<Utc>,
}

/// A single multiple-choice question with exactly four options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[validate(custom(function = not_blank, message = "Please fill in all question text and options."))]
    pub text: String,

    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,

    /// Index into `options` of the right answer.
    #[validate(range(max = 3, message = "Correct answer must be one of the four options."))]
    pub correct_answer_index: usize,
}

/// Quiz as shown to someone taking it: the answer key is left out.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuiz {
    pub id: String,
    pub title: String,
    pub description: String,
    pub questions: Vec<PublicQuestion>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub text: String,
    pub options: Vec<String>,
}

impl From<Quiz> for PublicQuiz {
    fn from(quiz: Quiz) -> Self {
        Self {
            id: quiz.id,
            title: quiz.title,
            description: quiz.description,
            questions: quiz
                .questions
                .0
                .into_iter()
                .map(|q| PublicQuestion {
                    text: q.text,
                    options: q.options,
                })
                .collect(),
            created_by: quiz.created_by,
            created_at: quiz.created_at,
        }
    }
}

/// Listing row for the home page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub question_count: usize,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Quiz> for QuizSummary {
    fn from(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id.clone(),
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            question_count: quiz.questions.len(),
            created_by: quiz.created_by.clone(),
            created_at: quiz.created_at,
        }
    }
}

/// DTO for creating a new quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(
        custom(function = not_blank, message = "Please enter a quiz title."),
        length(max = 200)
    )]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,

    #[validate(
        length(min = 1, message = "A quiz must have at least one question."),
        nested
    )]
    pub questions: Vec<Question>,
}

/// Quiz fields ready to be stored. Text is kept exactly as submitted.
#[derive(Debug, Clone)]
pub struct NewQuiz {
    pub title: String,
    pub description: String,
    pub questions: Vec<Question>,
    pub created_by: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if is_blank_text(value) {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn validate_options(options: &[String]) -> Result<(), ValidationError> {
    if options.len() != OPTIONS_PER_QUESTION {
        return Err(ValidationError::new("wrong_option_count")
            .with_message("Each question must have exactly 4 options.".into()));
    }
    for opt in options {
        if is_blank_text(opt) {
            return Err(ValidationError::new("blank_option")
                .with_message("Please fill in all question text and options.".into()));
        }
        if opt.len() > 500 {
            return Err(ValidationError::new("option_too_long"));
        }
    }
    Ok(())
}
