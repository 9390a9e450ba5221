// src/store.rs

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{SqlitePool, types::Json};

use crate::{
    error::AppError,
    models::{
        attempt::{Attempt, NewAttempt},
        quiz::{NewQuiz, Quiz},
    },
};

/// Persistence for quizzes and the attempt history.
///
/// Both collections are append-only. Handlers only talk to this trait, so the
/// scoring path never depends on a concrete database.
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// All quizzes in creation order.
    async fn load_quizzes(&self) -> Result<Vec<Quiz>, AppError>;

    async fn find_quiz(&self, id: &str) -> Result<Option<Quiz>, AppError>;

    /// Assigns an id and creation time, then stores the quiz.
    async fn insert_quiz(&self, quiz: NewQuiz) -> Result<Quiz, AppError>;

    /// All attempts in recording order.
    async fn load_attempts(&self) -> Result<Vec<Attempt>, AppError>;

    async fn find_attempt(&self, id: i64) -> Result<Option<Attempt>, AppError>;

    async fn append_attempt(&self, attempt: NewAttempt) -> Result<Attempt, AppError>;
}

/// `QuizStore` backed by the SQLite pool.
#[derive(Clone)]
pub struct SqliteStore(SqlitePool);

impl From<SqlitePool> for SqliteStore {
    fn from(pool: SqlitePool) -> Self {
        Self(pool)
    }
}

const QUIZ_COLUMNS: &str = "id, title, description, questions, created_by, created_at";
const ATTEMPT_COLUMNS: &str =
    "id, quiz_id, quiz_title, user_id, score, total_questions, selected_answers, timestamp";

#[async_trait]
impl QuizStore for SqliteStore {
    async fn load_quizzes(&self) -> Result<Vec<Quiz>, AppError> {
        let quizzes = sqlx::query_as::<_, Quiz>(&format!(
            "SELECT {} FROM quizzes ORDER BY seq ASC",
            QUIZ_COLUMNS
        ))
        .fetch_all(&self.0)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load quizzes: {:?}", e);
            AppError::from(e)
        })?;

        Ok(quizzes)
    }

    async fn find_quiz(&self, id: &str) -> Result<Option<Quiz>, AppError> {
        let quiz = sqlx::query_as::<_, Quiz>(&format!(
            "SELECT {} FROM quizzes WHERE id = ?",
            QUIZ_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.0)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch quiz {}: {:?}", id, e);
            AppError::from(e)
        })?;

        Ok(quiz)
    }

    async fn insert_quiz(&self, quiz: NewQuiz) -> Result<Quiz, AppError> {
        let quiz = Quiz {
            id: format!("quiz_{}", uuid::Uuid::new_v4().simple()),
            title: quiz.title,
            description: quiz.description,
            questions: Json(quiz.questions),
            created_by: quiz.created_by,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO quizzes (id, title, description, questions, created_by, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&quiz.id)
        .bind(&quiz.title)
        .bind(&quiz.description)
        .bind(&quiz.questions)
        .bind(&quiz.created_by)
        .bind(quiz.created_at)
        .execute(&self.0)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert quiz: {:?}", e);
            AppError::from(e)
        })?;

        Ok(quiz)
    }

    async fn load_attempts(&self) -> Result<Vec<Attempt>, AppError> {
        let attempts = sqlx::query_as::<_, Attempt>(&format!(
            "SELECT {} FROM attempts ORDER BY id ASC",
            ATTEMPT_COLUMNS
        ))
        .fetch_all(&self.0)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load attempts: {:?}", e);
            AppError::from(e)
        })?;

        Ok(attempts)
    }

    async fn find_attempt(&self, id: i64) -> Result<Option<Attempt>, AppError> {
        let attempt = sqlx::query_as::<_, Attempt>(&format!(
            "SELECT {} FROM attempts WHERE id = ?",
            ATTEMPT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.0)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch attempt {}: {:?}", id, e);
            AppError::from(e)
        })?;

        Ok(attempt)
    }

    async fn append_attempt(&self, attempt: NewAttempt) -> Result<Attempt, AppError> {
        let selected_answers = Json(attempt.selected_answers);

        let id = sqlx::query(
            r#"
            INSERT INTO attempts
                (quiz_id, quiz_title, user_id, score, total_questions, selected_answers, timestamp)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&attempt.quiz_id)
        .bind(&attempt.quiz_title)
        .bind(&attempt.user_id)
        .bind(attempt.score)
        .bind(attempt.total_questions)
        .bind(&selected_answers)
        .bind(attempt.timestamp)
        .execute(&self.0)
        .await
        .map_err(|e| {
            tracing::error!("Failed to record attempt on {}: {:?}", attempt.quiz_id, e);
            AppError::from(e)
        })?
        .last_insert_rowid();

        Ok(Attempt {
            id,
            quiz_id: attempt.quiz_id,
            quiz_title: attempt.quiz_title,
            user_id: attempt.user_id,
            score: attempt.score,
            total_questions: attempt.total_questions,
            selected_answers,
            timestamp: attempt.timestamp,
        })
    }
}
