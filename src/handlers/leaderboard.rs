// src/handlers/leaderboard.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::leaderboard::{LeaderboardParams, Medal, RankedEntry, initials},
    scoring::build_leaderboard,
    store::QuizStore,
};

/// Ranks the best result of every user on every quiz.
///
/// Recomputed from the full attempt history on each call.
pub async fn get_leaderboard(
    State(store): State<Arc<dyn QuizStore>>,
    Query(params): Query<LeaderboardParams>,
) -> Result<impl IntoResponse, AppError> {
    let mut attempts = store.load_attempts().await?;
    if let Some(quiz_id) = &params.quiz_id {
        attempts.retain(|a| &a.quiz_id == quiz_id);
    }

    let limit = params.limit.map_or(usize::MAX, |n| n.min(100));

    let ranked: Vec<RankedEntry> = build_leaderboard(&attempts)
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(position, entry)| RankedEntry {
            rank: position + 1,
            medal: Medal::for_position(position),
            initials: initials(&entry.user_id),
            entry,
        })
        .collect();

    Ok(Json(ranked))
}
