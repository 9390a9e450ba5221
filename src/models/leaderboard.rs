// src/models/leaderboard.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Best result of one user on one quiz.
/// Derived from the attempt history on every request, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub quiz_id: String,
    pub quiz_title: String,
    pub score: u32,
    pub total_questions: u32,
    pub percentage: u32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    /// Medal for a 0-based leaderboard position.
    pub fn for_position(position: usize) -> Option<Self> {
        match position {
            0 => Some(Medal::Gold),
            1 => Some(Medal::Silver),
            2 => Some(Medal::Bronze),
            _ => None,
        }
    }
}

/// Two-letter avatar initials derived from an email or user id.
///
/// `jane.doe@x.com` gives `JD`, `alice@x.com` gives `AL`, an empty id gives `?`.
pub fn initials(user_id: &str) -> String {
    let local = user_id.split('@').next().unwrap_or_default();
    if local.is_empty() {
        return "?".to_string();
    }

    let parts: Vec<&str> = local.split(['.', '_', '-']).collect();
    if parts.len() == 1 {
        return local.chars().take(2).collect::<String>().to_uppercase();
    }

    parts
        .iter()
        .take(2)
        .filter_map(|part| part.chars().next())
        .collect::<String>()
        .to_uppercase()
}

/// Leaderboard row as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    /// 1-based display rank.
    pub rank: usize,
    pub medal: Option<Medal>,
    pub initials: String,
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
}

/// Query parameters for the leaderboard.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardParams {
    /// Only rank attempts of this quiz.
    pub quiz_id: Option<String>,

    /// Number of rows to return (default: all, otherwise at most 100).
    pub limit: Option<usize>,
}
