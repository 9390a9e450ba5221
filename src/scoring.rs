// src/scoring.rs

//! Quiz scoring, answer review and leaderboard ranking.
//!
//! Everything here is pure: callers load quizzes and attempts from the store,
//! pass them in, and persist whatever they need afterwards.

use std::{cmp::Ordering, collections::HashMap};

use serde::Serialize;

use crate::models::{
    attempt::{Attempt, SelectedAnswers},
    leaderboard::LeaderboardEntry,
    quiz::Question,
};

/// Outcome of scoring one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreSummary {
    pub score: u32,
    pub total_questions: u32,
}

impl ScoreSummary {
    pub fn percentage(&self) -> u32 {
        percentage(self.score, self.total_questions)
    }
}

/// Whether `selected` is the right answer to `question`.
///
/// Shared by the scorer and the answer review so both always agree.
pub fn is_correct(question: &Question, selected: Option<usize>) -> bool {
    selected == Some(question.correct_answer_index)
}

/// Scores a submission: one point per question whose selected option equals
/// the answer key. Unanswered questions never score.
pub fn score_answers(questions: &[Question], selected: &SelectedAnswers) -> ScoreSummary {
    let score = questions
        .iter()
        .enumerate()
        .filter(|(index, question)| is_correct(question, selected.get(index).copied()))
        .count();

    ScoreSummary {
        score: score as u32,
        total_questions: questions.len() as u32,
    }
}

/// `round(score / total * 100)` with halves rounded up, or 0 when `total` is 0.
pub fn percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let (score, total) = (u64::from(score), u64::from(total));
    ((score * 200 + total) / (total * 2)) as u32
}

/// Message shown next to a result.
pub fn feedback(percentage: u32) -> &'static str {
    match percentage {
        100.. => "Perfect Score! Outstanding!",
        80..=99 => "Excellent Job! You really know your stuff!",
        60..=79 => "Good Effort! Keep learning!",
        40..=59 => "Not bad! Room for improvement.",
        _ => "Keep practicing! You'll get there!",
    }
}

/// Reduces the attempt history to one entry per `(user, quiz)` pair.
///
/// The first attempt seen for a pair is kept unless a later one has a strictly
/// greater percentage, so equal percentages never replace an earlier result.
/// Output order is the order in which pairs first appear.
pub fn aggregate_best(attempts: &[Attempt]) -> Vec<LeaderboardEntry> {
    let mut best: Vec<LeaderboardEntry> = Vec::new();
    let mut slots: HashMap<(&str, &str), usize> = HashMap::new();

    for attempt in attempts {
        let pct = percentage(attempt.score, attempt.total_questions);
        let key = (attempt.user_id.as_str(), attempt.quiz_id.as_str());

        match slots.get(&key) {
            Some(&slot) => {
                if pct > best[slot].percentage {
                    best[slot] = entry_from(attempt, pct);
                }
            }
            None => {
                slots.insert(key, best.len());
                best.push(entry_from(attempt, pct));
            }
        }
    }

    best
}

fn entry_from(attempt: &Attempt, percentage: u32) -> LeaderboardEntry {
    LeaderboardEntry {
        user_id: attempt.user_id.clone(),
        quiz_id: attempt.quiz_id.clone(),
        quiz_title: attempt.quiz_title.clone(),
        score: attempt.score,
        total_questions: attempt.total_questions,
        percentage,
        timestamp: attempt.timestamp,
    }
}

/// Leaderboard order: percentage desc, then raw score desc, then earliest timestamp.
pub fn compare_entries(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.percentage
        .cmp(&a.percentage)
        .then_with(|| b.score.cmp(&a.score))
        .then_with(|| a.timestamp.cmp(&b.timestamp))
}

/// Sorts entries into leaderboard order. The sort is stable.
pub fn rank(mut entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    entries.sort_by(compare_entries);
    entries
}

/// Aggregates then ranks the full attempt history.
pub fn build_leaderboard(attempts: &[Attempt]) -> Vec<LeaderboardEntry> {
    rank(aggregate_best(attempts))
}

/// How one option relates to the submitted and the correct answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionMark {
    /// Picked by the user but wrong.
    Selected,
    /// Right answer, not picked.
    Correct,
    /// Picked and right.
    Both,
    Neither,
}

impl OptionMark {
    pub fn classify(option: usize, selected: Option<usize>, correct: usize) -> Self {
        let picked = selected == Some(option);
        match (picked, option == correct) {
            (true, true) => OptionMark::Both,
            (true, false) => OptionMark::Selected,
            (false, true) => OptionMark::Correct,
            (false, false) => OptionMark::Neither,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionReview {
    pub text: String,
    pub mark: OptionMark,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionReview {
    pub index: usize,
    pub text: String,
    pub selected_index: Option<usize>,
    pub correct_index: usize,
    pub is_correct: bool,
    pub options: Vec<OptionReview>,
}

/// Builds the read-only answer review for a submission.
pub fn review(questions: &[Question], selected: &SelectedAnswers) -> Vec<QuestionReview> {
    questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let picked = selected.get(&index).copied();
            QuestionReview {
                index,
                text: question.text.clone(),
                selected_index: picked,
                correct_index: question.correct_answer_index,
                is_correct: is_correct(question, picked),
                options: question
                    .options
                    .iter()
                    .enumerate()
                    .map(|(option, text)| OptionReview {
                        text: text.clone(),
                        mark: OptionMark::classify(option, picked, question.correct_answer_index),
                    })
                    .collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use sqlx::types::Json;

    fn quiz_with_key(key: &[usize]) -> Vec<Question> {
        key.iter()
            .enumerate()
            .map(|(i, &correct)| Question {
                text: format!("Question {}", i),
                options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                correct_answer_index: correct,
            })
            .collect()
    }

    fn answers(pairs: &[(usize, usize)]) -> SelectedAnswers {
        pairs.iter().copied().collect()
    }

    fn ts(second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, second).unwrap()
    }

    fn attempt(user: &str, quiz: &str, score: u32, total: u32, second: u32) -> Attempt {
        Attempt {
            id: 0,
            quiz_id: quiz.to_string(),
            quiz_title: format!("Title of {}", quiz),
            user_id: user.to_string(),
            score,
            total_questions: total,
            selected_answers: Json(SelectedAnswers::new()),
            timestamp: ts(second),
        }
    }

    #[test]
    fn test_score_worked_example() {
        let questions = quiz_with_key(&[1, 0, 2, 3]);
        let summary = score_answers(&questions, &answers(&[(0, 1), (1, 0), (2, 1), (3, 3)]));

        assert_eq!(summary.score, 3);
        assert_eq!(summary.total_questions, 4);
        assert_eq!(summary.percentage(), 75);
    }

    #[test]
    fn test_missing_answers_never_score() {
        let questions = quiz_with_key(&[1, 0, 2, 3]);
        let summary = score_answers(&questions, &answers(&[(0, 1)]));
        assert_eq!(summary.score, 1);
        assert_eq!(summary.total_questions, 4);
    }

    #[test]
    fn test_out_of_range_indices_are_ignored() {
        let questions = quiz_with_key(&[1, 0]);
        let summary = score_answers(&questions, &answers(&[(0, 9), (1, 0), (7, 1)]));
        assert_eq!(summary.score, 1);
    }

    #[test]
    fn test_score_bounded_by_question_count() {
        let key = [0, 1, 2, 3, 0, 1];
        let questions = quiz_with_key(&key);
        for choice in 0..4 {
            let all_same: SelectedAnswers = (0..key.len()).map(|i| (i, choice)).collect();
            let summary = score_answers(&questions, &all_same);
            assert!(summary.score <= summary.total_questions);
        }
        let perfect: SelectedAnswers = key.iter().copied().enumerate().collect();
        assert_eq!(score_answers(&questions, &perfect).score, 6);
    }

    #[test]
    fn test_score_is_monotonic() {
        let questions = quiz_with_key(&[2, 2, 2]);
        let mut selected = answers(&[(0, 0), (1, 0), (2, 0)]);
        let mut previous = score_answers(&questions, &selected).score;

        for i in 0..3 {
            selected.insert(i, 2);
            let now = score_answers(&questions, &selected).score;
            assert!(now >= previous);
            previous = now;
        }
        for i in 0..3 {
            selected.insert(i, 1);
            let now = score_answers(&questions, &selected).score;
            assert!(now <= previous);
            previous = now;
        }
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(3, 4), 75);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(0, 5), 0);
        assert_eq!(percentage(5, 5), 100);
    }

    #[test]
    fn test_percentage_zero_total() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(3, 0), 0);
    }

    #[test]
    fn test_percentage_within_bounds() {
        for total in 1..=40 {
            for score in 0..=total {
                let pct = percentage(score, total);
                assert!(pct <= 100);
                // Within half a point of the exact ratio.
                let diff = (i64::from(pct) * i64::from(total) - i64::from(score) * 100).abs();
                assert!(diff * 2 <= i64::from(total), "score {} of {}", score, total);
            }
        }
    }

    #[test]
    fn test_feedback_thresholds() {
        assert_eq!(feedback(100), "Perfect Score! Outstanding!");
        assert_eq!(feedback(80), "Excellent Job! You really know your stuff!");
        assert_eq!(feedback(60), "Good Effort! Keep learning!");
        assert_eq!(feedback(40), "Not bad! Room for improvement.");
        assert_eq!(feedback(39), "Keep practicing! You'll get there!");
    }

    #[test]
    fn test_empty_history_gives_empty_leaderboard() {
        assert!(build_leaderboard(&[]).is_empty());
    }

    #[test]
    fn test_better_retake_replaces_earlier_attempt() {
        let attempts = vec![attempt("a", "q1", 3, 4, 1), attempt("a", "q1", 4, 4, 2)];
        let board = build_leaderboard(&attempts);

        assert_eq!(board.len(), 1);
        assert_eq!(board[0].percentage, 100);
        assert_eq!(board[0].score, 4);
        assert_eq!(board[0].timestamp, ts(2));
    }

    #[test]
    fn test_equal_percentage_keeps_first_attempt() {
        // 2/4 and 3/6 are both 50%; the later, higher raw score does not replace the first.
        let attempts = vec![attempt("a", "q1", 2, 4, 1), attempt("a", "q1", 3, 6, 2)];
        let best = aggregate_best(&attempts);

        assert_eq!(best.len(), 1);
        assert_eq!(best[0].score, 2);
        assert_eq!(best[0].timestamp, ts(1));
    }

    #[test]
    fn test_worse_retake_is_ignored() {
        let attempts = vec![attempt("a", "q1", 4, 4, 1), attempt("a", "q1", 1, 4, 2)];
        let best = aggregate_best(&attempts);
        assert_eq!(best[0].percentage, 100);
    }

    #[test]
    fn test_one_entry_per_user_and_quiz() {
        let attempts = vec![
            attempt("a", "q1", 1, 4, 1),
            attempt("b", "q1", 2, 4, 2),
            attempt("a", "q2", 3, 4, 3),
            attempt("a", "q1", 2, 4, 4),
            attempt("b", "q1", 1, 4, 5),
            attempt("b", "q2", 0, 4, 6),
        ];
        let board = build_leaderboard(&attempts);
        assert_eq!(board.len(), 4);

        let mut keys: Vec<(String, String)> = board
            .iter()
            .map(|e| (e.user_id.clone(), e.quiz_id.clone()))
            .collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn test_earlier_timestamp_wins_full_tie() {
        let attempts = vec![attempt("y", "q1", 5, 5, 2), attempt("x", "q1", 5, 5, 1)];
        let board = build_leaderboard(&attempts);

        assert_eq!(board[0].user_id, "x");
        assert_eq!(board[1].user_id, "y");
    }

    #[test]
    fn test_raw_score_breaks_percentage_tie() {
        let attempts = vec![attempt("a", "q1", 1, 2, 1), attempt("b", "q2", 5, 10, 2)];
        let board = build_leaderboard(&attempts);

        assert_eq!(board[0].user_id, "b");
        assert_eq!(board[1].user_id, "a");
    }

    #[test]
    fn test_zero_question_attempt_ranks_at_zero() {
        let attempts = vec![attempt("a", "q1", 0, 0, 1), attempt("b", "q1", 1, 4, 2)];
        let board = build_leaderboard(&attempts);

        assert_eq!(board[1].user_id, "a");
        assert_eq!(board[1].percentage, 0);
    }

    #[test]
    fn test_ordering_holds_pairwise_and_is_deterministic() {
        let attempts = vec![
            attempt("a", "q1", 3, 4, 9),
            attempt("b", "q1", 4, 4, 8),
            attempt("c", "q2", 2, 3, 7),
            attempt("d", "q2", 3, 4, 1),
            attempt("e", "q3", 6, 8, 3),
            attempt("f", "q3", 1, 1, 5),
            attempt("a", "q3", 0, 2, 2),
        ];
        let board = build_leaderboard(&attempts);

        for pair in board.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                a.percentage > b.percentage
                    || (a.percentage == b.percentage && a.score > b.score)
                    || (a.percentage == b.percentage
                        && a.score == b.score
                        && a.timestamp <= b.timestamp)
            );
        }
        assert_eq!(board, build_leaderboard(&attempts));
    }

    #[test]
    fn test_option_marks() {
        assert_eq!(OptionMark::classify(1, Some(1), 1), OptionMark::Both);
        assert_eq!(OptionMark::classify(0, Some(0), 1), OptionMark::Selected);
        assert_eq!(OptionMark::classify(1, Some(0), 1), OptionMark::Correct);
        assert_eq!(OptionMark::classify(2, Some(0), 1), OptionMark::Neither);
        assert_eq!(OptionMark::classify(1, None, 1), OptionMark::Correct);
    }

    #[test]
    fn test_review_agrees_with_scorer() {
        let questions = quiz_with_key(&[1, 0, 2, 3]);
        let selected = answers(&[(0, 1), (1, 0), (2, 1), (3, 3)]);

        let reviewed = review(&questions, &selected);
        let correct = reviewed.iter().filter(|q| q.is_correct).count() as u32;
        assert_eq!(correct, score_answers(&questions, &selected).score);

        let wrong = &reviewed[2];
        assert!(!wrong.is_correct);
        assert_eq!(wrong.selected_index, Some(1));
        assert_eq!(wrong.options[1].mark, OptionMark::Selected);
        assert_eq!(wrong.options[2].mark, OptionMark::Correct);
        assert_eq!(reviewed[0].options[1].mark, OptionMark::Both);
    }
}
