use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::test_attempt::TestAttempt;

/// Read-optimized summary of a completed attempt. Created exactly once per
/// completed attempt, append-only thereafter.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TestResult {
    pub id: String,
    pub user_id: String,
    pub test_id: String,
    pub attempt_id: String,
    pub author_id: String,
    pub start_time: DateTime<Utc>,
    pub finish_time: DateTime<Utc>,
    pub time_taken: i64,
    pub total_score: f64,
    pub maximum_marks: f64,
    pub percentage_score: f64,
    pub grade: String,
    pub is_completed: bool,
}

impl TestResult {
    /// Snapshots a completed attempt. Callers must only pass attempts that
    /// have gone through submission (`finished_at`/`time_taken` set).
    pub fn from_completed_attempt(attempt: &TestAttempt, author_id: &str, grade: &str) -> Self {
        TestResult {
            id: Uuid::new_v4().to_string(),
            user_id: attempt.user_id.clone(),
            test_id: attempt.test_id.clone(),
            attempt_id: attempt.id.clone(),
            author_id: author_id.to_string(),
            start_time: attempt.started_at,
            finish_time: attempt.finished_at.unwrap_or(attempt.started_at),
            time_taken: attempt.time_taken.unwrap_or(0),
            total_score: attempt.total_score,
            maximum_marks: attempt.maximum_marks,
            percentage_score: attempt.percentage_score,
            grade: grade.to_string(),
            is_completed: attempt.is_completed,
        }
    }
}
