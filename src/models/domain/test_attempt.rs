use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A submitted answer payload. The wire shape depends on the question type:
/// choice questions send option ids, number-input sends a number (or a numeric
/// string), text-input sends free text.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Selection(Vec<String>),
    Number(f64),
    Text(String),
}

/// Per-question record on an attempt, written once at submission.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AttemptAnswer {
    pub question_id: String,
    pub answer: Option<AnswerValue>,
    pub is_correct: bool,
    pub score: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TestAttempt {
    pub id: String,
    pub user_id: String,
    pub test_id: String,
    pub started_at: DateTime<Utc>,
    /// Minutes, snapshotted from the test at creation. Later test edits do
    /// not change an in-progress attempt's limit.
    pub time_limit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    /// Minutes, capped at `time_limit`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_taken: Option<i64>,
    pub answers: Vec<AttemptAnswer>,
    pub total_score: f64,
    /// Snapshot of the test's maximum marks, taken at submission.
    pub maximum_marks: f64,
    pub percentage_score: f64,
    pub is_completed: bool,
}

impl TestAttempt {
    pub fn start(user_id: &str, test_id: &str, time_limit: i64) -> Self {
        TestAttempt {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            test_id: test_id.to_string(),
            started_at: Utc::now(),
            time_limit,
            finished_at: None,
            time_taken: None,
            answers: Vec::new(),
            total_score: 0.0,
            maximum_marks: 0.0,
            percentage_score: 0.0,
            is_completed: false,
        }
    }

    /// The instant the attempt's time window closes.
    pub fn end_time(&self) -> DateTime<Utc> {
        self.started_at + Duration::minutes(self.time_limit)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.end_time()
    }
}
