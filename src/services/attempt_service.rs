use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{AnswerValue, AttemptAnswer, Question, Test, TestAttempt, TestResult},
        dto::{
            request::SubmittedAnswer,
            response::{AvailableTestDto, QuestionForTakerDto, StartAttemptResponse, UserResultDto},
        },
    },
    repositories::{
        QuestionRepository, TestAttemptRepository, TestRepository, TestResultRepository,
        UserRepository,
    },
    services::locks::KeyedLocks,
    services::scoring::{calculate_grade, evaluate_answer, percentage_score, EvaluatedAnswer},
};

/// Drives a test-taking session from start through submission. Submission is
/// one-shot: the attempt is scored and frozen exactly once, under a
/// per-attempt lock so concurrent submits cannot both pass the completion
/// check.
pub struct AttemptService {
    attempts: Arc<dyn TestAttemptRepository>,
    results: Arc<dyn TestResultRepository>,
    tests: Arc<dyn TestRepository>,
    questions: Arc<dyn QuestionRepository>,
    users: Arc<dyn UserRepository>,
    submit_locks: KeyedLocks,
}

impl AttemptService {
    pub fn new(
        attempts: Arc<dyn TestAttemptRepository>,
        results: Arc<dyn TestResultRepository>,
        tests: Arc<dyn TestRepository>,
        questions: Arc<dyn QuestionRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            attempts,
            results,
            tests,
            questions,
            users,
            submit_locks: KeyedLocks::new(),
        }
    }

    /// Opens an attempt: snapshots the test's time limit and hands back the
    /// question set with the answer key stripped.
    pub async fn start_attempt(
        &self,
        user_id: &str,
        test_id: &str,
    ) -> AppResult<StartAttemptResponse> {
        let test = self
            .tests
            .find_by_id(test_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Test with id '{}' not found", test_id)))?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User or group not found".to_string()))?;
        let group_id = user
            .group_id
            .ok_or_else(|| AppError::NotFound("User or group not found".to_string()))?;

        if !test.available_for_groups.contains(&group_id) {
            return Err(AppError::Forbidden(
                "Test is not available for your group".to_string(),
            ));
        }

        if self
            .results
            .find_completed(user_id, test_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Test has already been completed".to_string(),
            ));
        }

        let attempt = TestAttempt::start(user_id, test_id, test.time_limit);
        let attempt = self.attempts.create(attempt).await?;

        let questions = self.questions_in_order(&test).await?;

        log::info!(
            "User {} started attempt {} on test {}",
            user_id,
            attempt.id,
            test_id
        );

        Ok(StartAttemptResponse {
            attempt_id: attempt.id,
            questions: questions.iter().map(QuestionForTakerDto::from).collect(),
            time_limit: attempt.time_limit,
        })
    }

    /// Scores and freezes an attempt. Submissions past the time limit are
    /// clamped to the window's end and score zero on every question.
    pub async fn submit_attempt(
        &self,
        attempt_id: &str,
        user_id: &str,
        submitted: &[SubmittedAnswer],
    ) -> AppResult<TestResult> {
        let _guard = self.submit_locks.acquire(attempt_id).await;

        let mut attempt = self
            .attempts
            .find_by_id(attempt_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Test attempt with id '{}' not found", attempt_id))
            })?;

        if attempt.user_id != user_id {
            return Err(AppError::Forbidden(
                "Attempt does not belong to the requesting user".to_string(),
            ));
        }

        if attempt.is_completed {
            return Err(AppError::Conflict(
                "Attempt has already been submitted".to_string(),
            ));
        }

        let test = self
            .tests
            .find_by_id(&attempt.test_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Test with id '{}' not found", attempt.test_id))
            })?;

        let now = Utc::now();
        let expired = attempt.is_expired_at(now);

        if expired {
            attempt.finished_at = Some(attempt.end_time());
            attempt.time_taken = Some(attempt.time_limit);
        } else {
            attempt.finished_at = Some(now);
            let minutes = ((now - attempt.started_at).num_seconds() as f64 / 60.0).round() as i64;
            attempt.time_taken = Some(minutes.min(attempt.time_limit));
        }

        let questions = self.questions_in_order(&test).await?;

        let by_question: HashMap<&str, &AnswerValue> = submitted
            .iter()
            .map(|a| (a.question_id.as_str(), &a.answer))
            .collect();

        let mut total_score = 0.0;
        let mut records = Vec::with_capacity(questions.len());
        for question in &questions {
            let value = by_question.get(question.id.as_str()).copied();

            let evaluated = if expired {
                EvaluatedAnswer {
                    is_correct: false,
                    score: 0.0,
                }
            } else {
                evaluate_answer(question, value)
            };

            total_score += evaluated.score;
            records.push(AttemptAnswer {
                question_id: question.id.clone(),
                answer: value.cloned(),
                is_correct: evaluated.is_correct,
                score: evaluated.score,
            });
        }

        attempt.answers = records;
        attempt.total_score = total_score;
        attempt.maximum_marks = test.maximum_marks;
        attempt.percentage_score = percentage_score(total_score, test.maximum_marks);
        attempt.is_completed = true;

        let grade = calculate_grade(total_score, test.maximum_marks, &test.minimum_scores)?;

        let attempt = self.attempts.update(attempt).await?;

        let result = TestResult::from_completed_attempt(&attempt, &test.author_id, &grade);
        let result = self.results.create(result).await?;

        log::info!(
            "Attempt {} submitted: {}/{} ({}%), grade {}{}",
            attempt.id,
            result.total_score,
            result.maximum_marks,
            result.percentage_score.round(),
            result.grade,
            if expired { " (expired)" } else { "" }
        );

        Ok(result)
    }

    pub async fn get_attempt(&self, attempt_id: &str, user_id: &str) -> AppResult<TestAttempt> {
        let attempt = self
            .attempts
            .find_by_id(attempt_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Test attempt with id '{}' not found", attempt_id))
            })?;

        if attempt.user_id != user_id {
            return Err(AppError::Forbidden(
                "Attempt does not belong to the requesting user".to_string(),
            ));
        }

        Ok(attempt)
    }

    /// Tests open to the user's group that they have not yet completed.
    pub async fn available_tests(&self, user_id: &str) -> AppResult<Vec<AvailableTestDto>> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User or group not found".to_string()))?;
        let group_id = user
            .group_id
            .ok_or_else(|| AppError::NotFound("User or group not found".to_string()))?;

        let completed = self.results.completed_test_ids(user_id).await?;
        let tests = self
            .tests
            .find_available_for_group(&group_id, &completed)
            .await?;

        Ok(tests.iter().map(AvailableTestDto::from).collect())
    }

    pub async fn user_results(&self, user_id: &str) -> AppResult<Vec<UserResultDto>> {
        let results = self.results.find_by_user(user_id).await?;
        Ok(results.iter().map(UserResultDto::from).collect())
    }

    /// Questions fetched for the test, in the test's authoring order.
    async fn questions_in_order(&self, test: &Test) -> AppResult<Vec<Question>> {
        let mut questions = self.questions.find_by_test(&test.id).await?;
        questions.sort_by_key(|q| {
            test.question_ids
                .iter()
                .position(|id| id == &q.id)
                .unwrap_or(usize::MAX)
        });
        Ok(questions)
    }
}
