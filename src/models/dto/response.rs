use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::question::{Question, QuestionType};
use crate::models::domain::test::Test;
use crate::models::domain::test_result::TestResult;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, message: &str) -> Self {
        ApiResponse {
            data,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        MessageResponse {
            message: message.to_string(),
        }
    }
}

/// An answer option as shown to a test-taker: id and text only, never the
/// score or correctness.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerOptionDto {
    pub id: String,
    pub text: String,
}

/// A question stripped of its answer key. Choice questions list their options;
/// number/text questions expose no answers at all.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionForTakerDto {
    pub id: String,
    pub question_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub question_type: QuestionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answers: Option<Vec<AnswerOptionDto>>,
}

impl From<&Question> for QuestionForTakerDto {
    fn from(question: &Question) -> Self {
        let answers = match question.question_type {
            QuestionType::SingleChoice | QuestionType::MultipleChoice => Some(
                question
                    .answers
                    .iter()
                    .map(|a| AnswerOptionDto {
                        id: a.id.clone(),
                        text: a.text.clone(),
                    })
                    .collect(),
            ),
            QuestionType::NumberInput | QuestionType::TextInput => None,
        };

        QuestionForTakerDto {
            id: question.id.clone(),
            question_text: question.question_text.clone(),
            image_url: question.image_url.clone(),
            question_type: question.question_type,
            answers,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StartAttemptResponse {
    pub attempt_id: String,
    pub questions: Vec<QuestionForTakerDto>,
    pub time_limit: i64,
}

#[derive(Debug, Serialize)]
pub struct AvailableTestDto {
    pub id: String,
    pub title: String,
    pub status: String,
}

impl From<&Test> for AvailableTestDto {
    fn from(test: &Test) -> Self {
        AvailableTestDto {
            id: test.id.clone(),
            title: test.title.clone(),
            status: match test.status {
                crate::models::domain::test::TestStatus::Active => "active".to_string(),
                crate::models::domain::test::TestStatus::Inactive => "inactive".to_string(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResultDto {
    pub test_id: String,
    pub start_time: DateTime<Utc>,
    pub time_taken: i64,
    pub maximum_marks: f64,
    pub obtained_marks: f64,
    pub percentage_score: f64,
    pub grade: String,
}

impl From<&TestResult> for UserResultDto {
    fn from(result: &TestResult) -> Self {
        UserResultDto {
            test_id: result.test_id.clone(),
            start_time: result.start_time,
            time_taken: result.time_taken,
            maximum_marks: result.maximum_marks,
            obtained_marks: result.total_score,
            percentage_score: result.percentage_score,
            grade: result.grade.clone(),
        }
    }
}

/// A member row in the author-facing results overview. Members without a
/// completed result get a zeroed placeholder row.
#[derive(Debug, Serialize)]
pub struct ParticipantResultDto {
    pub user_id: String,
    pub user_name: String,
    pub test_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_time: Option<DateTime<Utc>>,
    pub time_taken: i64,
    pub maximum_marks: f64,
    pub total_score: f64,
    pub percentage_score: f64,
    pub grade: String,
}

impl ParticipantResultDto {
    pub fn not_completed(user_id: &str, user_name: &str, maximum_marks: f64) -> Self {
        ParticipantResultDto {
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            test_status: "Not completed".to_string(),
            start_time: None,
            finish_time: None,
            time_taken: 0,
            maximum_marks,
            total_score: 0.0,
            percentage_score: 0.0,
            grade: "Not graded".to_string(),
        }
    }

    pub fn from_result(result: &TestResult, user_name: &str) -> Self {
        ParticipantResultDto {
            user_id: result.user_id.clone(),
            user_name: user_name.to_string(),
            test_status: if result.is_completed {
                "Completed".to_string()
            } else {
                "Not completed".to_string()
            },
            start_time: Some(result.start_time),
            finish_time: Some(result.finish_time),
            time_taken: result.time_taken,
            maximum_marks: result.maximum_marks,
            total_score: result.total_score,
            percentage_score: result.percentage_score,
            grade: result.grade.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GroupResultsDto {
    pub group_name: String,
    pub participants: Vec<ParticipantResultDto>,
}

#[derive(Debug, Serialize)]
pub struct TestResultsOverviewResponse {
    pub test_name: String,
    pub test_author: String,
    pub groups: Vec<GroupResultsDto>,
}
