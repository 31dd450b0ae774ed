use serde::Deserialize;
use validator::Validate;

use crate::models::domain::question::QuestionType;
use crate::models::domain::test::{GradeThreshold, TestStatus};
use crate::models::domain::test_attempt::AnswerValue;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTestRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1, max = 2000))]
    pub description: String,

    #[validate(range(min = 1, max = 600))]
    pub time_limit: i64,

    pub available_for_groups: Vec<String>,

    pub status: Option<TestStatus>,

    pub minimum_scores: Option<Vec<GradeThreshold>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTestRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 2000))]
    pub description: Option<String>,

    #[validate(range(min = 1, max = 600))]
    pub time_limit: Option<i64>,

    pub available_for_groups: Option<Vec<String>>,

    pub status: Option<TestStatus>,

    pub minimum_scores: Option<Vec<GradeThreshold>>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Copy)]
pub enum GroupAction {
    #[serde(rename = "add")]
    Add,
    #[serde(rename = "remove")]
    Remove,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTestGroupsRequest {
    #[validate(length(min = 1))]
    pub group_id: String,

    pub action: GroupAction,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 2000))]
    pub question_text: String,

    pub image_url: Option<String>,

    pub question_type: QuestionType,
}

/// Only text, image and tolerance are editable on a question; answers are
/// managed through the answer endpoints.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, max = 2000))]
    pub question_text: Option<String>,

    pub image_url: Option<String>,

    #[validate(range(min = 0.0, max = 100.0))]
    pub percentage_error: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAnswerRequest {
    #[validate(length(min = 1, max = 1000))]
    pub text: String,

    #[validate(range(min = 0.0))]
    pub score: f64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAnswerRequest {
    #[validate(length(min = 1, max = 1000))]
    pub text: Option<String>,

    #[validate(range(min = 0.0))]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedAnswer {
    pub question_id: String,
    pub answer: AnswerValue,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAttemptRequest {
    pub answers: Vec<SubmittedAnswer>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_create_test_request() {
        let request = CreateTestRequest {
            title: "Algebra".to_string(),
            description: "Linear equations".to_string(),
            time_limit: 30,
            available_for_groups: vec!["g-1".to_string()],
            status: None,
            minimum_scores: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_zero_time_limit_rejected() {
        let request = CreateTestRequest {
            title: "Algebra".to_string(),
            description: "Linear equations".to_string(),
            time_limit: 0,
            available_for_groups: vec![],
            status: None,
            minimum_scores: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_negative_answer_score_rejected() {
        let request = CreateAnswerRequest {
            text: "An option".to_string(),
            score: -1.0,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_submit_request_parses_mixed_answer_shapes() {
        let json = r#"{
            "answers": [
                {"question_id": "q-1", "answer": ["opt-1"]},
                {"question_id": "q-2", "answer": 42},
                {"question_id": "q-3", "answer": "ferrous oxide"}
            ]
        }"#;

        let request: SubmitAttemptRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.answers.len(), 3);
        assert_eq!(
            request.answers[0].answer,
            AnswerValue::Selection(vec!["opt-1".into()])
        );
        assert_eq!(request.answers[1].answer, AnswerValue::Number(42.0));
        assert_eq!(
            request.answers[2].answer,
            AnswerValue::Text("ferrous oxide".into())
        );
    }

    #[test]
    fn test_group_action_parses() {
        let request: UpdateTestGroupsRequest =
            serde_json::from_str(r#"{"group_id": "g-1", "action": "add"}"#).unwrap();
        assert_eq!(request.action, GroupAction::Add);
    }
}
