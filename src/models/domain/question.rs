use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
pub enum QuestionType {
    #[serde(rename = "single-choice")]
    SingleChoice,
    #[serde(rename = "multiple-choice")]
    MultipleChoice,
    #[serde(rename = "number-input")]
    NumberInput,
    #[serde(rename = "text-input")]
    TextInput,
}

/// An answer option embedded in its question. Correctness is derived from the
/// score and is never stored independently.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Answer {
    pub id: String,
    pub text: String,
    pub score: f64,
}

impl Answer {
    pub fn new(text: &str, score: f64) -> Self {
        Answer {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            score,
        }
    }

    pub fn is_correct(&self) -> bool {
        self.score > 0.0
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub test_id: String,
    pub question_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub question_type: QuestionType,
    pub answers: Vec<Answer>,
    /// Similarity tolerance in percent, only meaningful for text-input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage_error: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Question {
    /// Creates a question pre-populated with default answers for its type, so
    /// a freshly created question is immediately valid and editable.
    pub fn new_with_defaults(test_id: &str, question_text: &str, question_type: QuestionType) -> Self {
        let (answers, percentage_error) = default_answers(question_type);

        Question {
            id: Uuid::new_v4().to_string(),
            test_id: test_id.to_string(),
            question_text: question_text.to_string(),
            image_url: None,
            question_type,
            answers,
            percentage_error,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    pub fn correct_answers(&self) -> impl Iterator<Item = &Answer> {
        self.answers.iter().filter(|a| a.is_correct())
    }

    /// Structural validation gate. Every write of a question (or of one of its
    /// embedded answers) must pass before persistence; evaluation assumes
    /// these invariants hold.
    pub fn validate(&self) -> AppResult<()> {
        match self.question_type {
            QuestionType::SingleChoice => self.validate_single_choice(),
            QuestionType::MultipleChoice => self.validate_multiple_choice(),
            QuestionType::NumberInput => {
                self.validate_single_valid_answer("number-input")
            }
            QuestionType::TextInput => {
                self.validate_single_valid_answer("text-input")?;
                self.validate_percentage_error()
            }
        }
    }

    fn validate_single_choice(&self) -> AppResult<()> {
        let non_empty: Vec<&Answer> = self.non_empty_answers();

        if non_empty.is_empty() {
            return Err(AppError::ValidationError(
                "At least one answer must have valid text.".to_string(),
            ));
        }

        let scored = non_empty.iter().filter(|a| a.is_correct()).count();
        if scored != 1 {
            return Err(AppError::ValidationError(
                "Only one answer can have a score greater than 0 in single-choice.".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_multiple_choice(&self) -> AppResult<()> {
        let non_empty: Vec<&Answer> = self.non_empty_answers();

        if non_empty.len() < 2 {
            return Err(AppError::ValidationError(
                "At least two answers must have valid text.".to_string(),
            ));
        }

        let scored = non_empty.iter().filter(|a| a.is_correct()).count();
        if scored < 2 {
            return Err(AppError::ValidationError(
                "At least two answers must have a score greater than 0 in multiple-choice."
                    .to_string(),
            ));
        }

        Ok(())
    }

    fn validate_single_valid_answer(&self, type_name: &str) -> AppResult<()> {
        let valid = self
            .answers
            .iter()
            .filter(|a| !a.text.trim().is_empty() && a.is_correct())
            .count();

        if valid != 1 {
            return Err(AppError::ValidationError(format!(
                "There must be exactly one answer with non-empty text and a score greater than 0 in {}.",
                type_name
            )));
        }

        Ok(())
    }

    fn validate_percentage_error(&self) -> AppResult<()> {
        match self.percentage_error {
            Some(value) if (0.0..=100.0).contains(&value) => Ok(()),
            Some(_) => Err(AppError::ValidationError(
                "Percentage error must be between 0 and 100.".to_string(),
            )),
            None => Err(AppError::ValidationError(
                "Percentage error is required for text-input questions.".to_string(),
            )),
        }
    }

    fn non_empty_answers(&self) -> Vec<&Answer> {
        self.answers
            .iter()
            .filter(|a| !a.text.trim().is_empty())
            .collect()
    }
}

fn default_answers(question_type: QuestionType) -> (Vec<Answer>, Option<f64>) {
    match question_type {
        QuestionType::SingleChoice => {
            let answers = (0..4)
                .map(|i| Answer::new(&format!("Answer {}", i + 1), if i == 0 { 1.0 } else { 0.0 }))
                .collect();
            (answers, None)
        }
        QuestionType::MultipleChoice => {
            let answers = (0..4)
                .map(|i| Answer::new(&format!("Answer {}", i + 1), if i < 2 { 1.0 } else { 0.0 }))
                .collect();
            (answers, None)
        }
        QuestionType::NumberInput => (vec![Answer::new("Correct Number", 1.0)], None),
        QuestionType::TextInput => (vec![Answer::new("Correct Text", 1.0)], Some(0.0)),
    }
}
