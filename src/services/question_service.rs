use std::sync::Arc;

use chrono::Utc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Answer, Question, QuestionType},
        dto::request::{
            CreateAnswerRequest, CreateQuestionRequest, UpdateAnswerRequest, UpdateQuestionRequest,
        },
    },
    repositories::{QuestionRepository, TestRepository},
    services::test_service::TestService,
};

/// Write path for questions and their embedded answers. Every mutation runs
/// the structural validation gate before persisting, and every mutation that
/// can move scores re-triggers the test's maximum-marks recompute.
pub struct QuestionService {
    questions: Arc<dyn QuestionRepository>,
    tests: Arc<dyn TestRepository>,
    test_service: Arc<TestService>,
}

impl QuestionService {
    pub fn new(
        questions: Arc<dyn QuestionRepository>,
        tests: Arc<dyn TestRepository>,
        test_service: Arc<TestService>,
    ) -> Self {
        Self {
            questions,
            tests,
            test_service,
        }
    }

    pub async fn create_question(
        &self,
        test_id: &str,
        request: CreateQuestionRequest,
    ) -> AppResult<Question> {
        let mut test = self
            .tests
            .find_by_id(test_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Test with id '{}' not found", test_id)))?;

        let mut question =
            Question::new_with_defaults(test_id, &request.question_text, request.question_type);
        question.image_url = request.image_url;

        question.validate()?;

        let question = self.questions.create(question).await?;

        test.question_ids.push(question.id.clone());
        test.modified_at = Some(Utc::now());
        self.tests.update(test).await?;

        self.test_service.recompute_maximum_marks(test_id).await?;

        log::info!("Created question {} on test {}", question.id, test_id);
        Ok(question)
    }

    pub async fn get_questions(&self, test_id: &str) -> AppResult<Vec<Question>> {
        self.questions.find_by_test(test_id).await
    }

    pub async fn update_question(
        &self,
        test_id: &str,
        question_id: &str,
        request: UpdateQuestionRequest,
    ) -> AppResult<Question> {
        let mut question = self.get_question(test_id, question_id).await?;

        if request.percentage_error.is_some()
            && question.question_type != QuestionType::TextInput
        {
            return Err(AppError::ValidationError(
                "Percentage error can only be set on text-input questions.".to_string(),
            ));
        }

        if let Some(question_text) = request.question_text {
            question.question_text = question_text;
        }
        if let Some(image_url) = request.image_url {
            question.image_url = Some(image_url);
        }
        if let Some(percentage_error) = request.percentage_error {
            question.percentage_error = Some(percentage_error);
        }
        question.modified_at = Some(Utc::now());

        question.validate()?;

        self.questions.update(question).await
    }

    pub async fn delete_question(&self, test_id: &str, question_id: &str) -> AppResult<()> {
        self.get_question(test_id, question_id).await?;

        self.questions.delete(test_id, question_id).await?;

        if let Some(mut test) = self.tests.find_by_id(test_id).await? {
            test.question_ids.retain(|id| id != question_id);
            test.modified_at = Some(Utc::now());
            self.tests.update(test).await?;
            self.test_service.recompute_maximum_marks(test_id).await?;
        }

        log::info!("Deleted question {} from test {}", question_id, test_id);
        Ok(())
    }

    pub async fn add_answer(
        &self,
        test_id: &str,
        question_id: &str,
        request: CreateAnswerRequest,
    ) -> AppResult<Question> {
        let mut question = self.get_question(test_id, question_id).await?;

        question
            .answers
            .push(Answer::new(&request.text, request.score));
        question.modified_at = Some(Utc::now());

        question.validate()?;

        let question = self.questions.update(question).await?;
        self.test_service.recompute_maximum_marks(test_id).await?;

        Ok(question)
    }

    pub async fn update_answer(
        &self,
        test_id: &str,
        question_id: &str,
        answer_id: &str,
        request: UpdateAnswerRequest,
    ) -> AppResult<Question> {
        let mut question = self.get_question(test_id, question_id).await?;

        let answer = question
            .answers
            .iter_mut()
            .find(|a| a.id == answer_id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Answer with id '{}' not found", answer_id))
            })?;

        if let Some(text) = request.text {
            answer.text = text;
        }
        if let Some(score) = request.score {
            answer.score = score;
        }
        question.modified_at = Some(Utc::now());

        question.validate()?;

        let question = self.questions.update(question).await?;
        self.test_service.recompute_maximum_marks(test_id).await?;

        Ok(question)
    }

    pub async fn delete_answer(
        &self,
        test_id: &str,
        question_id: &str,
        answer_id: &str,
    ) -> AppResult<Question> {
        let mut question = self.get_question(test_id, question_id).await?;

        let before = question.answers.len();
        question.answers.retain(|a| a.id != answer_id);
        if question.answers.len() == before {
            return Err(AppError::NotFound(format!(
                "Answer with id '{}' not found",
                answer_id
            )));
        }
        question.modified_at = Some(Utc::now());

        question.validate()?;

        let question = self.questions.update(question).await?;
        self.test_service.recompute_maximum_marks(test_id).await?;

        Ok(question)
    }

    async fn get_question(&self, test_id: &str, question_id: &str) -> AppResult<Question> {
        self.questions
            .find_by_id(test_id, question_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Question with id '{}' not found", question_id))
            })
    }
}
