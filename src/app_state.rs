use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        MongoGroupRepository, MongoQuestionRepository, MongoTestAttemptRepository,
        MongoTestRepository, MongoTestResultRepository, MongoUserRepository,
    },
    services::{AttemptService, QuestionService, TestService},
};

#[derive(Clone)]
pub struct AppState {
    pub test_service: Arc<TestService>,
    pub question_service: Arc<QuestionService>,
    pub attempt_service: Arc<AttemptService>,
    pub db: Database,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let test_repository = Arc::new(MongoTestRepository::new(&db));
        test_repository.ensure_indexes().await?;

        let question_repository = Arc::new(MongoQuestionRepository::new(&db));
        question_repository.ensure_indexes().await?;

        let attempt_repository = Arc::new(MongoTestAttemptRepository::new(&db));
        attempt_repository.ensure_indexes().await?;

        let result_repository = Arc::new(MongoTestResultRepository::new(&db));
        result_repository.ensure_indexes().await?;

        let user_repository = Arc::new(MongoUserRepository::new(&db));
        user_repository.ensure_indexes().await?;

        let group_repository = Arc::new(MongoGroupRepository::new(&db));
        group_repository.ensure_indexes().await?;

        let test_service = Arc::new(TestService::new(
            test_repository.clone(),
            question_repository.clone(),
            group_repository.clone(),
            user_repository.clone(),
            result_repository.clone(),
        ));

        let question_service = Arc::new(QuestionService::new(
            question_repository.clone(),
            test_repository.clone(),
            test_service.clone(),
        ));

        let attempt_service = Arc::new(AttemptService::new(
            attempt_repository,
            result_repository,
            test_repository,
            question_repository,
            user_repository,
        ));

        Ok(Self {
            test_service,
            question_service,
            attempt_service,
            db,
            config: Arc::new(config),
        })
    }
}
