use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::Question};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn create(&self, question: Question) -> AppResult<Question>;
    async fn find_by_id(&self, test_id: &str, question_id: &str) -> AppResult<Option<Question>>;
    /// All questions of a test in authoring order.
    async fn find_by_test(&self, test_id: &str) -> AppResult<Vec<Question>>;
    async fn update(&self, question: Question) -> AppResult<Question>;
    async fn delete(&self, test_id: &str, question_id: &str) -> AppResult<()>;
}

pub struct MongoQuestionRepository {
    collection: Collection<Question>,
}

impl MongoQuestionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("questions");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for questions collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let test_index = IndexModel::builder()
            .keys(doc! { "test_id": 1 })
            .options(IndexOptions::builder().name("test_id".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(test_index).await?;

        Ok(())
    }
}

#[async_trait]
impl QuestionRepository for MongoQuestionRepository {
    async fn create(&self, question: Question) -> AppResult<Question> {
        self.collection.insert_one(&question).await?;
        Ok(question)
    }

    async fn find_by_id(&self, test_id: &str, question_id: &str) -> AppResult<Option<Question>> {
        let question = self
            .collection
            .find_one(doc! { "id": question_id, "test_id": test_id })
            .await?;
        Ok(question)
    }

    async fn find_by_test(&self, test_id: &str) -> AppResult<Vec<Question>> {
        let questions = self
            .collection
            .find(doc! { "test_id": test_id })
            .sort(doc! { "created_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(questions)
    }

    async fn update(&self, question: Question) -> AppResult<Question> {
        self.collection
            .replace_one(
                doc! { "id": &question.id, "test_id": &question.test_id },
                &question,
            )
            .await?;
        Ok(question)
    }

    async fn delete(&self, test_id: &str, question_id: &str) -> AppResult<()> {
        self.collection
            .delete_one(doc! { "id": question_id, "test_id": test_id })
            .await?;
        Ok(())
    }
}
