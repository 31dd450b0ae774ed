use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::TestResult};

/// Results are append-only: there is no update or delete.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TestResultRepository: Send + Sync {
    async fn create(&self, result: TestResult) -> AppResult<TestResult>;
    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<TestResult>>;
    async fn find_by_test(&self, test_id: &str) -> AppResult<Vec<TestResult>>;
    async fn find_completed(&self, user_id: &str, test_id: &str)
        -> AppResult<Option<TestResult>>;
    /// Ids of tests the user has a completed result for.
    async fn completed_test_ids(&self, user_id: &str) -> AppResult<Vec<String>>;
}

pub struct MongoTestResultRepository {
    collection: Collection<TestResult>,
}

impl MongoTestResultRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("test_results");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for test_results collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let user_test_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "test_id": 1 })
            .options(IndexOptions::builder().name("user_test".to_string()).build())
            .build();

        let test_index = IndexModel::builder()
            .keys(doc! { "test_id": 1 })
            .options(IndexOptions::builder().name("test_id".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(user_test_index).await?;
        self.collection.create_index(test_index).await?;

        Ok(())
    }
}

#[async_trait]
impl TestResultRepository for MongoTestResultRepository {
    async fn create(&self, result: TestResult) -> AppResult<TestResult> {
        self.collection.insert_one(&result).await?;
        Ok(result)
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<TestResult>> {
        let results = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "start_time": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(results)
    }

    async fn find_by_test(&self, test_id: &str) -> AppResult<Vec<TestResult>> {
        let results = self
            .collection
            .find(doc! { "test_id": test_id })
            .await?
            .try_collect()
            .await?;
        Ok(results)
    }

    async fn find_completed(
        &self,
        user_id: &str,
        test_id: &str,
    ) -> AppResult<Option<TestResult>> {
        let result = self
            .collection
            .find_one(doc! {
                "user_id": user_id,
                "test_id": test_id,
                "is_completed": true
            })
            .await?;
        Ok(result)
    }

    async fn completed_test_ids(&self, user_id: &str) -> AppResult<Vec<String>> {
        let results: Vec<TestResult> = self
            .collection
            .find(doc! { "user_id": user_id, "is_completed": true })
            .await?
            .try_collect()
            .await?;

        let mut ids: Vec<String> = results.into_iter().map(|r| r.test_id).collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }
}
