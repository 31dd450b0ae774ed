use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::Test};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TestRepository: Send + Sync {
    async fn create(&self, test: Test) -> AppResult<Test>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Test>>;
    async fn find_by_author(&self, author_id: &str) -> AppResult<Vec<Test>>;
    /// Tests open to the given group, excluding the listed test ids.
    async fn find_available_for_group(
        &self,
        group_id: &str,
        exclude_ids: &[String],
    ) -> AppResult<Vec<Test>>;
    async fn update(&self, test: Test) -> AppResult<Test>;
    async fn set_maximum_marks(&self, id: &str, maximum_marks: f64) -> AppResult<()>;
    async fn delete(&self, id: &str) -> AppResult<()>;
}

pub struct MongoTestRepository {
    collection: Collection<Test>,
}

impl MongoTestRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("tests");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for tests collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let author_index = IndexModel::builder()
            .keys(doc! { "author_id": 1 })
            .options(IndexOptions::builder().name("author_id".to_string()).build())
            .build();

        let groups_index = IndexModel::builder()
            .keys(doc! { "available_for_groups": 1 })
            .options(
                IndexOptions::builder()
                    .name("available_for_groups".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(author_index).await?;
        self.collection.create_index(groups_index).await?;

        Ok(())
    }
}

#[async_trait]
impl TestRepository for MongoTestRepository {
    async fn create(&self, test: Test) -> AppResult<Test> {
        self.collection.insert_one(&test).await?;
        Ok(test)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Test>> {
        let test = self.collection.find_one(doc! { "id": id }).await?;
        Ok(test)
    }

    async fn find_by_author(&self, author_id: &str) -> AppResult<Vec<Test>> {
        let tests = self
            .collection
            .find(doc! { "author_id": author_id })
            .await?
            .try_collect()
            .await?;
        Ok(tests)
    }

    async fn find_available_for_group(
        &self,
        group_id: &str,
        exclude_ids: &[String],
    ) -> AppResult<Vec<Test>> {
        let tests = self
            .collection
            .find(doc! {
                "available_for_groups": group_id,
                "id": { "$nin": exclude_ids }
            })
            .await?
            .try_collect()
            .await?;
        Ok(tests)
    }

    async fn update(&self, test: Test) -> AppResult<Test> {
        self.collection
            .replace_one(doc! { "id": &test.id }, &test)
            .await?;
        Ok(test)
    }

    async fn set_maximum_marks(&self, id: &str, maximum_marks: f64) -> AppResult<()> {
        self.collection
            .update_one(
                doc! { "id": id },
                doc! { "$set": { "maximum_marks": maximum_marks } },
            )
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.collection.delete_one(doc! { "id": id }).await?;
        Ok(())
    }
}
