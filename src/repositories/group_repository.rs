use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::Group};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Group>>;
    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Group>>;
}

pub struct MongoGroupRepository {
    collection: Collection<Group>,
}

impl MongoGroupRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("groups");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for groups collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;

        Ok(())
    }
}

#[async_trait]
impl GroupRepository for MongoGroupRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Group>> {
        let group = self.collection.find_one(doc! { "id": id }).await?;
        Ok(group)
    }

    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Group>> {
        let groups = self
            .collection
            .find(doc! { "id": { "$in": ids } })
            .await?
            .try_collect()
            .await?;
        Ok(groups)
    }
}
