use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::ExamCategory};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Category names for an exam, alphabetically.
    async fn list_categories(&self, exam_code: &str) -> AppResult<Vec<String>>;
}

pub struct MongoCategoryRepository {
    collection: Collection<ExamCategory>,
}

impl MongoCategoryRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.get_collection(collection_name);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for exam categories collection");

        let model = IndexModel::builder()
            .keys(doc! { "exam_code": 1, "name": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("exam_code_name_unique".to_string())
                    .build(),
            )
            .build();
        self.collection.create_index(model).await?;

        log::info!("Successfully created indexes for exam categories collection");
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for MongoCategoryRepository {
    async fn list_categories(&self, exam_code: &str) -> AppResult<Vec<String>> {
        let cursor = self
            .collection
            .find(doc! { "exam_code": exam_code })
            .sort(doc! { "name": 1 })
            .await?;
        let categories: Vec<ExamCategory> = cursor.try_collect().await?;
        Ok(categories.into_iter().map(|c| c.name).collect())
    }
}
