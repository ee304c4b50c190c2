use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson},
    options::{IndexOptions, ReturnDocument},
    Collection, IndexModel,
};
use uuid::Uuid;

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{NewQuestion, Question, QuestionUpdate},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn list_by_exam_code(&self, exam_code: &str) -> AppResult<Vec<Question>>;
    /// Returns the matching questions in the order of `ids`; unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Question>>;
    async fn insert_question(&self, question: NewQuestion) -> AppResult<Question>;
    async fn update_question(&self, update: QuestionUpdate) -> AppResult<Question>;
    async fn delete_question(&self, id: &str) -> AppResult<()>;
}

pub struct MongoQuestionRepository {
    collection: Collection<Question>,
}

impl MongoQuestionRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.get_collection(collection_name);
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
        let exam_index = IndexModel::builder()
            .keys(doc! { "exam_code": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("exam_code_created_at".to_string())
                    .build(),
            )
            .build();

        self.collection.create_indexes([id_index, exam_index]).await?;

        log::info!("Successfully created indexes for questions collection");
        Ok(())
    }
}

#[async_trait]
impl QuestionRepository for MongoQuestionRepository {
    async fn list_by_exam_code(&self, exam_code: &str) -> AppResult<Vec<Question>> {
        let cursor = self
            .collection
            .find(doc! { "exam_code": exam_code })
            .sort(doc! { "created_at": -1 })
            .await?;
        let questions: Vec<Question> = cursor.try_collect().await?;
        Ok(questions)
    }

    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Question>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let cursor = self.collection.find(doc! { "id": { "$in": ids } }).await?;
        let mut found: Vec<Question> = cursor.try_collect().await?;

        // $in does not preserve order
        found.sort_by_key(|q| ids.iter().position(|id| id == &q.id).unwrap_or(usize::MAX));
        Ok(found)
    }

    async fn insert_question(&self, question: NewQuestion) -> AppResult<Question> {
        let question = question.into_question(Uuid::new_v4().to_string());
        self.collection.insert_one(&question).await?;

        log::info!(
            "Inserted question {} for exam {} ({})",
            question.id,
            question.exam_code,
            question.category
        );
        Ok(question)
    }

    async fn update_question(&self, update: QuestionUpdate) -> AppResult<Question> {
        let set = doc! {
            "question": &update.question,
            "answers": to_bson(&update.answers)?,
            "explanation": &update.explanation,
            "category": &update.category,
            "level": update.level.as_str(),
            "exam_code": &update.exam_code,
            "inactive": update.inactive,
            "updated_at": to_bson(&Utc::now())?,
        };

        let updated = self
            .collection
            .find_one_and_update(doc! { "id": &update.id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;

        match updated {
            Some(question) => {
                log::info!("Updated question {}", question.id);
                Ok(question)
            }
            None => Err(AppError::NotFound(format!(
                "Question with id '{}' not found",
                update.id
            ))),
        }
    }

    async fn delete_question(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Question with id '{}' not found",
                id
            )));
        }

        log::info!("Deleted question {}", id);
        Ok(())
    }
}
