use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        CategoryRepository, ExamRepository, MongoCategoryRepository, MongoExamRepository,
        MongoQuestionRepository, QuestionRepository,
    },
    services::{CreationService, Notifier, RevisionService},
};

#[derive(Clone)]
pub struct AppState {
    pub questions: Arc<dyn QuestionRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub exams: Arc<dyn ExamRepository>,
    pub db: Option<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let questions = Arc::new(MongoQuestionRepository::new(&db, &config.questions_collection));
        questions.ensure_indexes().await?;

        let categories = Arc::new(MongoCategoryRepository::new(
            &db,
            &config.categories_collection,
        ));
        categories.ensure_indexes().await?;

        let exams = Arc::new(MongoExamRepository::new(&db, &config.exams_collection));

        Ok(Self {
            questions,
            categories,
            exams,
            db: Some(db),
            config: Arc::new(config),
        })
    }

    /// State without a live database, for wiring alternative repositories.
    pub fn from_parts(
        questions: Arc<dyn QuestionRepository>,
        categories: Arc<dyn CategoryRepository>,
        exams: Arc<dyn ExamRepository>,
        config: Config,
    ) -> Self {
        Self {
            questions,
            categories,
            exams,
            db: None,
            config: Arc::new(config),
        }
    }

    /// Services are cheap and bound to the request's notifier.
    pub fn creation_service(&self, notifier: Arc<dyn Notifier>) -> CreationService {
        CreationService::new(self.questions.clone(), notifier)
    }

    pub fn revision_service(&self, notifier: Arc<dyn Notifier>) -> RevisionService {
        RevisionService::new(self.questions.clone(), notifier)
    }
}
