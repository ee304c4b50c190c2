use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    app_state::AppState,
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{Exam, NewQuestion, Question, QuestionUpdate},
    repositories::{CategoryRepository, ExamRepository, QuestionRepository},
};

pub mod fixtures {
    use crate::models::domain::{Answer, Exam, Level, Question};
    use chrono::Utc;

    /// A valid single-answer question for exam SAA-C03.
    pub fn sample_question(id: &str, category: &str) -> Question {
        Question {
            id: id.to_string(),
            question: "Which S3 storage class is the lowest-cost option for data retained for years and rarely read?".to_string(),
            answers: vec![
                Answer::new("S3 Glacier Deep Archive", true),
                Answer::new("S3 Standard", false),
                Answer::new("S3 One Zone-IA", false),
                Answer::new("S3 Intelligent-Tiering", false),
            ],
            explanation: "<p>Glacier Deep Archive has the lowest storage price for long-term retention.</p>".to_string(),
            level: Level::Intermediate,
            category: category.to_string(),
            exam_code: "SAA-C03".to_string(),
            inactive: false,
            created_at: Some(Utc::now()),
            updated_at: None,
        }
    }

    pub fn sample_exam() -> Exam {
        let mut exam = Exam::new("SAA-C03", "Solutions Architect Associate", true);
        exam.provider = Some("AWS".to_string());
        exam
    }

    /// LLM output with one valid single-answer question per entry in `questions`.
    pub fn creation_payload(questions: &[&str]) -> String {
        let items: Vec<serde_json::Value> = questions
            .iter()
            .map(|question| {
                serde_json::json!({
                    "question": question,
                    "answers": [
                        { "text": "Amazon S3", "isCorrect": true },
                        { "text": "Amazon EBS", "isCorrect": false },
                        { "text": "Amazon EFS", "isCorrect": false },
                        { "text": "Instance store", "isCorrect": false }
                    ],
                    "explanation": "<p>S3 is object storage.</p>",
                    "level": "Beginner"
                })
            })
            .collect();
        serde_json::json!({ "questions": items }).to_string()
    }
}

pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

/// Question store with the ordering and not-found behaviour of the Mongo
/// repository. `tests/common` carries the same fake for integration tests.
#[derive(Default)]
pub struct InMemoryQuestionRepository {
    questions: RwLock<HashMap<String, Question>>,
    next_id: RwLock<u64>,
    /// Questions whose insert or update always fails.
    failing: RwLock<Vec<String>>,
}

impl InMemoryQuestionRepository {
    pub fn with_questions(questions: Vec<Question>) -> Self {
        Self {
            questions: RwLock::new(questions.into_iter().map(|q| (q.id.clone(), q)).collect()),
            ..Self::default()
        }
    }

    /// Makes writes of questions whose id or text equals `key` fail.
    pub async fn fail_on(&self, key: &str) {
        self.failing.write().await.push(key.to_string());
    }

    pub async fn get(&self, id: &str) -> Option<Question> {
        self.questions.read().await.get(id).cloned()
    }

    pub async fn count(&self) -> usize {
        self.questions.read().await.len()
    }

    async fn should_fail(&self, keys: &[&str]) -> bool {
        let failing = self.failing.read().await;
        keys.iter().any(|key| failing.iter().any(|f| f == key))
    }
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn list_by_exam_code(&self, exam_code: &str) -> AppResult<Vec<Question>> {
        let questions = self.questions.read().await;
        let mut items: Vec<Question> = questions
            .values()
            .filter(|q| q.exam_code == exam_code)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Question>> {
        let questions = self.questions.read().await;
        Ok(ids.iter().filter_map(|id| questions.get(id).cloned()).collect())
    }

    async fn insert_question(&self, question: NewQuestion) -> AppResult<Question> {
        if self.should_fail(&[question.question.as_str()]).await {
            return Err(AppError::DatabaseError("insert rejected".to_string()));
        }
        let mut next_id = self.next_id.write().await;
        let mut questions = self.questions.write().await;
        let id = loop {
            *next_id += 1;
            let id = format!("gen-{}", *next_id);
            if !questions.contains_key(&id) {
                break id;
            }
        };

        let question = question.into_question(id);
        questions.insert(question.id.clone(), question.clone());
        Ok(question)
    }

    async fn update_question(&self, update: QuestionUpdate) -> AppResult<Question> {
        if self.should_fail(&[update.id.as_str()]).await {
            return Err(AppError::DatabaseError("update rejected".to_string()));
        }
        let mut questions = self.questions.write().await;
        let Some(existing) = questions.get_mut(&update.id) else {
            return Err(AppError::NotFound(format!(
                "Question with id '{}' not found",
                update.id
            )));
        };

        existing.question = update.question;
        existing.answers = update.answers;
        existing.explanation = update.explanation;
        existing.category = update.category;
        existing.level = update.level;
        existing.exam_code = update.exam_code;
        existing.inactive = update.inactive;
        existing.updated_at = Some(Utc::now());
        Ok(existing.clone())
    }

    async fn delete_question(&self, id: &str) -> AppResult<()> {
        let mut questions = self.questions.write().await;
        if questions.remove(id).is_none() {
            return Err(AppError::NotFound(format!(
                "Question with id '{}' not found",
                id
            )));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryCategoryRepository {
    categories: HashMap<String, Vec<String>>,
}

impl InMemoryCategoryRepository {
    pub fn with_categories(exam_code: &str, names: &[&str]) -> Self {
        let mut categories = HashMap::new();
        categories.insert(
            exam_code.to_string(),
            names.iter().map(|n| n.to_string()).collect(),
        );
        Self { categories }
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn list_categories(&self, exam_code: &str) -> AppResult<Vec<String>> {
        let mut names = self.categories.get(exam_code).cloned().unwrap_or_default();
        names.sort();
        Ok(names)
    }
}

#[derive(Default)]
pub struct InMemoryExamRepository {
    exams: Vec<Exam>,
}

impl InMemoryExamRepository {
    pub fn with_exams(exams: Vec<Exam>) -> Self {
        Self { exams }
    }
}

#[async_trait]
impl ExamRepository for InMemoryExamRepository {
    async fn find_by_code(&self, exam_code: &str) -> AppResult<Option<Exam>> {
        Ok(self.exams.iter().find(|e| e.exam_code == exam_code).cloned())
    }
}

/// App state over in-memory repositories seeded with `questions`, the
/// SAA-C03 exam and two of its categories.
pub fn test_state(questions: Arc<InMemoryQuestionRepository>) -> AppState {
    AppState::from_parts(
        questions,
        Arc::new(InMemoryCategoryRepository::with_categories(
            "SAA-C03",
            &["Storage", "Compute"],
        )),
        Arc::new(InMemoryExamRepository::with_exams(vec![fixtures::sample_exam()])),
        Config::test_config(),
    )
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn sample_question_is_well_formed() {
        let question = sample_question("q-1", "Storage");
        assert_eq!(question.correct_count(), 1);
        assert_eq!(question.answers.len(), 4);
        assert!(question.explanation.starts_with("<p>"));
    }

    #[actix_rt::test]
    async fn inserted_ids_do_not_collide_with_seeded_ones() {
        let repo =
            InMemoryQuestionRepository::with_questions(vec![sample_question("gen-1", "Storage")]);
        let draft = sample_question("ignored", "Storage");
        let inserted = repo
            .insert_question(NewQuestion {
                question: draft.question,
                answers: draft.answers,
                explanation: draft.explanation,
                level: draft.level,
                category: draft.category,
                exam_code: draft.exam_code,
                inactive: false,
                created_at: Utc::now(),
            })
            .await
            .expect("insert");

        assert_ne!(inserted.id, "gen-1");
        assert_eq!(repo.count().await, 2);
    }

    #[actix_rt::test]
    async fn in_memory_repository_reports_missing_updates() {
        let repo = InMemoryQuestionRepository::default();
        let q = sample_question("q-1", "Storage");
        let update = QuestionUpdate {
            id: q.id,
            question: q.question,
            answers: q.answers,
            explanation: q.explanation,
            category: q.category,
            level: q.level,
            exam_code: q.exam_code,
            inactive: false,
        };

        assert!(matches!(
            repo.update_question(update).await,
            Err(AppError::NotFound(_))
        ));
    }
}
