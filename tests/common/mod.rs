#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use question_forge::{
    errors::{AppError, AppResult},
    models::domain::{Answer, Exam, Level, NewQuestion, Question, QuestionUpdate},
    repositories::{CategoryRepository, ExamRepository, QuestionRepository},
};

/// Integration-test copy of the crate's unit-test question store, which is
/// only compiled for unit tests. Keep the two behaving alike.
pub struct InMemoryQuestionRepository {
    questions: Arc<RwLock<HashMap<String, Question>>>,
    next_id: Arc<RwLock<u64>>,
    rejected_texts: Vec<String>,
}

impl InMemoryQuestionRepository {
    pub fn new() -> Self {
        Self {
            questions: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(RwLock::new(1)),
            rejected_texts: Vec::new(),
        }
    }

    /// Inserts whose question text is in `texts` fail with a database error.
    pub fn rejecting(texts: &[&str]) -> Self {
        Self {
            rejected_texts: texts.iter().map(|t| t.to_string()).collect(),
            ..Self::new()
        }
    }

    pub async fn seed(&self, question: Question) {
        self.questions
            .write()
            .await
            .insert(question.id.clone(), question);
    }

    pub async fn get(&self, id: &str) -> Option<Question> {
        self.questions.read().await.get(id).cloned()
    }

    pub async fn count(&self) -> usize {
        self.questions.read().await.len()
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
        if self.rejected_texts.contains(&question.question) {
            return Err(AppError::DatabaseError(format!(
                "insert rejected for '{}'",
                question.question
            )));
        }

        let mut next_id = self.next_id.write().await;
        let question = question.into_question(format!("gen-{}", *next_id));
        *next_id += 1;

        self.questions
            .write()
            .await
            .insert(question.id.clone(), question.clone());
        Ok(question)
    }

    async fn update_question(&self, update: QuestionUpdate) -> AppResult<Question> {
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

pub struct InMemoryCategoryRepository {
    categories: HashMap<String, Vec<String>>,
}

impl InMemoryCategoryRepository {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        let mut categories: HashMap<String, Vec<String>> = HashMap::new();
        for (exam_code, name) in entries {
            categories
                .entry(exam_code.to_string())
                .or_default()
                .push(name.to_string());
        }
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

pub struct InMemoryExamRepository {
    exams: Vec<Exam>,
}

impl InMemoryExamRepository {
    pub fn new(exams: Vec<Exam>) -> Self {
        Self { exams }
    }
}

#[async_trait]
impl ExamRepository for InMemoryExamRepository {
    async fn find_by_code(&self, exam_code: &str) -> AppResult<Option<Exam>> {
        Ok(self.exams.iter().find(|e| e.exam_code == exam_code).cloned())
    }
}

pub fn make_exam(exam_code: &str, is_active: bool) -> Exam {
    Exam::new(exam_code, "Solutions Architect Associate", is_active)
}

pub fn make_question(id: &str, category: &str) -> Question {
    Question {
        id: id.to_string(),
        question: format!("Which service fits requirement {}?", id),
        answers: vec![
            Answer::new("Amazon DynamoDB", true),
            Answer::new("Amazon RDS", false),
            Answer::new("Amazon Redshift", false),
            Answer::new("Amazon Neptune", false),
        ],
        explanation: "<p>DynamoDB offers single-digit millisecond latency at any scale.</p>"
            .to_string(),
        level: Level::Advanced,
        category: category.to_string(),
        exam_code: "SAA-C03".to_string(),
        inactive: false,
        created_at: Some(Utc::now()),
        updated_at: None,
    }
}

/// One LLM creation item with the given correctness flags.
pub fn creation_item(question: &str, correct_flags: &[bool]) -> serde_json::Value {
    let answers: Vec<serde_json::Value> = correct_flags
        .iter()
        .enumerate()
        .map(|(i, flag)| serde_json::json!({ "text": format!("Option {}", i + 1), "isCorrect": flag }))
        .collect();
    serde_json::json!({
        "question": question,
        "answers": answers,
        "explanation": "<p>Option 1 is the documented behaviour.</p>",
        "level": "Intermediate"
    })
}

/// Review output echoing `original` without id, category or exam_code.
pub fn revision_item(original: &Question) -> serde_json::Value {
    serde_json::json!({
        "question": original.question,
        "answers": original.answers,
        "explanation": original.explanation,
        "level": original.level
    })
}
