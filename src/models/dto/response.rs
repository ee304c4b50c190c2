use serde::Serialize;

use crate::models::domain::{CreationReport, Question, RevisionReport};
use crate::services::notifier::Notification;

#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub prompt: String,
    /// False when `prompt` is a placeholder.
    pub ready: bool,
}

#[derive(Debug, Serialize)]
pub struct RevisionPromptResponse {
    pub prompt: String,
    pub ready: bool,
    /// Snapshot the client sends back when validating and saving.
    pub selection: Vec<Question>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub exam_code: String,
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionListResponse {
    pub exam_code: String,
    pub total: usize,
    pub questions: Vec<Question>,
}

#[derive(Debug, Serialize)]
pub struct DeleteQuestionResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SaveGeneratedResponse {
    pub report: CreationReport,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Serialize)]
pub struct SaveRevisionsResponse {
    pub report: RevisionReport,
    pub notifications: Vec<Notification>,
}
