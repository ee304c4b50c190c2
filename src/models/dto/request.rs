use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::models::domain::{PromptParameters, Question};

const MAX_CONTEXT_CHARS: usize = 20_000;
const MAX_SIMILAR_QUESTIONS_CHARS: usize = 50_000;

fn validate_parameters(params: &PromptParameters) -> Result<(), ValidationError> {
    if params.context.chars().count() > MAX_CONTEXT_CHARS {
        return Err(ValidationError::new("context_too_long"));
    }
    let similar_len = params
        .similar_questions_text
        .as_deref()
        .map_or(0, |text| text.chars().count());
    if similar_len > MAX_SIMILAR_QUESTIONS_CHARS {
        return Err(ValidationError::new("similar_questions_too_long"));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreationPromptRequest {
    #[validate(custom(function = "validate_parameters"))]
    pub parameters: PromptParameters,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RevisionPromptRequest {
    #[validate(length(max = 100, message = "At most 100 questions can be reviewed at once"))]
    pub question_ids: Vec<String>,

    #[serde(default)]
    #[validate(length(max = 20000))]
    pub context: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ValidateCreationRequest {
    #[validate(length(min = 1, message = "Paste the LLM response first"))]
    pub raw_json: String,

    #[validate(range(min = 1, max = 11))]
    pub correct_answers: u32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ValidateRevisionRequest {
    #[validate(length(min = 1, message = "Paste the LLM response first"))]
    pub raw_json: String,

    /// The questions the review prompt was built from, in prompt order.
    #[validate(length(min = 1, max = 100))]
    pub selection: Vec<Question>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveGeneratedRequest {
    #[validate(length(min = 1, max = 32))]
    pub exam_code: String,

    #[validate(length(min = 1, max = 200, message = "Select a category before saving"))]
    pub category: String,

    #[validate(length(min = 1))]
    pub raw_json: String,

    #[validate(range(min = 1, max = 11))]
    pub correct_answers: u32,

    /// Candidate indices to save; all valid candidates when absent.
    #[serde(default)]
    pub indices: Option<Vec<usize>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveRevisionsRequest {
    #[validate(length(min = 1, max = 200, message = "Select a category before saving"))]
    pub category: String,

    #[validate(length(min = 1))]
    pub raw_json: String,

    #[validate(length(min = 1, max = 100))]
    pub selection: Vec<Question>,

    #[serde(default)]
    pub indices: Option<Vec<usize>>,

    /// Revisions the operator discarded; never saved.
    #[serde(default)]
    pub discarded: Vec<usize>,
}
