use serde::Serialize;

use crate::constants::prompts::{
    NO_SELECTION_PLACEHOLDER, REVISION_OUTPUT_FORMAT, REVISION_ROLE, REVISION_RULES,
};
use crate::models::domain::{Answer, Level, Question};

/// The part of a question the reviewer sees. id, category and exam_code stay
/// on our side and are re-attached when the answer comes back.
#[derive(Debug, Serialize)]
struct ReviewItem<'a> {
    question: &'a str,
    answers: &'a [Answer],
    explanation: &'a str,
    level: Level,
}

impl<'a> From<&'a Question> for ReviewItem<'a> {
    fn from(question: &'a Question) -> Self {
        ReviewItem {
            question: &question.question,
            answers: &question.answers,
            explanation: &question.explanation,
            level: question.level,
        }
    }
}

#[derive(Debug, Serialize)]
struct ReviewPayload<'a> {
    questions: Vec<ReviewItem<'a>>,
}

/// Renders the review prompt for a selection of existing questions.
pub fn build_revision_prompt(selection: &[Question], context: &str) -> String {
    if selection.is_empty() {
        return NO_SELECTION_PLACEHOLDER.to_string();
    }

    let payload = ReviewPayload {
        questions: selection.iter().map(ReviewItem::from).collect(),
    };
    let payload = serde_json::to_string_pretty(&payload)
        .unwrap_or_else(|_| "{\"questions\": []}".to_string());

    let count = selection.len();
    let context = context.trim();

    let mut sections = vec![REVISION_ROLE.to_string(), REVISION_RULES.to_string()];
    sections.push(format!(
        "## CARDINALITY\n\nYou will receive {} question(s). Return exactly {} question(s), in the same order as the input.",
        count, count
    ));
    if !context.is_empty() {
        sections.push(format!("## CONTEXT\n\n{}", context));
    }
    sections.push(REVISION_OUTPUT_FORMAT.to_string());
    sections.push(format!("## QUESTIONS TO REVIEW\n\n{}", payload));

    sections.join("\n\n")
}
