use crate::constants::prompts::{
    ANSWER_MARKER_RULE, CREATION_OUTPUT_FORMAT, CREATION_ROLE, EXPLANATION_RULE,
    NO_EXAM_PLACEHOLDER, SIMILAR_QUESTIONS_NOTICE,
};
use crate::models::domain::prompt_parameters::{
    Difficulty, LengthPreference, ScenarioScope, SimilarityBand,
};
use crate::models::domain::{Exam, PromptParameters};

/// Renders the generation prompt for a batch of new questions.
///
/// Pure: the same parameters and exam always produce the same text. Returns a
/// placeholder when no exam is selected. Parameters are clamped before
/// rendering, so out-of-range values never reach the prompt.
pub fn build_creation_prompt(params: &PromptParameters, exam: Option<&Exam>) -> String {
    let Some(exam) = exam else {
        return NO_EXAM_PLACEHOLDER.to_string();
    };
    let params = params.clone().normalized();

    let sections = [
        CREATION_ROLE.to_string(),
        task_section(&params, exam),
        answers_section(&params),
        distractor_section(params.similarity_band(), params.similarity),
        scenario_section(&params),
        format!("## EXPLANATIONS\n\n{}", EXPLANATION_RULE),
        context_section(&params),
        CREATION_OUTPUT_FORMAT.to_string(),
    ];

    sections
        .into_iter()
        .filter(|section| !section.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn task_section(params: &PromptParameters, exam: &Exam) -> String {
    let mut lines = vec![
        "## TASK".to_string(),
        String::new(),
        format!(
            "Write exactly {} new multiple-choice questions for the {} certification exam.",
            params.question_count,
            exam.display_name()
        ),
    ];

    if let Some(category) = params.category.as_deref().filter(|c| !c.trim().is_empty()) {
        lines.push(format!(
            "All questions must belong to the exam domain \"{}\".",
            category.trim()
        ));
    }

    lines.push(difficulty_line(params.difficulty));
    lines.push(length_line(params.length_preference).to_string());
    lines.join("\n")
}

fn difficulty_line(difficulty: Difficulty) -> String {
    match difficulty.level() {
        Some(level) => format!(
            "Every question must be at the {} level; set \"level\" to \"{}\".",
            level, level
        ),
        None => "Mix difficulty across the set and label each question's \"level\" as Beginner, \
Intermediate or Advanced."
            .to_string(),
    }
}

fn length_line(preference: LengthPreference) -> &'static str {
    match preference {
        LengthPreference::Short => {
            "Keep question stems short and direct: one or two sentences, no long scenarios."
        }
        LengthPreference::Long => {
            "Use longer, scenario-based question stems that describe requirements and constraints in detail."
        }
        LengthPreference::Mixed => {
            "Vary question length: combine short direct questions with longer scenario-based ones."
        }
    }
}

fn answers_section(params: &PromptParameters) -> String {
    let range = if params.min_answers == params.max_answers {
        format!("Each question must have exactly {} answer options.", params.min_answers)
    } else {
        format!(
            "Each question must have between {} and {} answer options.",
            params.min_answers, params.max_answers
        )
    };

    [
        "## ANSWERS".to_string(),
        String::new(),
        range,
        format!(
            "Exactly {} answer(s) per question must have \"isCorrect\": true. All other answers must have \"isCorrect\": false.",
            params.correct_answers
        ),
        "Never mark zero answers as correct and never mark every answer as correct: at least one answer must be an incorrect distractor.".to_string(),
        ANSWER_MARKER_RULE.to_string(),
    ]
    .join("\n")
}

fn distractor_section(band: SimilarityBand, similarity: u8) -> String {
    let guidance = match band {
        SimilarityBand::Low => {
            "Distractors may be clearly distinguishable from the correct answer; a candidate with basic knowledge should rule them out."
        }
        SimilarityBand::Medium => {
            "Distractors should be plausible and drawn from the same topic, but distinguishable with solid knowledge."
        }
        SimilarityBand::High => {
            "Distractors should be very close to the correct answer, differing in one important detail such as a limit, a feature or a configuration."
        }
        SimilarityBand::VeryHigh => {
            "Distractors must be nearly indistinguishable from the correct answer; only precise, expert-level knowledge of the subtle difference should reveal it."
        }
    };

    format!(
        "## DISTRACTORS\n\nAnswer similarity: {} ({}/100). {}",
        band.label(),
        similarity,
        guidance
    )
}

fn scenario_section(params: &PromptParameters) -> String {
    let scenarios = params.selected_scenarios();
    if scenarios.is_empty() {
        return String::new();
    }

    let directive = match params.scenario_scope {
        ScenarioScope::All => "Frame ALL questions using the following scenario templates:",
        ScenarioScope::Some => {
            "Frame a mixed subset of the questions (not all of them) using the following scenario templates; write the rest as direct questions:"
        }
    };

    let mut lines = vec!["## SCENARIOS".to_string(), String::new(), directive.to_string()];
    lines.extend(scenarios.into_iter().map(|s| format!("- \"{}\"", s)));
    lines.join("\n")
}

/// Context first; similar questions are appended after it, never instead of it.
fn context_section(params: &PromptParameters) -> String {
    let context = params.context.trim();
    let mut section = String::from("## CONTEXT\n\n");
    if context.is_empty() {
        section.push_str("No additional context was provided. Rely on the official exam guide.");
    } else {
        section.push_str(context);
    }

    if let Some(similar) = params.active_similar_questions() {
        section.push_str("\n\n## SIMILAR QUESTIONS (INSPIRATION ONLY)\n\n");
        section.push_str(SIMILAR_QUESTIONS_NOTICE);
        section.push_str("\n\n<<<BEGIN SIMILAR QUESTIONS>>>\n");
        section.push_str(similar);
        section.push_str("\n<<<END SIMILAR QUESTIONS>>>");
    }

    section
}
