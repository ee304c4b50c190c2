use serde_json::Value;

use crate::models::domain::{Answer, CreationReport, ParsedCandidate, QuestionDraft, SaveState, Validation};
use crate::services::question_rules::{
    check_answer_text, check_explanation, missing_keys, non_empty_str, parse_level, parse_payload,
};

/// Minimum answers any generated question must carry.
const MIN_GENERATED_ANSWERS: usize = 2;

/// Parses pasted LLM output for new questions and checks every item.
///
/// Never fails: a payload that does not parse yields a single invalid entry
/// holding the parser's message. Items are checked independently, so one bad
/// item does not hide the state of its siblings.
pub fn parse_creation_response(raw: &str, correct_answers: u32) -> CreationReport {
    // every question has at least one correct answer
    let correct_answers = correct_answers.max(1) as usize;

    let payload = match parse_payload(raw) {
        Ok(payload) => payload,
        Err(err) => {
            log::debug!("Creation payload rejected: {}", err.message);
            return CreationReport {
                sanitized: err.sanitized,
                candidates: vec![ParsedCandidate {
                    index: 0,
                    raw: Value::Null,
                    outcome: Validation::Invalid {
                        errors: vec![err.message],
                    },
                    save_state: SaveState::Pending,
                }],
            };
        }
    };

    let candidates: Vec<ParsedCandidate> = payload
        .items
        .into_iter()
        .enumerate()
        .map(|(index, raw)| ParsedCandidate {
            index,
            outcome: validate_item(&raw, correct_answers),
            raw,
            save_state: SaveState::Pending,
        })
        .collect();

    let report = CreationReport {
        sanitized: payload.sanitized,
        candidates,
    };
    log::debug!(
        "Validated {} generated question(s), {} valid",
        report.candidates.len(),
        report.valid_count()
    );
    report
}

fn validate_item(raw: &Value, correct_answers: usize) -> Validation<QuestionDraft> {
    let Some(object) = raw.as_object() else {
        return Validation::Invalid {
            errors: vec!["item must be a JSON object".to_string()],
        };
    };

    let mut errors: Vec<String> = missing_keys(object)
        .into_iter()
        .map(|key| format!("missing key: {}", key))
        .collect();

    let question = match non_empty_str(object.get("question")) {
        Some(text) => Some(text.to_string()),
        None => {
            if object.contains_key("question") {
                errors.push("question must be a non-empty string".to_string());
            }
            None
        }
    };

    let answers = object
        .get("answers")
        .and_then(|value| check_answers(value, correct_answers, &mut errors));

    let explanation = if object.contains_key("explanation") {
        check_explanation(object.get("explanation"), &mut errors)
    } else {
        None
    };

    let level = match parse_level(object.get("level")) {
        Ok(level) => Some(level),
        Err(err) => {
            if object.contains_key("level") {
                errors.push(err);
            }
            None
        }
    };

    let draft = match (question, answers, explanation, level) {
        (Some(question), Some(answers), Some(explanation), Some(level)) => Some(QuestionDraft {
            question,
            answers,
            explanation,
            level,
        }),
        _ => None,
    };

    Validation::from_checks(errors, draft)
}

fn check_answers(
    value: &Value,
    correct_answers: usize,
    errors: &mut Vec<String>,
) -> Option<Vec<Answer>> {
    let Some(entries) = value.as_array() else {
        errors.push("answers must be an array".to_string());
        return None;
    };
    if entries.len() < MIN_GENERATED_ANSWERS {
        errors.push(format!(
            "answers needs at least {} entries (found {})",
            MIN_GENERATED_ANSWERS,
            entries.len()
        ));
        return None;
    }

    let errors_before = errors.len();
    let mut answers = Vec::with_capacity(entries.len());
    let mut found_correct = 0;

    for (i, entry) in entries.iter().enumerate() {
        let Some(answer) = entry.as_object() else {
            errors.push(format!("answers[{}] must be an object", i));
            continue;
        };

        let text = check_answer_text(i, answer.get("text"), errors);
        let is_correct = match answer.get("isCorrect").and_then(Value::as_bool) {
            Some(flag) => Some(flag),
            None => {
                errors.push(format!("answers[{}].isCorrect must be a boolean", i));
                None
            }
        };

        if is_correct == Some(true) {
            found_correct += 1;
        }
        if let (Some(text), Some(is_correct)) = (text, is_correct) {
            answers.push(Answer { text, is_correct });
        }
    }

    if found_correct != correct_answers {
        errors.push(format!(
            "needs exactly {} correct answers (found {})",
            correct_answers, found_correct
        ));
    }
    if found_correct >= entries.len() {
        errors.push(format!(
            "at least one answer must be incorrect ({} of {} marked correct)",
            found_correct,
            entries.len()
        ));
    }

    (errors.len() == errors_before).then_some(answers)
}
