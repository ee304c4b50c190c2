use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::models::domain::{
    Answer, ParsedRevision, Question, RevisedQuestion, RevisionDiff, RevisionReport, SaveState,
    Validation,
};
use crate::services::question_rules::{
    check_answer_text, check_explanation, missing_keys, non_empty_str, parse_level, parse_payload,
};

/// Gives every item without an `id` the id of the selected question at the
/// same position. LLMs regularly drop ids even though the order is kept.
pub fn assign_positional_ids(items: &mut [Value], selection: &[Question]) {
    for (item, original) in items.iter_mut().zip(selection) {
        let Some(object) = item.as_object_mut() else {
            continue;
        };
        if item_id(object).is_none() {
            object.insert("id".to_string(), Value::String(original.id.clone()));
        }
    }
}

/// Parses pasted LLM output for a review round against the selection snapshot.
///
/// Immutable fields absent from an item are copied from its original; present
/// but different values are errors. A count mismatch between the returned
/// items and the selection appends one extra failing entry after the per-item
/// results.
pub fn parse_revision_response(raw: &str, selection: &[Question]) -> RevisionReport {
    let payload = match parse_payload(raw) {
        Ok(payload) => payload,
        Err(err) => {
            log::debug!("Revision payload rejected: {}", err.message);
            return RevisionReport {
                sanitized: err.sanitized,
                revisions: vec![failed_entry(0, err.message)],
            };
        }
    };

    let mut items = payload.items;
    assign_positional_ids(&mut items, selection);

    let returned = items.len();
    let mut seen = HashSet::new();
    let mut revisions: Vec<ParsedRevision> = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let revision = review_item(index, item, selection);
            match &revision.id {
                Some(id) if !seen.insert(id.clone()) => {
                    let message = format!("duplicate id ({})", id);
                    reject(revision, message)
                }
                _ => revision,
            }
        })
        .collect();

    if returned != selection.len() {
        revisions.push(failed_entry(
            returned,
            format!(
                "Returned {} questions but expected {}",
                returned,
                selection.len()
            ),
        ));
    }

    let report = RevisionReport {
        sanitized: payload.sanitized,
        revisions,
    };
    log::debug!(
        "Validated {} revision(s) against {} selected, {} valid",
        returned,
        selection.len(),
        report.valid_count()
    );
    report
}

fn failed_entry(index: usize, message: String) -> ParsedRevision {
    ParsedRevision {
        index,
        id: None,
        updated: None,
        original: None,
        outcome: Validation::Invalid {
            errors: vec![message],
        },
        diff: RevisionDiff::default(),
        save_state: SaveState::Pending,
    }
}

/// A later item claiming an id already reviewed never updates that record.
fn reject(revision: ParsedRevision, message: String) -> ParsedRevision {
    let mut errors = revision.outcome.errors().to_vec();
    errors.push(message);
    ParsedRevision {
        outcome: Validation::Invalid { errors },
        ..revision
    }
}

/// Ids arrive as strings or, from some tables, as numbers.
fn item_id(object: &Map<String, Value>) -> Option<String> {
    match object.get("id") {
        Some(Value::String(id)) if !id.trim().is_empty() => Some(id.trim().to_string()),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    }
}

fn review_item(index: usize, item: Value, selection: &[Question]) -> ParsedRevision {
    let Value::Object(mut object) = item else {
        return failed_entry(index, "item must be a JSON object".to_string());
    };

    let mut errors = Vec::new();
    let id = item_id(&object);
    let original = match &id {
        None => {
            errors.push("missing id".to_string());
            None
        }
        Some(id) => {
            let found = selection.iter().find(|q| &q.id == id).cloned();
            if found.is_none() {
                errors.push(format!("id not in selection ({})", id));
            }
            found
        }
    };

    if let Some(original) = &original {
        reattach_immutable_fields(&mut object, original, &mut errors);
    }

    errors.extend(
        missing_keys(&object)
            .into_iter()
            .map(|key| format!("missing key: {}", key)),
    );

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
        .and_then(|value| check_answers(value, original.as_ref(), &mut errors));

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

    let diff = original
        .as_ref()
        .map(|original| compute_diff(&object, original))
        .unwrap_or_default();

    let revised = match (&id, &original, question, answers, explanation, level) {
        (Some(id), Some(original), Some(question), Some(answers), Some(explanation), Some(level)) => {
            Some(RevisedQuestion {
                id: id.clone(),
                question,
                answers,
                explanation,
                level,
                category: original.category.clone(),
                exam_code: original.exam_code.clone(),
            })
        }
        _ => None,
    };

    ParsedRevision {
        index,
        id,
        updated: Some(Value::Object(object)),
        original,
        outcome: Validation::from_checks(errors, revised),
        diff,
        save_state: SaveState::Pending,
    }
}

/// category, exam_code and level never change during a review.
fn reattach_immutable_fields(
    object: &mut Map<String, Value>,
    original: &Question,
    errors: &mut Vec<String>,
) {
    let fixed = [
        ("category", original.category.as_str()),
        ("exam_code", original.exam_code.as_str()),
        ("level", original.level.as_str()),
    ];

    for (field, expected) in fixed {
        match object.get(field) {
            None | Some(Value::Null) => {
                object.insert(field.to_string(), Value::String(expected.to_string()));
            }
            Some(Value::String(value)) if value == expected => {}
            Some(_) => errors.push(format!("{} changed", field)),
        }
    }
}

fn check_answers(
    value: &Value,
    original: Option<&Question>,
    errors: &mut Vec<String>,
) -> Option<Vec<Answer>> {
    let Some(entries) = value.as_array() else {
        errors.push("answers must be an array".to_string());
        return None;
    };

    let errors_before = errors.len();
    if let Some(original) = original {
        if entries.len() != original.answers.len() {
            errors.push(format!(
                "answers count changed (found {}, expected {})",
                entries.len(),
                original.answers.len()
            ));
        }
    }

    let mut answers = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let Some(answer) = entry.as_object() else {
            errors.push(format!("answers[{}] must be an object", i));
            continue;
        };

        let text = check_answer_text(i, answer.get("text"), errors);
        let is_correct = answer.get("isCorrect").and_then(Value::as_bool);
        match is_correct {
            None => errors.push(format!("answers[{}].isCorrect must be a boolean", i)),
            Some(flag) => {
                let expected = original.and_then(|o| o.answers.get(i)).map(|a| a.is_correct);
                if expected.is_some_and(|expected| expected != flag) {
                    errors.push(format!("answers[{}].isCorrect changed", i));
                }
            }
        }

        if let (Some(text), Some(is_correct)) = (text, is_correct) {
            answers.push(Answer { text, is_correct });
        }
    }

    (errors.len() == errors_before).then_some(answers)
}

fn text_of(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).map(str::trim)
}

fn compute_diff(object: &Map<String, Value>, original: &Question) -> RevisionDiff {
    let answer_text_changed = object
        .get("answers")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    let new_text = text_of(entry.get("text"));
                    let old_text = original.answers.get(i).map(|a| a.text.trim());
                    new_text != old_text
                })
                .collect()
        })
        .unwrap_or_default();

    RevisionDiff {
        question_changed: text_of(object.get("question")) != Some(original.question.trim()),
        explanation_changed: text_of(object.get("explanation"))
            != Some(original.explanation.trim()),
        answer_text_changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::Level;
    use crate::test_utils::fixtures::sample_question;
    use serde_json::json;

    /// Review output for `original` as an LLM would send it: no id, category or exam_code.
    fn echo(original: &Question) -> Value {
        json!({
            "question": original.question,
            "answers": original.answers,
            "explanation": original.explanation,
            "level": original.level
        })
    }

    fn wrap(items: Vec<Value>) -> String {
        json!({ "questions": items }).to_string()
    }

    #[test]
    fn unchanged_echo_is_valid_with_no_diff() {
        let original = sample_question("q-1", "Storage");
        let report = parse_revision_response(&wrap(vec![echo(&original)]), &[original.clone()]);

        assert_eq!(report.revisions.len(), 1);
        let revision = &report.revisions[0];
        assert!(revision.is_valid(), "{:?}", revision.outcome.errors());
        assert_eq!(revision.id.as_deref(), Some("q-1"));
        assert!(!revision.diff.has_changes());

        let revised = revision.outcome.payload().expect("payload");
        assert_eq!(revised.category, "Storage");
        assert_eq!(revised.exam_code, original.exam_code);
    }

    #[test]
    fn flipped_correctness_is_flagged_per_index() {
        let original = sample_question("q-1", "Storage");
        let mut item = echo(&original);
        item["answers"][0]["isCorrect"] = json!(false);
        item["answers"][1]["isCorrect"] = json!(true);

        let report = parse_revision_response(&wrap(vec![item]), &[original]);
        let errors = report.revisions[0].outcome.errors();

        assert!(!report.revisions[0].is_valid());
        assert!(errors.contains(&"answers[0].isCorrect changed".to_string()));
        assert!(errors.contains(&"answers[1].isCorrect changed".to_string()));
    }

    #[test]
    fn count_mismatch_appends_synthetic_entry() {
        let selection = vec![
            sample_question("q-1", "Storage"),
            sample_question("q-2", "Compute"),
            sample_question("q-3", "Networking"),
        ];
        let raw = wrap(vec![echo(&selection[0]), echo(&selection[1])]);

        let report = parse_revision_response(&raw, &selection);

        assert_eq!(report.revisions.len(), 3);
        assert!(report.revisions[0].is_valid());
        assert!(report.revisions[1].is_valid());
        assert_eq!(
            report.revisions[2].outcome.errors(),
            ["Returned 2 questions but expected 3".to_string()]
        );
    }

    #[test]
    fn omitted_category_is_reattached() {
        let original = sample_question("q-1", "Storage");
        let report = parse_revision_response(&wrap(vec![echo(&original)]), &[original]);
        let updated = report.revisions[0].updated.as_ref().expect("updated");

        assert_eq!(updated["category"], json!("Storage"));
        assert!(report.revisions[0].is_valid());
    }

    #[test]
    fn changed_category_is_flagged() {
        let original = sample_question("q-1", "Storage");
        let mut item = echo(&original);
        item["category"] = json!("Databases");

        let report = parse_revision_response(&wrap(vec![item]), &[original]);
        assert!(report.revisions[0]
            .outcome
            .errors()
            .contains(&"category changed".to_string()));
    }

    #[test]
    fn changed_level_and_exam_code_are_flagged() {
        let original = sample_question("q-1", "Storage");
        let mut item = echo(&original);
        item["level"] = json!("Advanced");
        item["exam_code"] = json!("DVA-C02");

        let report = parse_revision_response(&wrap(vec![item]), &[original]);
        let errors = report.revisions[0].outcome.errors();
        assert!(errors.contains(&"level changed".to_string()));
        assert!(errors.contains(&"exam_code changed".to_string()));
    }

    #[test]
    fn unknown_id_is_rejected() {
        let original = sample_question("q-1", "Storage");
        let mut item = echo(&original);
        item["id"] = json!("q-404");

        let report = parse_revision_response(&wrap(vec![item]), &[original]);
        assert!(report.revisions[0].original.is_none());
        assert!(report.revisions[0]
            .outcome
            .errors()
            .iter()
            .any(|e| e.starts_with("id not in selection")));
    }

    #[test]
    fn explicit_ids_win_over_position() {
        let first = sample_question("q-1", "Storage");
        let second = sample_question("q-2", "Compute");
        let mut a = echo(&second);
        a["id"] = json!("q-2");
        let mut b = echo(&first);
        b["id"] = json!("q-1");

        let report = parse_revision_response(&wrap(vec![a, b]), &[first, second]);
        assert_eq!(report.revisions[0].id.as_deref(), Some("q-2"));
        assert_eq!(report.revisions[1].id.as_deref(), Some("q-1"));
        assert!(report.revisions.iter().all(ParsedRevision::is_valid));
    }

    #[test]
    fn second_item_for_same_id_is_rejected() {
        let selection = vec![
            sample_question("q-1", "Storage"),
            sample_question("q-2", "Storage"),
        ];
        let mut first = echo(&selection[1]);
        first["id"] = json!("q-2");
        let second = echo(&selection[1]);

        let report = parse_revision_response(&wrap(vec![first, second]), &selection);

        assert!(report.revisions[0].is_valid());
        assert_eq!(report.revisions[1].id.as_deref(), Some("q-2"));
        assert!(!report.revisions[1].is_valid());
        assert!(report.revisions[1]
            .outcome
            .errors()
            .contains(&"duplicate id (q-2)".to_string()));
    }

    #[test]
    fn positional_ids_fill_only_missing_ids() {
        let selection = vec![sample_question("q-1", "A"), sample_question("q-2", "B")];
        let mut items = vec![json!({ "question": "x" }), json!({ "id": "q-9", "question": "y" })];

        assign_positional_ids(&mut items, &selection);

        assert_eq!(items[0]["id"], json!("q-1"));
        assert_eq!(items[1]["id"], json!("q-9"));
    }

    #[test]
    fn answer_count_change_is_rejected() {
        let original = sample_question("q-1", "Storage");
        let mut item = echo(&original);
        item["answers"]
            .as_array_mut()
            .expect("answers array")
            .push(json!({ "text": "Extra option", "isCorrect": false }));

        let report = parse_revision_response(&wrap(vec![item]), &[original]);
        assert!(report.revisions[0]
            .outcome
            .errors()
            .contains(&"answers count changed (found 5, expected 4)".to_string()));
    }

    #[test]
    fn diff_flags_track_text_edits() {
        let original = sample_question("q-1", "Storage");
        let mut item = echo(&original);
        item["question"] = json!("Which S3 storage class is cheapest for archives?");
        item["answers"][2]["text"] = json!("S3 One Zone-Infrequent Access");

        let report = parse_revision_response(&wrap(vec![item]), &[original]);
        let revision = &report.revisions[0];

        assert!(revision.is_valid());
        assert!(revision.diff.question_changed);
        assert!(!revision.diff.explanation_changed);
        assert_eq!(revision.diff.answer_text_changed, vec![false, false, true, false]);
    }

    #[test]
    fn explanation_without_html_is_rejected() {
        let original = sample_question("q-1", "Storage");
        let mut item = echo(&original);
        item["explanation"] = json!("Because it is cheapest.");

        let report = parse_revision_response(&wrap(vec![item]), &[original]);
        assert!(!report.revisions[0].is_valid());
        assert!(report.revisions[0].diff.explanation_changed);
    }

    #[test]
    fn marker_in_revised_answer_is_rejected() {
        let original = sample_question("q-1", "Storage");
        let mut item = echo(&original);
        item["answers"][0]["text"] = json!("✔ S3 Glacier Deep Archive");

        let report = parse_revision_response(&wrap(vec![item]), &[original]);
        assert!(!report.revisions[0].is_valid());
    }

    #[test]
    fn unparseable_input_yields_single_error_entry() {
        let original = sample_question("q-1", "Storage");
        let report = parse_revision_response("not json at all", &[original]);

        assert_eq!(report.revisions.len(), 1);
        assert!(report.revisions[0].original.is_none());
        assert_eq!(report.revisions[0].outcome.errors().len(), 1);
    }

    #[test]
    fn numeric_ids_are_matched_as_strings() {
        let original = sample_question("42", "Storage");
        let mut item = echo(&original);
        item["id"] = json!(42);

        let report = parse_revision_response(&wrap(vec![item]), &[original]);
        assert!(report.revisions[0].is_valid());
        assert_eq!(
            report.revisions[0].outcome.payload().map(|r| r.level),
            Some(Level::Intermediate)
        );
    }
}
