use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::domain::question::{Answer, Level, Question};

/// Result of checking one LLM-produced item.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Validation<T> {
    Valid { payload: T },
    Invalid { errors: Vec<String> },
}

impl<T> Validation<T> {
    /// `Valid` when `errors` is empty and a payload could be built.
    pub fn from_checks(errors: Vec<String>, payload: Option<T>) -> Self {
        match payload {
            Some(payload) if errors.is_empty() => Validation::Valid { payload },
            _ => Validation::Invalid { errors },
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid { .. })
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            Validation::Valid { payload } => Some(payload),
            Validation::Invalid { .. } => None,
        }
    }

    pub fn errors(&self) -> &[String] {
        match self {
            Validation::Valid { .. } => &[],
            Validation::Invalid { errors } => errors,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SaveState {
    #[default]
    Pending,
    Saved,
    Failed {
        message: String,
    },
    Discarded,
}

impl SaveState {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveState::Saved)
    }

    pub fn is_discarded(&self) -> bool {
        matches!(self, SaveState::Discarded)
    }

    pub fn save_error(&self) -> Option<&str> {
        match self {
            SaveState::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Saved and discarded items never go back to the gateway.
    pub fn is_terminal(&self) -> bool {
        self.is_saved() || self.is_discarded()
    }
}

/// What a single gateway call produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(Question),
    Failed(String),
    Discarded,
}

/// A new question accepted by the creation validator.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionDraft {
    pub question: String,
    pub answers: Vec<Answer>,
    pub explanation: String,
    pub level: Level,
}

/// A revision accepted by the revision validator, immutable fields re-attached.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RevisedQuestion {
    pub id: String,
    pub question: String,
    pub answers: Vec<Answer>,
    pub explanation: String,
    pub level: Level,
    pub category: String,
    pub exam_code: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ParsedCandidate {
    pub index: usize,
    pub raw: Value,
    pub outcome: Validation<QuestionDraft>,
    #[serde(default)]
    pub save_state: SaveState,
}

impl ParsedCandidate {
    pub fn is_valid(&self) -> bool {
        self.outcome.is_valid()
    }

    /// Valid, not yet saved. Failed attempts stay eligible for a retry.
    pub fn is_saveable(&self) -> bool {
        self.is_valid() && !self.save_state.is_terminal()
    }
}

/// Informational differences between a revision and its original.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct RevisionDiff {
    pub question_changed: bool,
    pub explanation_changed: bool,
    pub answer_text_changed: Vec<bool>,
}

impl RevisionDiff {
    pub fn has_changes(&self) -> bool {
        self.question_changed
            || self.explanation_changed
            || self.answer_text_changed.iter().any(|changed| *changed)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ParsedRevision {
    pub index: usize,
    pub id: Option<String>,
    pub updated: Option<Value>,
    pub original: Option<Question>,
    pub outcome: Validation<RevisedQuestion>,
    #[serde(default)]
    pub diff: RevisionDiff,
    #[serde(default)]
    pub save_state: SaveState,
}

impl ParsedRevision {
    pub fn is_valid(&self) -> bool {
        self.outcome.is_valid()
    }

    pub fn is_saveable(&self) -> bool {
        self.is_valid() && self.original.is_some() && !self.save_state.is_terminal()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct CreationReport {
    /// Input needed repairs before it would parse.
    pub sanitized: bool,
    pub candidates: Vec<ParsedCandidate>,
}

impl CreationReport {
    pub fn valid_count(&self) -> usize {
        self.candidates.iter().filter(|c| c.is_valid()).count()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RevisionReport {
    pub sanitized: bool,
    pub revisions: Vec<ParsedRevision>,
}

impl RevisionReport {
    pub fn valid_count(&self) -> usize {
        self.revisions.iter().filter(|r| r.is_valid()).count()
    }
}

fn state_for(outcome: &SaveOutcome) -> SaveState {
    match outcome {
        SaveOutcome::Saved(_) => SaveState::Saved,
        SaveOutcome::Failed(message) => SaveState::Failed {
            message: message.clone(),
        },
        SaveOutcome::Discarded => SaveState::Discarded,
    }
}

/// Returns a copy of `candidates` with the outcome recorded on `index`.
pub fn apply_candidate_outcome(
    candidates: &[ParsedCandidate],
    index: usize,
    outcome: &SaveOutcome,
) -> Vec<ParsedCandidate> {
    candidates
        .iter()
        .map(|candidate| {
            if candidate.index != index {
                return candidate.clone();
            }
            ParsedCandidate {
                save_state: state_for(outcome),
                ..candidate.clone()
            }
        })
        .collect()
}

/// Returns a copy of `revisions` with the outcome recorded on `index`.
///
/// A successful save refreshes the stored original's `category` and
/// `updated_at` from the record the gateway returned, so later diffs compare
/// against what is actually persisted.
pub fn apply_revision_outcome(
    revisions: &[ParsedRevision],
    index: usize,
    outcome: &SaveOutcome,
) -> Vec<ParsedRevision> {
    revisions
        .iter()
        .map(|revision| {
            if revision.index != index {
                return revision.clone();
            }
            let mut next = revision.clone();
            next.save_state = state_for(outcome);
            if let (SaveOutcome::Saved(saved), Some(original)) = (outcome, next.original.as_mut()) {
                original.category = saved.category.clone();
                original.updated_at = saved.updated_at.or_else(|| Some(Utc::now()));
            }
            next
        })
        .collect()
}
