use std::sync::Arc;

use chrono::Utc;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{
        apply_candidate_outcome, Exam, NewQuestion, ParsedCandidate, QuestionDraft, SaveOutcome,
    },
    repositories::QuestionRepository,
    services::notifier::{Notification, Notifier},
};

/// Where accepted drafts are stored.
#[derive(Clone, Debug)]
pub struct SaveTarget {
    pub exam: Exam,
    pub category: String,
}

impl SaveTarget {
    pub fn new(exam: Exam, category: impl Into<String>) -> Self {
        Self {
            exam,
            category: category.into(),
        }
    }

    fn validate(&self) -> AppResult<()> {
        if self.category.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Select a category before saving questions".to_string(),
            ));
        }
        Ok(())
    }

    fn new_question(&self, draft: &QuestionDraft) -> NewQuestion {
        NewQuestion {
            question: draft.question.clone(),
            answers: draft.answers.clone(),
            explanation: draft.explanation.clone(),
            level: draft.level,
            category: self.category.trim().to_string(),
            exam_code: self.exam.exam_code.clone(),
            inactive: !self.exam.is_active,
            created_at: Utc::now(),
        }
    }
}

/// Persists validated generated questions, one gateway call per item.
pub struct CreationService {
    repository: Arc<dyn QuestionRepository>,
    notifier: Arc<dyn Notifier>,
}

impl CreationService {
    pub fn new(repository: Arc<dyn QuestionRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Saves the candidate at `index`. A gateway failure is recorded on the
    /// candidate, not returned; errors are reserved for calls that should never
    /// have been made.
    pub async fn save_one(
        &self,
        candidates: &[ParsedCandidate],
        index: usize,
        target: &SaveTarget,
    ) -> AppResult<Vec<ParsedCandidate>> {
        target.validate()?;

        let candidate = candidates
            .iter()
            .find(|c| c.index == index)
            .ok_or_else(|| AppError::NotFound(format!("No generated question at index {}", index)))?;

        if candidate.save_state.is_saved() {
            return Ok(candidates.to_vec());
        }
        let Some(draft) = candidate.outcome.payload() else {
            return Err(AppError::ValidationError(format!(
                "Generated question {} is not valid and cannot be saved",
                index + 1
            )));
        };

        let outcome = self.persist(draft, target).await;
        match &outcome {
            SaveOutcome::Saved(_) => self
                .notifier
                .notify(Notification::success("Question saved")),
            SaveOutcome::Failed(message) => self.notifier.notify(Notification::error(format!(
                "Failed to save question {}: {}",
                index + 1,
                message
            ))),
            SaveOutcome::Discarded => {}
        }

        Ok(apply_candidate_outcome(candidates, index, &outcome))
    }

    /// Saves every saveable candidate, or only those listed in `only`, one
    /// after another. A failure is recorded on its candidate and the loop
    /// moves on.
    pub async fn save_all_valid(
        &self,
        candidates: Vec<ParsedCandidate>,
        target: &SaveTarget,
        only: Option<&[usize]>,
    ) -> AppResult<Vec<ParsedCandidate>> {
        target.validate()?;

        let pending: Vec<(usize, QuestionDraft)> = candidates
            .iter()
            .filter(|c| c.is_saveable())
            .filter(|c| only.map_or(true, |only| only.contains(&c.index)))
            .filter_map(|c| c.outcome.payload().map(|draft| (c.index, draft.clone())))
            .collect();

        if pending.is_empty() {
            self.notifier
                .notify(Notification::error("No valid questions to save"));
            return Ok(candidates);
        }

        let attempted = pending.len();
        let mut failed = 0;
        let mut candidates = candidates;
        for (index, draft) in pending {
            let outcome = self.persist(&draft, target).await;
            if let SaveOutcome::Failed(message) = &outcome {
                failed += 1;
                self.notifier.notify(Notification::error(format!(
                    "Failed to save question {}: {}",
                    index + 1,
                    message
                )));
            }
            candidates = apply_candidate_outcome(&candidates, index, &outcome);
        }

        let saved = attempted - failed;
        if failed == 0 {
            self.notifier
                .notify(Notification::success(format!("Saved {} questions", saved)));
        } else {
            self.notifier.notify(Notification::error(format!(
                "Saved {} of {} questions, {} failed",
                saved, attempted, failed
            )));
        }

        Ok(candidates)
    }

    async fn persist(&self, draft: &QuestionDraft, target: &SaveTarget) -> SaveOutcome {
        match self.repository.insert_question(target.new_question(draft)).await {
            Ok(question) => SaveOutcome::Saved(question),
            Err(err) => {
                log::error!("Failed to insert generated question: {}", err);
                SaveOutcome::Failed(err.to_string())
            }
        }
    }
}
