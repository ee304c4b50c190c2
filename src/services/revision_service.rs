use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{
        apply_revision_outcome, ParsedRevision, Question, QuestionUpdate, RevisedQuestion,
        SaveOutcome,
    },
    repositories::QuestionRepository,
    services::notifier::{Notification, Notifier},
};

fn require_category(category: &str) -> AppResult<&str> {
    let category = category.trim();
    if category.is_empty() {
        return Err(AppError::ValidationError(
            "Select a category before saving revisions".to_string(),
        ));
    }
    Ok(category)
}

/// Original record with the reviewed text and the chosen category applied.
fn merge_update(original: &Question, revised: &RevisedQuestion, category: &str) -> QuestionUpdate {
    QuestionUpdate {
        id: original.id.clone(),
        question: revised.question.clone(),
        answers: revised.answers.clone(),
        explanation: revised.explanation.clone(),
        category: category.to_string(),
        level: original.level,
        exam_code: original.exam_code.clone(),
        inactive: original.inactive,
    }
}

pub struct RevisionService {
    repository: Arc<dyn QuestionRepository>,
    notifier: Arc<dyn Notifier>,
}

impl RevisionService {
    pub fn new(repository: Arc<dyn QuestionRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Saves one revision. Failed revisions may be saved again; saved and
    /// discarded ones are returned untouched.
    pub async fn save_one(
        &self,
        revisions: &[ParsedRevision],
        index: usize,
        category: &str,
    ) -> AppResult<Vec<ParsedRevision>> {
        let category = require_category(category)?;
        let revision = find(revisions, index)?;

        if revision.save_state.is_terminal() {
            return Ok(revisions.to_vec());
        }
        let (Some(original), Some(revised)) = (&revision.original, revision.outcome.payload())
        else {
            return Err(AppError::ValidationError(format!(
                "Revision {} is not valid and cannot be saved",
                index + 1
            )));
        };

        let outcome = self.persist(original, revised, category).await;
        match &outcome {
            SaveOutcome::Saved(_) => self
                .notifier
                .notify(Notification::success("Revision saved")),
            SaveOutcome::Failed(message) => self.notifier.notify(Notification::error(format!(
                "Failed to save revision {}: {}",
                index + 1,
                message
            ))),
            SaveOutcome::Discarded => {}
        }

        Ok(apply_revision_outcome(revisions, index, &outcome))
    }

    /// Sequentially saves every saveable revision (optionally restricted to
    /// `only`). Discarded revisions are skipped.
    pub async fn save_all_valid(
        &self,
        revisions: Vec<ParsedRevision>,
        category: &str,
        only: Option<&[usize]>,
    ) -> AppResult<Vec<ParsedRevision>> {
        let category = require_category(category)?;

        let pending: Vec<(usize, Question, RevisedQuestion)> = revisions
            .iter()
            .filter(|r| r.is_saveable())
            .filter(|r| only.map_or(true, |only| only.contains(&r.index)))
            .filter_map(|r| match (&r.original, r.outcome.payload()) {
                (Some(original), Some(revised)) => {
                    Some((r.index, original.clone(), revised.clone()))
                }
                _ => None,
            })
            .collect();

        if pending.is_empty() {
            self.notifier
                .notify(Notification::error("No valid revisions to save"));
            return Ok(revisions);
        }

        let attempted = pending.len();
        let mut failed = 0;
        let mut revisions = revisions;
        for (index, original, revised) in pending {
            let outcome = self.persist(&original, &revised, category).await;
            if let SaveOutcome::Failed(message) = &outcome {
                failed += 1;
                self.notifier.notify(Notification::error(format!(
                    "Failed to save revision {}: {}",
                    index + 1,
                    message
                )));
            }
            revisions = apply_revision_outcome(&revisions, index, &outcome);
        }

        let saved = attempted - failed;
        if failed == 0 {
            self.notifier
                .notify(Notification::success(format!("Saved {} revisions", saved)));
        } else {
            self.notifier.notify(Notification::error(format!(
                "Saved {} of {} revisions, {} failed",
                saved, attempted, failed
            )));
        }

        Ok(revisions)
    }

    /// Excludes a revision from later saves. Its report stays visible.
    pub fn discard(
        &self,
        revisions: &[ParsedRevision],
        index: usize,
    ) -> AppResult<Vec<ParsedRevision>> {
        let revision = find(revisions, index)?;
        if revision.save_state.is_saved() {
            return Err(AppError::ValidationError(format!(
                "Revision {} is already saved",
                index + 1
            )));
        }
        Ok(apply_revision_outcome(
            revisions,
            index,
            &SaveOutcome::Discarded,
        ))
    }

    async fn persist(
        &self,
        original: &Question,
        revised: &RevisedQuestion,
        category: &str,
    ) -> SaveOutcome {
        let update = merge_update(original, revised, category);
        match self.repository.update_question(update).await {
            Ok(question) => SaveOutcome::Saved(question),
            Err(err) => {
                log::error!("Failed to update question {}: {}", original.id, err);
                SaveOutcome::Failed(err.to_string())
            }
        }
    }
}

fn find(revisions: &[ParsedRevision], index: usize) -> AppResult<&ParsedRevision> {
    revisions
        .iter()
        .find(|r| r.index == index)
        .ok_or_else(|| AppError::NotFound(format!("No revision at index {}", index)))
}
