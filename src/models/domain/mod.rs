pub mod exam;
pub mod parsed;
pub mod prompt_parameters;
pub mod question;
pub use exam::{Exam, ExamCategory};
pub use parsed::{
    apply_candidate_outcome, apply_revision_outcome, CreationReport, ParsedCandidate,
    ParsedRevision, QuestionDraft, RevisedQuestion, RevisionDiff, RevisionReport, SaveOutcome,
    SaveState, Validation,
};
pub use prompt_parameters::PromptParameters;
pub use question::{Answer, Level, NewQuestion, Question, QuestionUpdate};
