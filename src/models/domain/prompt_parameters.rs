use serde::{Deserialize, Serialize};

use crate::models::domain::question::Level;

pub const MIN_QUESTION_COUNT: u32 = 2;
pub const MAX_QUESTION_COUNT: u32 = 50;
pub const MIN_ANSWERS: u32 = 2;
pub const MAX_ANSWERS: u32 = 12;
pub const MAX_SIMILARITY: u8 = 100;

/// Scenario framings offered to the user. Free-form templates are accepted too.
pub const DEFAULT_SCENARIO_TEMPLATES: [&str; 5] = [
    "A company is migrating an on-premises workload and needs to",
    "A developer is troubleshooting a production issue where",
    "A security engineer must ensure that",
    "A startup wants to minimize cost while",
    "An operations team needs to automate",
];

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy, Default)]
pub enum Difficulty {
    #[default]
    Mixed,
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn level(&self) -> Option<Level> {
        match self {
            Difficulty::Mixed => None,
            Difficulty::Beginner => Some(Level::Beginner),
            Difficulty::Intermediate => Some(Level::Intermediate),
            Difficulty::Advanced => Some(Level::Advanced),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum LengthPreference {
    Short,
    Long,
    #[default]
    Mixed,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioScope {
    #[default]
    All,
    Some,
}

/// How close distractors should sit to the correct answer.
#[derive(Clone, Debug, PartialEq, Eq, Copy)]
pub enum SimilarityBand {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl SimilarityBand {
    pub fn from_similarity(similarity: u8) -> Self {
        match similarity {
            s if s < 30 => SimilarityBand::Low,
            s if s < 60 => SimilarityBand::Medium,
            s if s < 80 => SimilarityBand::High,
            _ => SimilarityBand::VeryHigh,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SimilarityBand::Low => "low",
            SimilarityBand::Medium => "medium",
            SimilarityBand::High => "high",
            SimilarityBand::VeryHigh => "very high",
        }
    }
}

/// Generation constraints for a batch of new questions.
///
/// Field setters clamp after every change so that
/// `2 <= min_answers <= max_answers <= 12` and
/// `1 <= correct_answers <= max_answers - 1` always hold. Values arriving
/// through deserialization are clamped by [`PromptParameters::normalized`]
/// before use.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PromptParameters {
    pub exam_code: String,
    pub category: Option<String>,
    pub question_count: u32,
    pub difficulty: Difficulty,
    pub similarity: u8,
    pub length_preference: LengthPreference,
    pub min_answers: u32,
    pub max_answers: u32,
    pub correct_answers: u32,
    pub context: String,
    pub scenario_templates: Vec<String>,
    pub scenario_scope: ScenarioScope,
    pub similar_questions_text: Option<String>,
    pub include_similar_questions: bool,
}

impl Default for PromptParameters {
    fn default() -> Self {
        PromptParameters {
            exam_code: String::new(),
            category: None,
            question_count: 10,
            difficulty: Difficulty::Mixed,
            similarity: 50,
            length_preference: LengthPreference::Mixed,
            min_answers: 4,
            max_answers: 4,
            correct_answers: 1,
            context: String::new(),
            scenario_templates: Vec::new(),
            scenario_scope: ScenarioScope::All,
            similar_questions_text: None,
            include_similar_questions: false,
        }
    }
}

impl PromptParameters {
    pub fn new(exam_code: &str) -> Self {
        PromptParameters {
            exam_code: exam_code.to_string(),
            ..Default::default()
        }
    }

    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    pub fn normalize(&mut self) {
        self.question_count = self
            .question_count
            .clamp(MIN_QUESTION_COUNT, MAX_QUESTION_COUNT);
        self.similarity = self.similarity.min(MAX_SIMILARITY);
        self.min_answers = self.min_answers.clamp(MIN_ANSWERS, MAX_ANSWERS);
        self.max_answers = self.max_answers.clamp(self.min_answers, MAX_ANSWERS);
        self.correct_answers = self.correct_answers.clamp(1, self.max_answers - 1);
    }

    pub fn set_question_count(&mut self, count: u32) {
        self.question_count = count;
        self.normalize();
    }

    pub fn set_similarity(&mut self, similarity: u8) {
        self.similarity = similarity;
        self.normalize();
    }

    pub fn set_min_answers(&mut self, min_answers: u32) {
        self.min_answers = min_answers;
        self.normalize();
    }

    pub fn set_max_answers(&mut self, max_answers: u32) {
        self.max_answers = max_answers;
        self.normalize();
    }

    pub fn set_correct_answers(&mut self, correct_answers: u32) {
        self.correct_answers = correct_answers;
        self.normalize();
    }

    pub fn similarity_band(&self) -> SimilarityBand {
        SimilarityBand::from_similarity(self.similarity)
    }

    /// Similar-questions text that should be rendered, if any.
    pub fn active_similar_questions(&self) -> Option<&str> {
        if !self.include_similar_questions {
            return None;
        }
        self.similar_questions_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    pub fn selected_scenarios(&self) -> Vec<&str> {
        self.scenario_templates
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect()
    }
}
