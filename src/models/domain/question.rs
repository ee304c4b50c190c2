use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Answer {
    pub text: String,
    #[serde(rename = "isCorrect")]
    pub is_correct: bool,
}

impl Answer {
    pub fn new(text: &str, is_correct: bool) -> Self {
        Answer {
            text: text.to_string(),
            is_correct,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy, Hash)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive match; LLM output is expected to echo the label verbatim.
impl FromStr for Level {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str() == value)
            .ok_or_else(|| format!("unknown level '{}'", value))
    }
}

/// A stored question-bank record.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub question: String,
    pub answers: Vec<Answer>,
    pub explanation: String, // HTML
    pub level: Level,
    pub category: String,
    pub exam_code: String,
    #[serde(default)]
    pub inactive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Question {
    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct).count()
    }
}

/// Insert payload; the persistence layer assigns the id.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewQuestion {
    pub question: String,
    pub answers: Vec<Answer>,
    pub explanation: String,
    pub level: Level,
    pub category: String,
    pub exam_code: String,
    pub inactive: bool,
    pub created_at: DateTime<Utc>,
}

impl NewQuestion {
    pub fn into_question(self, id: String) -> Question {
        Question {
            id,
            question: self.question,
            answers: self.answers,
            explanation: self.explanation,
            level: self.level,
            category: self.category,
            exam_code: self.exam_code,
            inactive: self.inactive,
            created_at: Some(self.created_at),
            updated_at: None,
        }
    }
}

/// Update payload; `updated_at` is set by the persistence layer.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionUpdate {
    pub id: String,
    pub question: String,
    pub answers: Vec<Answer>,
    pub explanation: String,
    pub category: String,
    pub level: Level,
    pub exam_code: String,
    pub inactive: bool,
}
