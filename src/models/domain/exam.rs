use serde::{Deserialize, Serialize};

/// Exam metadata the prompt builder and the save step read from.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Exam {
    pub exam_code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

impl Exam {
    pub fn new(exam_code: &str, name: &str, is_active: bool) -> Self {
        Exam {
            exam_code: exam_code.to_string(),
            name: name.to_string(),
            provider: None,
            is_active,
        }
    }

    /// "AWS Solutions Architect Associate (SAA-C03)" style label used in prompts.
    pub fn display_name(&self) -> String {
        match &self.provider {
            Some(provider) if !provider.trim().is_empty() => {
                format!("{} {} ({})", provider.trim(), self.name, self.exam_code)
            }
            _ => format!("{} ({})", self.name, self.exam_code),
        }
    }
}

/// A category document in the exam categories collection.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExamCategory {
    pub exam_code: String,
    pub name: String,
}
