//! Question definitions for the health profile questionnaire.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a question expects to be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    SingleChoice,
    MultiChoice,
    OpenText,
    Confirmation,
}

impl QuestionType {
    /// Returns true if the question offers a fixed option list.
    pub fn has_options(&self) -> bool {
        !matches!(self, QuestionType::OpenText)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QuestionType::SingleChoice => "single_choice",
            QuestionType::MultiChoice => "multi_choice",
            QuestionType::OpenText => "open_text",
            QuestionType::Confirmation => "confirmation",
        };
        write!(f, "{}", s)
    }
}

/// One immutable entry of the question catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDefinition {
    pub id: String,
    pub order: i32,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

impl QuestionDefinition {
    /// Returns true if the submitted values leave a required question unanswered.
    ///
    /// An empty list, or a single blank value, counts as no answer.
    pub fn is_missing_answer(&self, values: &[String]) -> bool {
        if !self.required {
            return false;
        }
        match values {
            [] => true,
            [only] => only.trim().is_empty(),
            _ => false,
        }
    }
}
