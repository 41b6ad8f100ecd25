//! HTTP DTOs for assessment endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::AssessmentStep;
use crate::domain::assessment::{Answer, Assessment, AssessmentStatus, QuestionDefinition};

#[derive(Debug, Clone, Deserialize)]
pub struct StartRequest {
    #[serde(default)]
    pub user_id: String,
}

/// A single string is accepted for single-value questions.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AnswerValues {
    Many(Vec<String>),
    One(String),
}

impl AnswerValues {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            AnswerValues::Many(values) => values,
            AnswerValues::One(value) => vec![value],
        }
    }
}

impl Default for AnswerValues {
    fn default() -> Self {
        AnswerValues::Many(Vec::new())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub question_id: String,
    #[serde(default)]
    pub values: AnswerValues,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentResponse {
    pub id: i64,
    pub user_id: String,
    pub status: AssessmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_question_id: Option<String>,
    pub answers: Vec<Answer>,
    pub started_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    pub updated_at: String,
}

impl From<&Assessment> for AssessmentResponse {
    fn from(assessment: &Assessment) -> Self {
        Self {
            id: assessment.id().as_i64(),
            user_id: assessment.user_id().to_string(),
            status: assessment.status(),
            current_question_id: assessment.current_question_id().map(str::to_string),
            answers: assessment.answers().to_vec(),
            started_at: assessment.started_at().as_datetime().to_rfc3339(),
            completed_at: assessment
                .completed_at()
                .map(|ts| ts.as_datetime().to_rfc3339()),
            updated_at: assessment.updated_at().as_datetime().to_rfc3339(),
        }
    }
}

/// Next question to show, or `finished` once none is left.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentStepResponse {
    pub finished: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionDefinition>,
    pub assessment: AssessmentResponse,
}

impl From<AssessmentStep> for AssessmentStepResponse {
    fn from(step: AssessmentStep) -> Self {
        Self {
            finished: step.is_finished(),
            assessment: AssessmentResponse::from(&step.assessment),
            question: step.question,
        }
    }
}
