//! Assessment module - the health profile questionnaire.
//!
//! Holds the question catalog, the assessment aggregate and the policy for
//! answers that end an assessment early. The flow itself (start, continue,
//! submit) lives in the application handlers.

mod aggregate;
mod catalog;
mod errors;
mod policy;
mod question;
mod status;

pub use aggregate::{Answer, Assessment, NewAssessment};
pub use catalog::{
    CatalogError, QuestionCatalog, PRIVACY_CONSENT_QUESTION_ID, PRIVACY_DECLINE_OPTION,
    WELCOME_DECLINE_OPTION, WELCOME_QUESTION_ID,
};
pub use errors::{
    AssessmentError, ANSWER_REQUIRED_MESSAGE, CATALOG_NOT_CONFIGURED_MESSAGE,
    NOT_IN_PROGRESS_MESSAGE, PRIVACY_DECLINED_MESSAGE, WELCOME_DECLINED_MESSAGE,
};
pub use policy::declining_message;
pub use question::{QuestionDefinition, QuestionType};
pub use status::AssessmentStatus;
