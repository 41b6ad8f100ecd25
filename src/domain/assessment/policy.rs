//! Answers that end the questionnaire early.

use super::catalog::{
    PRIVACY_CONSENT_QUESTION_ID, PRIVACY_DECLINE_OPTION, WELCOME_DECLINE_OPTION,
    WELCOME_QUESTION_ID,
};
use super::errors::{PRIVACY_DECLINED_MESSAGE, WELCOME_DECLINED_MESSAGE};

/// Returns the farewell message if `values` decline the assessment at `question_id`.
///
/// Declining the welcome prompt or withholding privacy consent cancels
/// the assessment. Any submitted value equal to the declining option counts.
pub fn declining_message(question_id: &str, values: &[String]) -> Option<&'static str> {
    let declines = |option: &str| values.iter().any(|v| v == option);

    match question_id {
        WELCOME_QUESTION_ID if declines(WELCOME_DECLINE_OPTION) => Some(WELCOME_DECLINED_MESSAGE),
        PRIVACY_CONSENT_QUESTION_ID if declines(PRIVACY_DECLINE_OPTION) => {
            Some(PRIVACY_DECLINED_MESSAGE)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vals(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn welcome_decline_cancels() {
        assert_eq!(
            declining_message("q_welcome", &vals(&["No, next time"])),
            Some(WELCOME_DECLINED_MESSAGE)
        );
    }

    #[test]
    fn welcome_acceptance_continues() {
        assert_eq!(declining_message("q_welcome", &vals(&["Yes, I'm ready"])), None);
    }

    #[test]
    fn privacy_refusal_cancels() {
        assert_eq!(
            declining_message("q_privacy_consent", &vals(&["I do not agree"])),
            Some(PRIVACY_DECLINED_MESSAGE)
        );
    }

    #[test]
    fn declining_text_on_other_questions_is_ordinary() {
        assert_eq!(declining_message("q_main_goals", &vals(&["No, next time"])), None);
    }

    #[test]
    fn option_match_is_exact() {
        assert_eq!(declining_message("q_welcome", &vals(&["no, next time"])), None);
    }
}
