//! The ordered, immutable question catalog.
//!
//! The catalog is built once at startup. Questions are sorted by `order`
//! and the id index points into that same sorted list, so neither is
//! ever mutated afterwards.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use super::question::{QuestionDefinition, QuestionType};

pub const WELCOME_QUESTION_ID: &str = "q_welcome";
pub const PRIVACY_CONSENT_QUESTION_ID: &str = "q_privacy_consent";

/// Option on the welcome question that declines the assessment.
pub const WELCOME_DECLINE_OPTION: &str = "No, next time";
/// Option on the privacy question that withholds consent.
pub const PRIVACY_DECLINE_OPTION: &str = "I do not agree";

/// Errors raised while building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate question id '{0}' in catalog")]
    DuplicateId(String),

    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Ordered question sequence with O(1) lookup by id.
#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    questions: Arc<[QuestionDefinition]>,
    positions: Arc<HashMap<String, usize>>,
}

impl QuestionCatalog {
    /// Builds a catalog, sorting by order and indexing by id.
    pub fn new(mut questions: Vec<QuestionDefinition>) -> Result<Self, CatalogError> {
        questions.sort_by_key(|q| q.order);

        let mut positions = HashMap::with_capacity(questions.len());
        for (idx, question) in questions.iter().enumerate() {
            if positions.insert(question.id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateId(question.id.clone()));
            }
        }

        Ok(Self {
            questions: questions.into(),
            positions: Arc::new(positions),
        })
    }

    /// The built-in health profile questionnaire.
    pub fn standard() -> Self {
        STANDARD_CATALOG.clone()
    }

    /// An empty catalog. Only useful to exercise misconfiguration paths.
    pub fn empty() -> Self {
        Self {
            questions: Arc::from(Vec::<QuestionDefinition>::new()),
            positions: Arc::new(HashMap::new()),
        }
    }

    /// Parses a YAML list of question definitions.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let questions: Vec<QuestionDefinition> = serde_yaml::from_str(yaml)?;
        Self::new(questions)
    }

    /// Loads a YAML catalog from disk.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn questions(&self) -> &[QuestionDefinition] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// First question by order.
    pub fn first(&self) -> Option<&QuestionDefinition> {
        self.questions.first()
    }

    pub fn get(&self, id: &str) -> Option<&QuestionDefinition> {
        self.position(id).map(|idx| &self.questions[idx])
    }

    /// Position of a question in catalog order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// The question that follows `idx`, if any.
    pub fn after(&self, idx: usize) -> Option<&QuestionDefinition> {
        self.questions.get(idx + 1)
    }
}

static STANDARD_CATALOG: Lazy<QuestionCatalog> = Lazy::new(|| QuestionCatalog {
    positions: Arc::new(
        STANDARD_QUESTIONS
            .iter()
            .enumerate()
            .map(|(idx, q)| (q.id.clone(), idx))
            .collect(),
    ),
    questions: Arc::from(STANDARD_QUESTIONS.clone()),
});

static STANDARD_QUESTIONS: Lazy<Vec<QuestionDefinition>> = Lazy::new(|| {
    let mut questions = vec![
        question(
            WELCOME_QUESTION_ID,
            0,
            "Hello! To provide you with more personalized services, we need to understand some of your basic information. The whole process will take about 5-10 minutes, and your data will be kept strictly confidential. Are you ready to start?",
            QuestionType::Confirmation,
            &["Yes, I'm ready", WELCOME_DECLINE_OPTION],
        ),
        question(
            "q_age_group",
            1,
            "What is your age group?",
            QuestionType::SingleChoice,
            &["18-24 years", "25-34 years", "35-44 years", "45-54 years", "55 years and above"],
        ),
        question(
            "q_chronic_diseases",
            2,
            "Do you have any chronic diseases diagnosed by a doctor (e.g., hypertension, diabetes, heart disease)? If yes, please briefly explain. If no, you can write 'None'.",
            QuestionType::OpenText,
            &[],
        ),
        question(
            "q_medications",
            3,
            "Are you currently taking any long-term prescription medications? If yes, please briefly state the drug name or type. If no, you can write 'None'.",
            QuestionType::OpenText,
            &[],
        ),
        question(
            "q_exercise_habits",
            4,
            "How often do you currently exercise?",
            QuestionType::SingleChoice,
            &["Almost never", "1-2 times a week", "3-4 times a week", "5 times a week or more"],
        ),
        question(
            "q_sleep_quality",
            5,
            "How is your usual sleep quality?",
            QuestionType::SingleChoice,
            &[
                "Very good, can ensure 7-8 hours and feel energetic",
                "Average, occasionally insufficient sleep or poor quality",
                "Poor, often suffer from insomnia or poor sleep quality",
            ],
        ),
        question(
            "q_stress_level",
            6,
            "How would you rate your current overall stress level? (1 for extremely low, 5 for extremely high)",
            QuestionType::SingleChoice,
            &["1 (Extremely Low)", "2 (Low)", "3 (Moderate)", "4 (High)", "5 (Extremely High)"],
        ),
        question(
            "q_sex_frequency_satisfaction",
            7,
            "Are you satisfied with your current frequency of sexual activity?",
            QuestionType::SingleChoice,
            &[
                "Very satisfied",
                "Somewhat satisfied",
                "Neutral",
                "Somewhat dissatisfied",
                "Very dissatisfied",
                "Currently no sexual activity",
            ],
        ),
        question(
            "q_sex_ability_concerns",
            8,
            "In terms of sexual ability (e.g., erection, stamina, libido), what are your main concerns or worries at present? (Multiple choice, select 'No significant concerns' if none)",
            QuestionType::MultiChoice,
            &[
                "Difficulty achieving or maintaining an erection",
                "Premature ejaculation or insufficient stamina",
                "Low libido",
                "Difficulty reaching orgasm",
                "Pain during intercourse",
                "Anxiety about performance",
                "Lack of sexual knowledge or skills",
                "No significant concerns",
            ],
        ),
        question(
            "q_main_goals",
            9,
            "What are the core goals you most hope to achieve with our AI partners? (Multiple choice)",
            QuestionType::MultiChoice,
            &[
                "Gain scientific sexual health knowledge",
                "Improve sexual ability (e.g., stamina, hardness)",
                "Improve sexual communication with partner",
                "Adjust unhealthy sexual habits",
                "Relieve sexual anxiety or stress",
                "Develop a personalized exercise plan",
                "Understand and try healthy sexual behavior patterns",
            ],
        ),
        question(
            PRIVACY_CONSENT_QUESTION_ID,
            10,
            "We reiterate that all your answers will be kept strictly confidential and used solely to provide you with personalized health advice and plans. Do you agree to our processing of this information?",
            QuestionType::Confirmation,
            &["I agree and continue", PRIVACY_DECLINE_OPTION],
        ),
    ];
    questions.sort_by_key(|q| q.order);
    questions
});

fn question(
    id: &str,
    order: i32,
    text: &str,
    question_type: QuestionType,
    options: &[&str],
) -> QuestionDefinition {
    QuestionDefinition {
        id: id.to_string(),
        order,
        text: text.to_string(),
        question_type,
        options: options.iter().map(|o| o.to_string()).collect(),
        required: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn standard_catalog_has_eleven_ordered_questions() {
        let catalog = QuestionCatalog::standard();
        assert_eq!(catalog.len(), 11);

        let orders: Vec<i32> = catalog.questions().iter().map(|q| q.order).collect();
        assert_eq!(orders, (0..=10).collect::<Vec<_>>());
        assert_eq!(catalog.first().unwrap().id, WELCOME_QUESTION_ID);
        assert_eq!(catalog.questions()[10].id, PRIVACY_CONSENT_QUESTION_ID);
    }

    #[test]
    fn standard_catalog_questions_are_all_required() {
        assert!(QuestionCatalog::standard().questions().iter().all(|q| q.required));
    }

    #[test]
    fn lookup_by_id_uses_sorted_positions() {
        let catalog = QuestionCatalog::standard();
        assert_eq!(catalog.position("q_age_group"), Some(1));
        assert_eq!(catalog.get("q_medications").unwrap().order, 3);
        assert_eq!(catalog.after(1).unwrap().id, "q_chronic_diseases");
        assert!(catalog.after(10).is_none());
        assert!(catalog.get("q_unknown").is_none());
    }

    #[test]
    fn new_sorts_unsorted_input() {
        let catalog = QuestionCatalog::new(vec![
            question("b", 2, "B", QuestionType::OpenText, &[]),
            question("a", 1, "A", QuestionType::OpenText, &[]),
        ])
        .unwrap();

        assert_eq!(catalog.first().unwrap().id, "a");
        assert_eq!(catalog.position("b"), Some(1));
    }

    #[test]
    fn new_rejects_duplicate_ids() {
        let result = QuestionCatalog::new(vec![
            question("a", 1, "A", QuestionType::OpenText, &[]),
            question("a", 2, "A again", QuestionType::OpenText, &[]),
        ]);
        assert!(matches!(result, Err(CatalogError::DuplicateId(id)) if id == "a"));
    }

    #[test]
    fn parses_yaml_catalog() {
        let yaml = r#"
- id: q_two
  order: 2
  text: "Second?"
  type: single_choice
  options: ["yes", "no"]
- id: q_one
  order: 1
  text: "First?"
  type: open_text
"#;
        let catalog = QuestionCatalog::from_yaml_str(yaml).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.first().unwrap().id, "q_one");
        assert_eq!(catalog.get("q_two").unwrap().options.len(), 2);
    }

    #[test]
    fn empty_catalog_has_no_first_question() {
        let catalog = QuestionCatalog::empty();
        assert!(catalog.is_empty());
        assert!(catalog.first().is_none());
    }

    proptest! {
        #[test]
        fn traversal_follows_ascending_order(orders in proptest::collection::hash_set(-100i32..100, 1..20)) {
            let questions: Vec<_> = orders
                .iter()
                .map(|o| question(&format!("q{}", o), *o, "?", QuestionType::OpenText, &[]))
                .collect();
            let catalog = QuestionCatalog::new(questions).unwrap();

            for idx in 0..catalog.len() {
                if let Some(next) = catalog.after(idx) {
                    prop_assert!(catalog.questions()[idx].order < next.order);
                }
                let id = &catalog.questions()[idx].id;
                prop_assert_eq!(catalog.position(id), Some(idx));
            }
        }
    }
}
