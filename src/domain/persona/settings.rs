//! Distinguished persona ids and selection limits.

use crate::domain::foundation::PersonaId;

pub const DEFAULT_ROUTER_ID: &str = "ai0";
pub const DEFAULT_ASSESSMENT_PERSONA_ID: &str = "hs_profile_assessment_agent";
pub const DEFAULT_FALLBACK_PERSONA_ID: &str = "hs_empathy_agent";
pub const DEFAULT_MAX_RESPONDERS: usize = 1;

/// Which personas play special roles during selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerSettings {
    /// Runs tag classification; never selected as a responder.
    pub router_id: PersonaId,
    /// The only persona allowed to answer while an assessment is in progress.
    pub assessment_persona_id: PersonaId,
    /// Answers when no persona scores.
    pub fallback_persona_id: PersonaId,
    pub max_responders: usize,
}

impl SchedulerSettings {
    pub fn new(
        router_id: PersonaId,
        assessment_persona_id: PersonaId,
        fallback_persona_id: PersonaId,
        max_responders: usize,
    ) -> Self {
        Self {
            router_id,
            assessment_persona_id,
            fallback_persona_id,
            max_responders: max_responders.max(1),
        }
    }
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self::new(
            PersonaId::from_static(DEFAULT_ROUTER_ID),
            PersonaId::from_static(DEFAULT_ASSESSMENT_PERSONA_ID),
            PersonaId::from_static(DEFAULT_FALLBACK_PERSONA_ID),
            DEFAULT_MAX_RESPONDERS,
        )
    }
}
