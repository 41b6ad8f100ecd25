//! ScheduleResponsesHandler - Decides which personas answer a message.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::assessment::AssessmentStatus;
use crate::domain::chat::ChatMessage;
use crate::domain::foundation::{PersonaId, UserId};
use crate::domain::persona::{
    collect_tags, rank_personas, select_responders, Persona, SchedulerSettings, SchedulingError,
};
use crate::ports::{AssessmentRepository, TagClassifier};

/// Command to pick responders for one inbound message.
#[derive(Debug, Clone)]
pub struct ScheduleResponsesCommand {
    pub user_id: UserId,
    pub message: String,
    /// Prior conversation, oldest first, without the message itself.
    pub history: Vec<ChatMessage>,
    /// Personas of the current group.
    pub available: Vec<Persona>,
}

/// Handler for responder selection.
pub struct ScheduleResponsesHandler {
    assessments: Arc<dyn AssessmentRepository>,
    classifier: Arc<dyn TagClassifier>,
    settings: SchedulerSettings,
}

impl ScheduleResponsesHandler {
    pub fn new(
        assessments: Arc<dyn AssessmentRepository>,
        classifier: Arc<dyn TagClassifier>,
        settings: SchedulerSettings,
    ) -> Self {
        Self {
            assessments,
            classifier,
            settings,
        }
    }

    pub fn settings(&self) -> &SchedulerSettings {
        &self.settings
    }

    /// Returns the responders in answer order; empty means nobody answers.
    pub async fn handle(
        &self,
        cmd: ScheduleResponsesCommand,
    ) -> Result<Vec<PersonaId>, SchedulingError> {
        // 1. An assessment in progress overrides everything else
        match self
            .assessments
            .find_latest_by_user(&cmd.user_id, Some(AssessmentStatus::InProgress))
            .await
        {
            Ok(Some(active)) => {
                let assessor = &self.settings.assessment_persona_id;
                if cmd.available.iter().any(|p| &p.id == assessor) {
                    info!(user_id = %cmd.user_id, assessment_id = %active.id(), "assessment in progress, routing to assessor");
                    return Ok(vec![assessor.clone()]);
                }
                warn!(user_id = %cmd.user_id, persona_id = %assessor, "assessment in progress but assessor not available");
                return Err(SchedulingError::AssessmentPersonaUnavailable {
                    persona_id: assessor.clone(),
                });
            }
            Ok(None) => {}
            Err(err) => {
                warn!(user_id = %cmd.user_id, error = %err, "assessment check failed, scheduling normally");
            }
        }

        // 2. Tag vocabulary and classification
        let router = &self.settings.router_id;
        let vocabulary = collect_tags(&cmd.available, router);
        if vocabulary.is_empty() && cmd.available.iter().any(|p| &p.id != router) {
            warn!(user_id = %cmd.user_id, "no tags configured on available personas");
        }

        let matched_tags = match self
            .classifier
            .classify(&cmd.message, &vocabulary, &cmd.history)
            .await
        {
            Ok(tags) => tags,
            Err(err) => {
                warn!(user_id = %cmd.user_id, error = %err, "tag classification failed, continuing without tags");
                Vec::new()
            }
        };

        // 3. Score, rank and cap
        let ranked = rank_personas(
            &cmd.available,
            router,
            &cmd.message,
            &matched_tags,
            &cmd.history,
        );
        info!(user_id = %cmd.user_id, ?matched_tags, ?ranked, "personas scored");

        let selected = select_responders(
            ranked,
            &cmd.available,
            &self.settings.fallback_persona_id,
            self.settings.max_responders,
        );
        if selected.is_empty() {
            info!(user_id = %cmd.user_id, "no persona scheduled");
        }
        Ok(selected)
    }
}
