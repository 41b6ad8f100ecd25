//! SendChatMessageHandler - Answers one user message with a streamed persona reply.
//!
//! The flow mirrors a group chat: the message is stored, the scheduler
//! picks who answers, the assessment engine runs when the assessment
//! persona is chosen, and the reply streams back as [`ChatEvent`]s while
//! a background task stores it.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::errors::ChatError;
use super::events::{ChatEvent, ChatEventStream, NO_AI_SCHEDULED_EVENT};
use super::prompt::{assessment_context, build_request, system_prompt, PromptParts};
use crate::application::handlers::assessment::{
    AssessmentStep, StartOrContinueCommand, StartOrContinueHandler, SubmitAnswerCommand,
    SubmitAnswerHandler,
};
use crate::application::handlers::scheduling::{
    ScheduleResponsesCommand, ScheduleResponsesHandler,
};
use crate::domain::assessment::{AssessmentError, AssessmentStatus};
use crate::domain::chat::NewChatMessage;
use crate::domain::foundation::UserId;
use crate::domain::persona::Persona;
use crate::ports::{
    AIProvider, AssessmentRepository, ChatRepository, CompletionStream, FinishReason,
    PersonaDirectory, QuotaRepository, RequestMetadata,
};

pub const NO_AI_SCHEDULED_MESSAGE: &str = "Sorry, no AI can respond to this request right now.";

pub const DEFAULT_GUEST_QUOTA: u32 = 10;
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Command to send one chat message.
#[derive(Debug, Clone)]
pub struct SendChatMessageCommand {
    pub user_id: UserId,
    pub message: String,
    /// Group to talk in; the first configured group when absent.
    pub group_id: Option<String>,
}

/// Tunables of the chat flow.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    /// Messages a guest may send.
    pub guest_quota: u32,
    /// Prior messages included in a persona prompt.
    pub history_limit: usize,
    /// Shared system prompt for personas without their own.
    pub system_prompt: String,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            guest_quota: DEFAULT_GUEST_QUOTA,
            history_limit: DEFAULT_HISTORY_LIMIT,
            system_prompt: String::new(),
        }
    }
}

/// The assessment engine as seen by the chat flow.
pub struct AssessmentFlow {
    pub repository: Arc<dyn AssessmentRepository>,
    pub start: Arc<StartOrContinueHandler>,
    pub submit: Arc<SubmitAnswerHandler>,
}

/// Handler for chat messages.
pub struct SendChatMessageHandler {
    chats: Arc<dyn ChatRepository>,
    quotas: Arc<dyn QuotaRepository>,
    personas: Arc<dyn PersonaDirectory>,
    scheduler: Arc<ScheduleResponsesHandler>,
    assessment: AssessmentFlow,
    ai: Arc<dyn AIProvider>,
    settings: ChatSettings,
}

impl SendChatMessageHandler {
    pub fn new(
        chats: Arc<dyn ChatRepository>,
        quotas: Arc<dyn QuotaRepository>,
        personas: Arc<dyn PersonaDirectory>,
        scheduler: Arc<ScheduleResponsesHandler>,
        assessment: AssessmentFlow,
        ai: Arc<dyn AIProvider>,
        settings: ChatSettings,
    ) -> Self {
        Self {
            chats,
            quotas,
            personas,
            scheduler,
            assessment,
            ai,
            settings,
        }
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Handles a message and returns the reply stream.
    ///
    /// # Errors
    ///
    /// Only quota failures are returned; everything after the quota check
    /// is reported on the stream.
    pub async fn handle(&self, cmd: SendChatMessageCommand) -> Result<ChatEventStream, ChatError> {
        // 1. Guest quota
        let is_guest = cmd.user_id.is_guest();
        if is_guest {
            let quota = self
                .quotas
                .get(&cmd.user_id)
                .await
                .map_err(ChatError::QuotaUnavailable)?;
            if quota.is_exhausted(self.settings.guest_quota) {
                warn!(user_id = %cmd.user_id, sent = quota.messages_sent, "guest quota exhausted");
                return Err(ChatError::QuotaExceeded {
                    limit: self.settings.guest_quota,
                });
            }
        }

        // 2. Store the message, then load what came before it
        let saved = match self
            .chats
            .append(NewChatMessage::from_user(cmd.user_id.clone(), &cmd.message))
            .await
        {
            Ok(saved) => Some(saved.id),
            Err(err) => {
                error!(user_id = %cmd.user_id, error = %err, "failed to store user message");
                None
            }
        };
        let mut history = self.chats.history(&cmd.user_id).await.unwrap_or_else(|err| {
            warn!(user_id = %cmd.user_id, error = %err, "failed to load chat history");
            Vec::new()
        });
        if let Some(id) = saved {
            history.retain(|m| m.id != id);
        }

        // 3. Who may answer
        let Some(roster) = self
            .personas
            .roster(cmd.group_id.as_deref())
            .filter(|r| !r.personas.is_empty())
        else {
            warn!(user_id = %cmd.user_id, group_id = ?cmd.group_id, "no personas in group");
            return Ok(failure(ChatError::NoPersonasAvailable));
        };

        // 4. Who does answer
        let selected = match self
            .scheduler
            .handle(ScheduleResponsesCommand {
                user_id: cmd.user_id.clone(),
                message: cmd.message.clone(),
                history: history.clone(),
                available: roster.personas.clone(),
            })
            .await
        {
            Ok(selected) => selected,
            Err(err) => {
                error!(user_id = %cmd.user_id, error = %err, "scheduling failed");
                return Ok(failure(ChatError::from(err)));
            }
        };
        let Some(persona_id) = selected.into_iter().next() else {
            info!(user_id = %cmd.user_id, "no persona scheduled");
            return Ok(single(ChatEvent::info(NO_AI_SCHEDULED_EVENT, NO_AI_SCHEDULED_MESSAGE)));
        };

        let Some(persona) = self.personas.find(&persona_id) else {
            error!(persona_id = %persona_id, "scheduled persona has no configuration");
            return Ok(failure(ChatError::PersonaNotConfigured { persona_id }));
        };
        info!(user_id = %cmd.user_id, persona_id = %persona.id, "persona scheduled");

        // 5. Assessment persona drives the questionnaire
        let mut context_header = None;
        if persona.id == self.scheduler.settings().assessment_persona_id {
            match self.advance_assessment(&cmd).await {
                Ok(step) => {
                    context_header =
                        assessment_context(step.question.as_ref(), step.assessment.status());
                }
                Err(err) => {
                    info!(user_id = %cmd.user_id, error = %err, "assessment returned guidance");
                    let text = err.user_message();
                    if err.assessment().is_some() {
                        self.store_reply(&cmd.user_id, &persona.name, &text).await;
                    }
                    return Ok(single(ChatEvent::error(text, &persona.name)));
                }
            }
        }

        // 6. Prompt and stream
        let prompt = system_prompt(&persona, &roster.group.name, &self.settings.system_prompt);
        let request = build_request(
            PromptParts {
                persona: &persona,
                system_prompt: prompt,
                context_header,
                history: &history,
                history_limit: self.settings.history_limit,
                message: &cmd.message,
            },
            RequestMetadata::new(cmd.user_id.clone(), Uuid::new_v4().to_string())
                .for_persona(persona.id.clone()),
        );

        let upstream = match self.ai.stream_complete(request).await {
            Ok(upstream) => upstream,
            Err(source) => {
                error!(persona_id = %persona.id, error = %source, "failed to start completion");
                let err = ChatError::Completion {
                    persona_name: persona.name.clone(),
                    source,
                };
                return Ok(single(ChatEvent::error(err.to_string(), &persona.name)));
            }
        };

        let (tx, rx) = mpsc::channel(32);
        let relay = ReplyRelay {
            chats: self.chats.clone(),
            quotas: self.quotas.clone(),
            user_id: cmd.user_id,
            persona,
            count_quota: is_guest,
        };
        tokio::spawn(relay.run(upstream, tx));

        Ok(Box::pin(stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|event| (event, rx))
        })))
    }

    /// Answers the current question, or starts/continues the assessment.
    async fn advance_assessment(
        &self,
        cmd: &SendChatMessageCommand,
    ) -> Result<AssessmentStep, AssessmentError> {
        let active = self
            .assessment
            .repository
            .find_latest_by_user(&cmd.user_id, Some(AssessmentStatus::InProgress))
            .await
            .unwrap_or_else(|err| {
                warn!(user_id = %cmd.user_id, error = %err, "assessment lookup failed");
                None
            });

        match active.and_then(|a| a.current_question_id().map(str::to_string)) {
            Some(question_id) => {
                debug!(user_id = %cmd.user_id, question_id = %question_id, "treating message as answer");
                self.assessment
                    .submit
                    .handle(SubmitAnswerCommand {
                        user_id: cmd.user_id.clone(),
                        question_id,
                        values: vec![cmd.message.clone()],
                    })
                    .await
            }
            None => {
                self.assessment
                    .start
                    .handle(StartOrContinueCommand {
                        user_id: cmd.user_id.clone(),
                    })
                    .await
            }
        }
    }

    async fn store_reply(&self, user_id: &UserId, persona_name: &str, content: &str) {
        if let Err(err) = self
            .chats
            .append(NewChatMessage::from_persona(user_id.clone(), persona_name, content))
            .await
        {
            error!(user_id = %user_id, persona = persona_name, error = %err, "failed to store reply");
        }
    }
}

fn single(event: ChatEvent) -> ChatEventStream {
    Box::pin(stream::iter(vec![event]))
}

fn failure(err: ChatError) -> ChatEventStream {
    single(ChatEvent::error(err.to_string(), err.source_label()))
}

/// Forwards a completion to the client and stores it once finished.
struct ReplyRelay {
    chats: Arc<dyn ChatRepository>,
    quotas: Arc<dyn QuotaRepository>,
    user_id: UserId,
    persona: Persona,
    count_quota: bool,
}

impl ReplyRelay {
    async fn run(
        self,
        mut upstream: CompletionStream,
        tx: mpsc::Sender<ChatEvent>,
    ) {
        let mut reply = String::new();
        let mut outcome = Ok(());

        while let Some(chunk) = upstream.next().await {
            match chunk {
                Ok(chunk) if chunk.is_final() => {
                    if chunk.finish_reason == Some(FinishReason::Length) {
                        warn!(persona_id = %self.persona.id, "reply cut off at the token limit");
                    }
                    if let Some(usage) = chunk.usage {
                        debug!(persona_id = %self.persona.id, total_tokens = usage.total_tokens, "completion finished");
                    }
                    if !chunk.delta.is_empty() {
                        reply.push_str(&chunk.delta);
                        let _ = tx.send(ChatEvent::content(chunk.delta)).await;
                    }
                }
                Ok(chunk) if chunk.delta.is_empty() => {}
                Ok(chunk) => {
                    reply.push_str(&chunk.delta);
                    if tx.send(ChatEvent::content(chunk.delta)).await.is_err() {
                        warn!(user_id = %self.user_id, persona_id = %self.persona.id, "client went away mid-reply");
                        outcome = Err(None);
                        break;
                    }
                }
                Err(err) => {
                    error!(user_id = %self.user_id, persona_id = %self.persona.id, error = %err, "completion stream failed");
                    outcome = Err(Some(err));
                    break;
                }
            }
        }

        match outcome {
            Ok(()) => {
                if reply.trim().is_empty() {
                    info!(persona_id = %self.persona.id, "empty reply not stored");
                } else if let Err(err) = self
                    .chats
                    .append(NewChatMessage::from_persona(
                        self.user_id.clone(),
                        &self.persona.name,
                        reply,
                    ))
                    .await
                {
                    error!(user_id = %self.user_id, error = %err, "failed to store reply");
                }
            }
            Err(Some(source)) => {
                let err = ChatError::Completion {
                    persona_name: self.persona.name.clone(),
                    source,
                };
                let _ = tx.send(ChatEvent::error(err.to_string(), &self.persona.name)).await;
            }
            Err(None) => {}
        }

        if self.count_quota {
            if let Err(err) = self.quotas.increment(&self.user_id).await {
                error!(user_id = %self.user_id, error = %err, "failed to count guest message");
            }
        }

        let _ = tx.send(ChatEvent::done(&self.persona.name)).await;
    }
}
