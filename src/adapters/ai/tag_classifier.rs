//! LLM tag classifier - asks the router persona which tags fit a message.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::chat::{tail, ChatMessage};
use crate::domain::foundation::{PersonaId, UserId};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, Message, PersonaDirectory, RequestMetadata,
    TagClassifier,
};

const ALL_TAGS_PLACEHOLDER: &str = "#allTags#";
const CLASSIFIER_HISTORY: usize = 5;
const CLASSIFIER_TEMPERATURE: f32 = 0.2;
const CLASSIFIER_MAX_TOKENS: u32 = 50;

/// `TagClassifier` backed by the router persona's prompt and model.
pub struct LlmTagClassifier {
    ai: Arc<dyn AIProvider>,
    personas: Arc<dyn PersonaDirectory>,
    router_id: PersonaId,
}

impl LlmTagClassifier {
    pub fn new(
        ai: Arc<dyn AIProvider>,
        personas: Arc<dyn PersonaDirectory>,
        router_id: PersonaId,
    ) -> Self {
        Self {
            ai,
            personas,
            router_id,
        }
    }

    fn build_request(
        &self,
        prompt: String,
        model: &str,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<CompletionRequest, AIError> {
        let caller = match history.last() {
            Some(last) => last.user_id.clone(),
            None => UserId::new(self.router_id.as_str())
                .map_err(|e| AIError::InvalidRequest(e.to_string()))?,
        };
        let metadata = RequestMetadata::new(caller, Uuid::new_v4().to_string())
            .for_persona(self.router_id.clone());

        let mut request = CompletionRequest::new(metadata)
            .with_model(model)
            .with_system_prompt(prompt)
            .with_temperature(CLASSIFIER_TEMPERATURE)
            .with_max_tokens(CLASSIFIER_MAX_TOKENS);
        for past in tail(history, CLASSIFIER_HISTORY) {
            request = request.push(if past.role.is_assistant() {
                Message::assistant(&past.content)
            } else {
                Message::user(&past.content)
            });
        }
        Ok(request.push(Message::user(message)))
    }
}

/// Splits a comma-separated reply into trimmed, non-empty tags.
fn parse_tags(reply: &str) -> Vec<String> {
    reply
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl TagClassifier for LlmTagClassifier {
    async fn classify(
        &self,
        message: &str,
        vocabulary: &[String],
        history: &[ChatMessage],
    ) -> Result<Vec<String>, AIError> {
        let router = self.personas.find(&self.router_id).ok_or_else(|| {
            AIError::InvalidRequest(format!("router persona '{}' is not configured", self.router_id))
        })?;
        if router.custom_prompt.trim().is_empty() {
            return Err(AIError::InvalidRequest(format!(
                "router persona '{}' has no prompt",
                self.router_id
            )));
        }

        let prompt = router
            .custom_prompt
            .replace(ALL_TAGS_PLACEHOLDER, &vocabulary.join(", "));
        let request = self.build_request(prompt, &router.model, message, history)?;

        let reply = self.ai.complete(request).await?;
        if reply.content.trim().is_empty() {
            warn!(model = %router.model, "classifier returned no content");
            return Ok(Vec::new());
        }

        let tags = parse_tags(&reply.content);
        debug!(raw = %reply.content, ?tags, "message classified");
        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::adapters::personas::StaticPersonaDirectory;
    use crate::domain::chat::NewChatMessage;
    use crate::domain::foundation::MessageId;
    use crate::domain::persona::{Persona, PersonaGroup};
    use crate::ports::MessageRole;

    fn router(prompt: &str) -> Persona {
        Persona {
            id: PersonaId::new("ai0").unwrap(),
            name: "Router".into(),
            personality: String::new(),
            model: "qwen-turbo".into(),
            avatar: String::new(),
            custom_prompt: prompt.into(),
            tags: vec![],
        }
    }

    fn classifier(ai: Arc<MockAIProvider>, prompt: &str) -> LlmTagClassifier {
        let directory = StaticPersonaDirectory::new(
            vec![router(prompt)],
            vec![PersonaGroup {
                id: "g".into(),
                name: "G".into(),
                description: String::new(),
                members: vec![PersonaId::new("ai0").unwrap()],
                is_group_discussion_mode: false,
            }],
        );
        LlmTagClassifier::new(ai, Arc::new(directory), PersonaId::new("ai0").unwrap())
    }

    fn history(n: i64) -> Vec<ChatMessage> {
        let user = UserId::new("u1").unwrap();
        (0..n)
            .map(|i| {
                let msg = if i % 2 == 0 {
                    NewChatMessage::from_user(user.clone(), format!("m{i}"))
                } else {
                    NewChatMessage::from_persona(user.clone(), "Coach", format!("m{i}"))
                };
                msg.into_message(MessageId::new(i + 1))
            })
            .collect()
    }

    #[test]
    fn reply_is_split_and_trimmed() {
        assert_eq!(parse_tags(" sleep, ,stress ,"), vec!["sleep", "stress"]);
        assert!(parse_tags("").is_empty());
    }

    #[tokio::test]
    async fn prompt_lists_vocabulary_and_sends_recent_history() {
        let ai = Arc::new(MockAIProvider::new().with_response("sleep, stress"));
        let vocabulary = vec!["sleep".to_string(), "stress".to_string()];

        let tags = classifier(ai.clone(), "Pick from: #allTags#")
            .classify("I can't sleep", &vocabulary, &history(8))
            .await
            .unwrap();

        assert_eq!(tags, vec!["sleep", "stress"]);
        let call = &ai.get_calls()[0];
        assert_eq!(call.system_prompt.as_deref(), Some("Pick from: sleep, stress"));
        assert_eq!(call.model.as_deref(), Some("qwen-turbo"));
        assert_eq!(call.temperature, Some(0.2));
        assert_eq!(call.max_tokens, Some(50));
        assert_eq!(call.messages.len(), 6);
        assert_eq!(call.messages[0].content, "m3");
        assert_eq!(call.messages[0].role, MessageRole::Assistant);
        assert_eq!(call.messages[5].content, "I can't sleep");
    }

    #[tokio::test]
    async fn blank_reply_means_no_tags() {
        let ai = Arc::new(MockAIProvider::new().with_response("   "));
        let tags = classifier(ai, "#allTags#").classify("hi", &[], &[]).await.unwrap();
        assert!(tags.is_empty());
    }

    #[tokio::test]
    async fn router_without_prompt_is_an_error() {
        let ai = Arc::new(MockAIProvider::new());
        let err = classifier(ai.clone(), "").classify("hi", &[], &[]).await.unwrap_err();
        assert!(matches!(err, AIError::InvalidRequest(_)));
        assert_eq!(ai.call_count(), 0);
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let ai = Arc::new(MockAIProvider::new().with_error(MockError::Network {
            message: "reset".into(),
        }));
        let err = classifier(ai, "#allTags#").classify("hi", &[], &[]).await.unwrap_err();
        assert!(matches!(err, AIError::Network(_)));
    }
}
