//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use health_coach::adapters::ai::{LlmTagClassifier, MockAIProvider};
use health_coach::adapters::memory::{
    InMemoryAssessmentRepository, InMemoryChatRepository, InMemoryQuotaRepository,
};
use health_coach::adapters::personas::StaticPersonaDirectory;
use health_coach::application::handlers::{
    AssessmentFlow, ChatEvent, ChatEventStream, ChatSettings, ScheduleResponsesHandler,
    SendChatMessageHandler, StartOrContinueHandler, SubmitAnswerHandler,
};
use health_coach::config::AppConfig;
use health_coach::domain::assessment::QuestionCatalog;
use health_coach::domain::foundation::PersonaId;
use health_coach::domain::persona::{Persona, PersonaGroup, SchedulerSettings};
use health_coach::ports::ChatRepository;

use futures::StreamExt;

pub const ROUTER: &str = "ai0";
pub const ASSESSOR: &str = "hs_profile_assessment_agent";
pub const LISTENER: &str = "hs_empathy_agent";
pub const NUTRITIONIST: &str = "hs_nutrition_agent";

pub fn pid(id: &str) -> PersonaId {
    PersonaId::new(id).unwrap()
}

pub fn persona(id: &str, name: &str, prompt: &str, tags: &[&str]) -> Persona {
    Persona {
        id: pid(id),
        name: name.into(),
        personality: String::new(),
        model: "qwen-plus".into(),
        avatar: String::new(),
        custom_prompt: prompt.into(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

pub fn personas() -> Vec<Persona> {
    vec![
        persona(ROUTER, "Dispatcher", "Pick tags from: #allTags#", &[]),
        persona(ASSESSOR, "Profiler", "Run the questionnaire.", &["assessment"]),
        persona(LISTENER, "Listener", "Listen first.", &["stress", "sleep"]),
        persona(NUTRITIONIST, "Nutritionist", "Talk food.", &["diet"]),
    ]
}

pub fn groups() -> Vec<PersonaGroup> {
    vec![PersonaGroup {
        id: "health".into(),
        name: "Health Circle".into(),
        description: String::new(),
        members: vec![pid(ROUTER), pid(ASSESSOR), pid(LISTENER), pid(NUTRITIONIST)],
        is_group_discussion_mode: false,
    }]
}

/// Two-question catalog: a confirmation and an open question.
pub fn short_catalog() -> QuestionCatalog {
    QuestionCatalog::from_yaml_str(
        r#"
- id: q_welcome
  order: 0
  text: Ready to start?
  type: confirmation
  options: ["Yes, I'm ready", "No, next time"]
- id: q_goal
  order: 1
  text: What is your main goal?
  type: open_text
"#,
    )
    .unwrap()
}

/// Chat handler over in-memory stores; the stores are returned for inspection.
pub struct ChatFixture {
    pub handler: SendChatMessageHandler,
    pub ai: Arc<MockAIProvider>,
    pub chats: Arc<InMemoryChatRepository>,
    pub quotas: Arc<InMemoryQuotaRepository>,
    pub assessments: Arc<InMemoryAssessmentRepository>,
}

pub fn chat_fixture(ai: MockAIProvider, guest_quota: u32) -> ChatFixture {
    let ai = Arc::new(ai);
    let chats = Arc::new(InMemoryChatRepository::new());
    let quotas = Arc::new(InMemoryQuotaRepository::new());
    let assessments = Arc::new(InMemoryAssessmentRepository::new());
    let handler = chat_handler(
        ai.clone(),
        chats.clone(),
        quotas.clone(),
        assessments.clone(),
        guest_quota,
    );

    ChatFixture {
        handler,
        ai,
        chats,
        quotas,
        assessments,
    }
}

/// Chat handler over the given history store and in-memory everything else.
pub fn chat_handler(
    ai: Arc<MockAIProvider>,
    chats: Arc<dyn ChatRepository>,
    quotas: Arc<InMemoryQuotaRepository>,
    assessments: Arc<InMemoryAssessmentRepository>,
    guest_quota: u32,
) -> SendChatMessageHandler {
    let directory = Arc::new(StaticPersonaDirectory::new(personas(), groups()));
    let catalog = short_catalog();

    let classifier = Arc::new(LlmTagClassifier::new(ai.clone(), directory.clone(), pid(ROUTER)));
    let scheduler = Arc::new(ScheduleResponsesHandler::new(
        assessments.clone(),
        classifier,
        SchedulerSettings::default(),
    ));
    let flow = AssessmentFlow {
        repository: assessments.clone(),
        start: Arc::new(StartOrContinueHandler::new(assessments.clone(), catalog.clone())),
        submit: Arc::new(SubmitAnswerHandler::new(assessments.clone(), catalog)),
    };
    SendChatMessageHandler::new(
        chats,
        quotas,
        directory,
        scheduler,
        flow,
        ai,
        ChatSettings {
            guest_quota,
            history_limit: 10,
            system_prompt: "You are part of #groupName#.".into(),
        },
    )
}

pub async fn collect(stream: ChatEventStream) -> Vec<ChatEvent> {
    stream.collect().await
}

/// Concatenated `content` events.
pub fn reply_text(events: &[ChatEvent]) -> String {
    events
        .iter()
        .filter_map(|e| match e {
            ChatEvent::Content { content } => Some(content.as_str()),
            _ => None,
        })
        .collect()
}

pub const APP_YAML: &str = r#"
ai:
  providers:
    local:
      kind: mock
  models:
    qwen-plus: local
chat:
  guest_quota: 2
personas:
  system_prompt: "You are part of #groupName#."
  characters:
    - id: ai0
      name: Dispatcher
      model: qwen-plus
      custom_prompt: "Pick tags from: #allTags#"
    - id: hs_profile_assessment_agent
      name: Profiler
      model: qwen-plus
      tags: [assessment]
    - id: hs_empathy_agent
      name: Listener
      model: qwen-plus
      tags: [stress, sleep]
  groups:
    - id: health
      name: Health Circle
      members: [ai0, hs_profile_assessment_agent, hs_empathy_agent]
"#;

pub fn app_config() -> AppConfig {
    let config: AppConfig = serde_yaml::from_str(APP_YAML).unwrap();
    config.validate().unwrap();
    config
}
