//! Persona and conversation group definitions.
//!
//! Both are loaded from configuration at startup and never change while
//! the process runs.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::PersonaId;

/// A configured chat responder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub id: PersonaId,
    pub name: String,
    #[serde(default)]
    pub personality: String,
    pub model: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub custom_prompt: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Persona {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// True if the persona's name, with or without a leading `@`, appears
    /// in `message_lower`. Personas without a name are never mentioned.
    pub fn is_mentioned_in(&self, message_lower: &str) -> bool {
        let name = self.name.trim().to_lowercase();
        if name.is_empty() {
            return false;
        }
        message_lower.contains(&name) || message_lower.contains(&format!("@{}", name))
    }
}

/// A conversation group: the personas that may answer in one chat room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub members: Vec<PersonaId>,
    #[serde(
        default,
        rename = "isGroupDiscussionMode",
        alias = "is_group_discussion_mode"
    )]
    pub is_group_discussion_mode: bool,
}

impl PersonaGroup {
    pub fn has_member(&self, persona_id: &PersonaId) -> bool {
        self.members.iter().any(|m| m == persona_id)
    }
}
