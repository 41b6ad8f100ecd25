//! Persona and group tables.

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};

use super::error::ValidationError;
use crate::domain::foundation::PersonaId;
use crate::domain::persona::{
    Persona, PersonaGroup, SchedulerSettings, DEFAULT_ASSESSMENT_PERSONA_ID,
    DEFAULT_FALLBACK_PERSONA_ID, DEFAULT_MAX_RESPONDERS, DEFAULT_ROUTER_ID,
};

/// Configured responders, their groups and the scheduler roles.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonasConfig {
    #[serde(default)]
    pub characters: Vec<Persona>,

    #[serde(default)]
    pub groups: Vec<PersonaGroup>,

    /// Shared system prompt; `#groupName#` is replaced per request
    #[serde(default)]
    pub system_prompt: String,

    #[serde(default = "default_router_id")]
    pub router_id: String,

    #[serde(default = "default_assessment_persona_id")]
    pub assessment_persona_id: String,

    #[serde(default = "default_fallback_persona_id")]
    pub fallback_persona_id: String,

    #[serde(default = "default_max_responders")]
    pub max_responders: usize,
}

impl PersonasConfig {
    /// Scheduler roles as domain settings.
    pub fn scheduler_settings(&self) -> Result<SchedulerSettings, ValidationError> {
        let id = |role: &'static str, raw: &str| {
            PersonaId::new(raw).map_err(|_| ValidationError::UnknownSchedulerPersona {
                role,
                id: raw.to_string(),
            })
        };
        Ok(SchedulerSettings::new(
            id("router", &self.router_id)?,
            id("assessment", &self.assessment_persona_id)?,
            id("fallback", &self.fallback_persona_id)?,
            self.max_responders,
        ))
    }

    /// Checks ids, group membership and that every persona model is mapped
    /// to a provider in `models`.
    pub fn validate(&self, models: &BTreeMap<String, String>) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for persona in &self.characters {
            if !seen.insert(persona.id.as_str()) {
                return Err(ValidationError::DuplicatePersona(persona.id.to_string()));
            }
            if persona.name.trim().is_empty() {
                return Err(ValidationError::UnnamedPersona(persona.id.to_string()));
            }
            if !models.contains_key(&persona.model) {
                return Err(ValidationError::UnmappedModel {
                    persona: persona.id.to_string(),
                    model: persona.model.clone(),
                });
            }
        }

        if self.groups.is_empty() {
            return Err(ValidationError::NoGroups);
        }
        for group in &self.groups {
            if let Some(unknown) = group.members.iter().find(|m| !seen.contains(m.as_str())) {
                return Err(ValidationError::UnknownGroupMember {
                    group: group.id.clone(),
                    persona: unknown.to_string(),
                });
            }
        }

        let settings = self.scheduler_settings()?;
        for (role, id) in [
            ("router", &settings.router_id),
            ("assessment", &settings.assessment_persona_id),
            ("fallback", &settings.fallback_persona_id),
        ] {
            if !seen.contains(id.as_str()) {
                return Err(ValidationError::UnknownSchedulerPersona {
                    role,
                    id: id.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for PersonasConfig {
    fn default() -> Self {
        Self {
            characters: Vec::new(),
            groups: Vec::new(),
            system_prompt: String::new(),
            router_id: default_router_id(),
            assessment_persona_id: default_assessment_persona_id(),
            fallback_persona_id: default_fallback_persona_id(),
            max_responders: default_max_responders(),
        }
    }
}

fn default_router_id() -> String {
    DEFAULT_ROUTER_ID.to_string()
}

fn default_assessment_persona_id() -> String {
    DEFAULT_ASSESSMENT_PERSONA_ID.to_string()
}

fn default_fallback_persona_id() -> String {
    DEFAULT_FALLBACK_PERSONA_ID.to_string()
}

fn default_max_responders() -> usize {
    DEFAULT_MAX_RESPONDERS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persona(id: &str) -> Persona {
        Persona {
            id: PersonaId::new(id).unwrap(),
            name: id.to_uppercase(),
            personality: String::new(),
            model: "qwen-plus".into(),
            avatar: String::new(),
            custom_prompt: String::new(),
            tags: vec![],
        }
    }

    fn config() -> PersonasConfig {
        let ids = ["ai0", "hs_profile_assessment_agent", "hs_empathy_agent"];
        PersonasConfig {
            characters: ids.iter().map(|id| persona(id)).collect(),
            groups: vec![PersonaGroup {
                id: "health".into(),
                name: "Health".into(),
                description: String::new(),
                members: ids.iter().map(|id| PersonaId::new(*id).unwrap()).collect(),
                is_group_discussion_mode: false,
            }],
            ..Default::default()
        }
    }

    fn models() -> BTreeMap<String, String> {
        BTreeMap::from([("qwen-plus".to_string(), "dashscope".to_string())])
    }

    #[test]
    fn standard_roster_is_valid() {
        let cfg = config();
        assert!(cfg.validate(&models()).is_ok());
        assert_eq!(cfg.scheduler_settings().unwrap(), SchedulerSettings::default());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut cfg = config();
        cfg.characters.push(persona("ai0"));
        assert_eq!(
            cfg.validate(&models()),
            Err(ValidationError::DuplicatePersona("ai0".into()))
        );
    }

    #[test]
    fn unmapped_model_is_rejected() {
        let mut cfg = config();
        cfg.characters[2].model = "gpt-9".into();
        assert!(matches!(
            cfg.validate(&models()),
            Err(ValidationError::UnmappedModel { .. })
        ));
    }

    #[test]
    fn group_members_must_exist() {
        let mut cfg = config();
        cfg.groups[0].members.push(PersonaId::new("ghost").unwrap());
        assert_eq!(
            cfg.validate(&models()),
            Err(ValidationError::UnknownGroupMember {
                group: "health".into(),
                persona: "ghost".into(),
            })
        );
    }

    #[test]
    fn scheduler_roles_must_exist() {
        let mut cfg = config();
        cfg.fallback_persona_id = "nobody".into();
        assert!(matches!(
            cfg.validate(&models()),
            Err(ValidationError::UnknownSchedulerPersona { role: "fallback", .. })
        ));
    }

    #[test]
    fn blank_role_id_is_rejected() {
        let cfg = PersonasConfig {
            router_id: " ".into(),
            ..config()
        };
        assert!(cfg.scheduler_settings().is_err());
    }
}
