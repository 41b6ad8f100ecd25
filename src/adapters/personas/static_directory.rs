//! Persona directory over personas and groups fixed at startup.

use std::collections::HashMap;

use crate::domain::foundation::PersonaId;
use crate::domain::persona::{Persona, PersonaGroup};
use crate::ports::{GroupRoster, PersonaDirectory};

/// In-memory `PersonaDirectory`, built once from configuration.
#[derive(Debug, Clone)]
pub struct StaticPersonaDirectory {
    personas: Vec<Persona>,
    by_id: HashMap<PersonaId, usize>,
    groups: Vec<PersonaGroup>,
}

impl StaticPersonaDirectory {
    /// Later personas with a duplicate id are ignored.
    pub fn new(personas: Vec<Persona>, groups: Vec<PersonaGroup>) -> Self {
        let mut by_id = HashMap::with_capacity(personas.len());
        for (idx, persona) in personas.iter().enumerate() {
            by_id.entry(persona.id.clone()).or_insert(idx);
        }
        Self {
            personas,
            by_id,
            groups,
        }
    }
}

impl PersonaDirectory for StaticPersonaDirectory {
    fn personas(&self) -> Vec<Persona> {
        self.personas.clone()
    }

    fn groups(&self) -> Vec<PersonaGroup> {
        self.groups.clone()
    }

    fn find(&self, id: &PersonaId) -> Option<Persona> {
        self.by_id.get(id).map(|&idx| self.personas[idx].clone())
    }

    fn roster(&self, group_id: Option<&str>) -> Option<GroupRoster> {
        let group = match group_id.filter(|id| !id.is_empty()) {
            Some(id) => self.groups.iter().find(|g| g.id == id)?,
            None => self.groups.first()?,
        };
        let personas = group.members.iter().filter_map(|id| self.find(id)).collect();
        Some(GroupRoster {
            group: group.clone(),
            personas,
        })
    }
}
