//! Persona directory port.
//!
//! Read-only view of the configured personas and conversation groups.

use crate::domain::foundation::PersonaId;
use crate::domain::persona::{Persona, PersonaGroup};

/// A group together with the personas its members resolve to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRoster {
    pub group: PersonaGroup,
    /// Members in group order; ids without a persona definition are dropped.
    pub personas: Vec<Persona>,
}

pub trait PersonaDirectory: Send + Sync {
    fn personas(&self) -> Vec<Persona>;

    fn groups(&self) -> Vec<PersonaGroup>;

    fn find(&self, id: &PersonaId) -> Option<Persona>;

    /// Resolves `group_id`, or the first configured group when absent.
    ///
    /// Returns `None` when the group does not exist.
    fn roster(&self, group_id: Option<&str>) -> Option<GroupRoster>;
}
