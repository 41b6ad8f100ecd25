//! Persona module - configured responders and how one is chosen.
//!
//! - `persona` - persona and group records loaded from configuration
//! - `scoring` - tag, mention and recency scoring plus fallback selection
//! - `settings` - router, assessment and fallback persona ids

mod errors;
mod persona;
pub mod scoring;
mod settings;

pub use errors::SchedulingError;
pub use persona::{Persona, PersonaGroup};
pub use scoring::{collect_tags, rank_personas, select_responders, ScoredPersona};
pub use settings::{
    SchedulerSettings, DEFAULT_ASSESSMENT_PERSONA_ID, DEFAULT_FALLBACK_PERSONA_ID,
    DEFAULT_MAX_RESPONDERS, DEFAULT_ROUTER_ID,
};
