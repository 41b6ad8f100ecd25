//! Persona scoring and responder selection.
//!
//! Pure functions: the matched tags come from the classifier and the
//! assessment override is applied by the caller before any of this runs.

use crate::domain::chat::{tail, ChatMessage};
use crate::domain::foundation::PersonaId;

use super::persona::Persona;

pub const TAG_MATCH_POINTS: u32 = 3;
pub const NAME_MENTION_POINTS: u32 = 5;
pub const RECENT_PARTICIPATION_POINTS: u32 = 1;

/// History entries inspected for the recency signal.
pub const RECENT_HISTORY_WINDOW: usize = 3;

/// A persona that scored above zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredPersona {
    pub id: PersonaId,
    pub score: u32,
}

/// Union of tags across candidates, excluding the router, in first-seen order.
pub fn collect_tags(available: &[Persona], router_id: &PersonaId) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for persona in available.iter().filter(|p| &p.id != router_id) {
        for tag in &persona.tags {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
    }
    tags
}

/// Scores one persona against a message.
pub fn score_persona(
    persona: &Persona,
    message_lower: &str,
    matched_tags: &[String],
    recent_history: &[ChatMessage],
) -> u32 {
    let mut score = matched_tags
        .iter()
        .filter(|tag| persona.has_tag(tag))
        .count() as u32
        * TAG_MATCH_POINTS;

    if persona.is_mentioned_in(message_lower) {
        score += NAME_MENTION_POINTS;
    }

    let recently_spoke = recent_history
        .iter()
        .any(|m| m.name == persona.name && !m.content.is_empty());
    if recently_spoke {
        score += RECENT_PARTICIPATION_POINTS;
    }

    score
}

/// Scores every non-router persona and returns those above zero, best first.
///
/// Ties keep the order the personas were given in.
pub fn rank_personas(
    available: &[Persona],
    router_id: &PersonaId,
    message: &str,
    matched_tags: &[String],
    history: &[ChatMessage],
) -> Vec<ScoredPersona> {
    let message_lower = message.to_lowercase();
    let recent = tail(history, RECENT_HISTORY_WINDOW);

    let mut ranked: Vec<ScoredPersona> = available
        .iter()
        .filter(|p| &p.id != router_id)
        .map(|p| ScoredPersona {
            id: p.id.clone(),
            score: score_persona(p, &message_lower, matched_tags, recent),
        })
        .filter(|s| s.score > 0)
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

/// Turns a ranking into the final responder list.
///
/// An empty ranking falls back to `fallback_id` when that persona is
/// available; otherwise nobody responds. The result never exceeds
/// `max_responders`.
pub fn select_responders(
    ranked: Vec<ScoredPersona>,
    available: &[Persona],
    fallback_id: &PersonaId,
    max_responders: usize,
) -> Vec<PersonaId> {
    if ranked.is_empty() {
        return if available.iter().any(|p| &p.id == fallback_id) {
            vec![fallback_id.clone()]
        } else {
            Vec::new()
        };
    }

    ranked
        .into_iter()
        .take(max_responders)
        .map(|s| s.id)
        .collect()
}
