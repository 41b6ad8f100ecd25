//! Tag classifier port.
//!
//! Maps a user message onto the tag vocabulary of the available personas.

use async_trait::async_trait;

use super::ai_provider::AIError;
use crate::domain::chat::ChatMessage;

#[async_trait]
pub trait TagClassifier: Send + Sync {
    /// Returns the tags from `vocabulary` that describe `message`.
    ///
    /// `history` holds prior messages, oldest first; implementations may
    /// trim it further.
    async fn classify(
        &self,
        message: &str,
        vocabulary: &[String],
        history: &[ChatMessage],
    ) -> Result<Vec<String>, AIError>;
}
