//! Request validation and transcript shaping over a conversation store.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::conversation::config::ValidationConfig;
use crate::conversation::entry::{Confirmation, ConversationRecord, Transcript};
use crate::conversation::errors::{TranscriptError, TranscriptResult};
use crate::conversation::ids::ChatId;
use crate::conversation::store::{AppendOutcome, ConversationStore};

/// Stateless front for the conversation store.
#[derive(Clone)]
pub struct ConversationService {
    store: Arc<dyn ConversationStore>,
    validation: ValidationConfig,
}

impl ConversationService {
    /// Create a service over `store` with default validation settings.
    #[must_use]
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self::with_validation(store, ValidationConfig::default())
    }

    /// Create a service with explicit validation settings.
    #[must_use]
    pub const fn with_validation(
        store: Arc<dyn ConversationStore>,
        validation: ValidationConfig,
    ) -> Self {
        Self { store, validation }
    }

    /// Validate and append one conversation entry.
    ///
    /// The entry id and timestamp are taken as supplied. Re-sending an entry
    /// whose id is already stored succeeds without writing anything.
    ///
    /// # Errors
    /// Returns [`TranscriptError::Validation`] for a missing or oversized
    /// sender, or the store's error if the append fails.
    pub async fn add_conversation(&self, record: ConversationRecord) -> TranscriptResult<Confirmation> {
        self.validate(&record)?;

        let confirmation = Confirmation::for_record(&record);
        match self.store.append(record).await? {
            AppendOutcome::Inserted => {
                info!(chat_id = %confirmation.chat_id, entry_id = %confirmation.entry_id, "conversation entry appended");
            }
            AppendOutcome::AlreadyPresent => {
                debug!(chat_id = %confirmation.chat_id, entry_id = %confirmation.entry_id, "entry already stored, append skipped");
            }
        }

        Ok(confirmation)
    }

    /// Fetch the transcript of a chat, ascending by creation time.
    ///
    /// Entries with equal timestamps keep the order the store returned them
    /// in. An unknown chat yields an empty transcript.
    ///
    /// # Errors
    /// Returns the store's error if the read fails.
    pub async fn get_chat(&self, chat_id: ChatId) -> TranscriptResult<Transcript> {
        let mut entries = self.store.list_all(chat_id).await?;
        // Stable sort: ties stay in arrival order.
        entries.sort_by_key(|entry| entry.created_at);

        debug!(%chat_id, count = entries.len(), "transcript loaded");
        Ok(Transcript { chat_id, entries })
    }

    fn validate(&self, record: &ConversationRecord) -> TranscriptResult<()> {
        let sender = record.entry.sender.trim();
        if sender.is_empty() {
            warn!(chat_id = %record.chat_id, "rejected entry without sender");
            return Err(TranscriptError::Validation(
                "entry.sender must not be empty".to_string(),
            ));
        }

        let chars = sender.chars().count();
        if chars > self.validation.max_sender_chars {
            warn!(chat_id = %record.chat_id, chars, "rejected entry with oversized sender");
            return Err(TranscriptError::Validation(format!(
                "entry.sender is {chars} characters, max {}",
                self.validation.max_sender_chars
            )));
        }

        Ok(())
    }
}
