//! Process-local conversation store.

use std::sync::Arc;

use dashmap::DashMap;

use crate::conversation::entry::{ConversationRecord, Entry};
use crate::conversation::errors::TranscriptResult;
use crate::conversation::ids::ChatId;

use super::{AppendOutcome, ConversationStore, StoreFuture};

/// Thread-safe in-memory store, one vector per chat.
///
/// Used as the test double for the service and as a volatile backend.
#[derive(Clone, Default)]
pub struct InMemoryConversationStore {
    chats: Arc<DashMap<ChatId, Vec<Entry>>>,
}

impl InMemoryConversationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chats holding at least one entry.
    #[must_use]
    pub fn chat_count(&self) -> usize {
        self.chats.len()
    }
}

impl ConversationStore for InMemoryConversationStore {
    fn append(&self, record: ConversationRecord) -> StoreFuture<'_, TranscriptResult<AppendOutcome>> {
        Box::pin(async move {
            // The shard stays locked for both the duplicate check and the push.
            let mut entries = self.chats.entry(record.chat_id).or_default();
            if entries.iter().any(|existing| existing.id == record.entry.id) {
                return Ok(AppendOutcome::AlreadyPresent);
            }
            entries.push(record.entry);
            Ok(AppendOutcome::Inserted)
        })
    }

    fn list_all(&self, chat_id: ChatId) -> StoreFuture<'_, TranscriptResult<Vec<Entry>>> {
        Box::pin(async move {
            Ok(self
                .chats
                .get(&chat_id)
                .map(|entries| entries.value().clone())
                .unwrap_or_default())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_and_list() -> TranscriptResult<()> {
        let store = InMemoryConversationStore::new();
        let chat_id = ChatId::new();
        let entry = Entry::new("User1");

        let outcome = store
            .append(ConversationRecord::new(chat_id, entry.clone()))
            .await?;
        assert_eq!(outcome, AppendOutcome::Inserted);
        assert_eq!(store.list_all(chat_id).await?, vec![entry]);
        assert!(store.list_all(ChatId::new()).await?.is_empty());
        assert_eq!(store.chat_count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_id_is_ignored() -> TranscriptResult<()> {
        let store = InMemoryConversationStore::new();
        let record = ConversationRecord::new(ChatId::new(), Entry::new("User1"));

        store.append(record.clone()).await?;
        let outcome = store.append(record.clone()).await?;

        assert_eq!(outcome, AppendOutcome::AlreadyPresent);
        assert_eq!(store.list_all(record.chat_id).await?.len(), 1);
        Ok(())
    }
}
