//! Partition-keyed append log for conversation records.

mod in_memory;
mod sqlite;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::conversation::config::{StorageBackend, StorageConfig};
use crate::conversation::entry::{ConversationRecord, Entry};
use crate::conversation::errors::TranscriptResult;
use crate::conversation::ids::ChatId;

pub use in_memory::InMemoryConversationStore;
pub use sqlite::SqliteConversationStore;

/// Boxed future type for conversation store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Result of a single append.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AppendOutcome {
    /// A new record was written.
    Inserted,
    /// A record with the same chat and entry id already existed; nothing changed.
    AlreadyPresent,
}

/// Append-only conversation store.
///
/// Each append is one independent atomic write, so concurrent callers on the
/// same chat never lose updates. There are no update or delete operations.
///
/// A caller whose append is cancelled cannot know whether the record was
/// persisted. Retrying with the same entry id is safe (the retry reports
/// [`AppendOutcome::AlreadyPresent`]); retrying with a freshly generated id
/// stores the message twice.
pub trait ConversationStore: Send + Sync {
    /// Append one record under its chat id.
    ///
    /// # Errors
    /// Returns [`TranscriptError::StoreUnavailable`](crate::conversation::TranscriptError::StoreUnavailable)
    /// if the backend cannot be reached.
    fn append(&self, record: ConversationRecord) -> StoreFuture<'_, TranscriptResult<AppendOutcome>>;

    /// Load every entry stored under `chat_id`, in store-native order.
    ///
    /// An unknown chat yields an empty vector.
    ///
    /// # Errors
    /// Returns an error if storage access fails or a stored row cannot be decoded.
    fn list_all(&self, chat_id: ChatId) -> StoreFuture<'_, TranscriptResult<Vec<Entry>>>;
}

/// Open the store selected by `config`.
///
/// # Errors
/// Returns an error if the `SQLite` database cannot be opened or initialized.
pub async fn open_store(config: &StorageConfig) -> TranscriptResult<Arc<dyn ConversationStore>> {
    let store: Arc<dyn ConversationStore> = match config.backend {
        StorageBackend::Sqlite => Arc::new(SqliteConversationStore::new(config).await?),
        StorageBackend::Memory => Arc::new(InMemoryConversationStore::new()),
    };
    Ok(store)
}
