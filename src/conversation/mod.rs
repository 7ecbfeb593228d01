//! Conversation persistence for the chatlog service.
//!
//! - `ids`: chat and entry identifiers
//! - `entry`: entry, record, transcript and confirmation models
//! - `store`: the append-only store trait with `SQLite` and in-memory backends
//! - `service`: validation and transcript assembly on top of a store
//! - `config`: service configuration and environment overlay
//! - `errors`: error taxonomy

pub mod config;
pub mod entry;
pub mod errors;
pub mod ids;
pub mod service;
pub mod store;

pub use config::{ChatlogConfig, ServerConfig, StorageBackend, StorageConfig, ValidationConfig};
pub use entry::{Confirmation, ConversationRecord, Entry, Transcript};
pub use errors::{TranscriptError, TranscriptResult};
pub use ids::{ChatId, EntryId};
pub use service::ConversationService;
pub use store::{
    AppendOutcome, ConversationStore, InMemoryConversationStore, SqliteConversationStore,
    StoreFuture, open_store,
};
