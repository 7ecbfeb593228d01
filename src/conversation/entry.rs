//! Entry, record and transcript models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::conversation::ids::{ChatId, EntryId};

/// Confirmation message returned for a successful append.
pub const ADDED_MESSAGE: &str = "Conversation added successfully";

/// A single chat message. Immutable once created.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Identifier, unique within the chat.
    pub id: EntryId,
    /// Display name of the sender.
    pub sender: String,
    /// Creation timestamp, used for transcript ordering.
    #[serde(alias = "creationDate")]
    pub created_at: DateTime<Utc>,
}

impl Entry {
    /// Build an entry with a fresh id stamped with the current time.
    #[must_use]
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            id: EntryId::new(),
            sender: sender.into(),
            created_at: Utc::now(),
        }
    }

    /// Build an entry from caller-supplied identity and timestamp.
    #[must_use]
    pub fn with_parts(id: EntryId, sender: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            sender: sender.into(),
            created_at,
        }
    }
}

/// One stored row: an entry under its chat partition key.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRecord {
    /// Partition key.
    pub chat_id: ChatId,
    /// The stored entry.
    #[serde(alias = "conversation")]
    pub entry: Entry,
}

impl ConversationRecord {
    /// Pair an entry with its chat.
    #[must_use]
    pub const fn new(chat_id: ChatId, entry: Entry) -> Self {
        Self { chat_id, entry }
    }
}

/// Ordered view of a chat, assembled at read time.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    /// Chat the entries belong to.
    pub chat_id: ChatId,
    /// Entries ascending by `created_at`.
    pub entries: Vec<Entry>,
}

impl Transcript {
    /// Number of entries in the transcript.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the chat has no entries (or does not exist yet).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Acknowledgement of a successful append.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    /// Chat the entry was appended to.
    pub chat_id: ChatId,
    /// The appended entry id.
    pub entry_id: EntryId,
    /// Human readable acknowledgement.
    pub message: String,
}

impl Confirmation {
    /// Build the standard acknowledgement for a record.
    #[must_use]
    pub fn for_record(record: &ConversationRecord) -> Self {
        Self {
            chat_id: record.chat_id,
            entry_id: record.entry.id,
            message: ADDED_MESSAGE.to_string(),
        }
    }
}
