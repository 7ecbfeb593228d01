//! `SQLite` implementation of the conversation store.

use chrono::{DateTime, SecondsFormat, Utc};
use tokio_rusqlite::Connection;
use tracing::debug;

use crate::conversation::config::StorageConfig;
use crate::conversation::entry::{ConversationRecord, Entry};
use crate::conversation::errors::{TranscriptError, TranscriptResult};
use crate::conversation::ids::ChatId;

use super::{AppendOutcome, ConversationStore, StoreFuture};

/// `SQLite` implementation of conversation storage.
///
/// Rows are keyed by an autoincrement sequence, which gives arrival order on
/// reads. `created_at` is kept as RFC 3339 text with nanosecond precision so
/// timestamps round-trip exactly.
pub struct SqliteConversationStore {
    conn: Connection,
    table: String,
}

impl SqliteConversationStore {
    /// Initialize the store and create the table if it doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened.
    pub async fn new(config: &StorageConfig) -> TranscriptResult<Self> {
        let conn = Connection::open(&config.sqlite_path).await?;
        let table = config.table.clone();
        let table_name = table.clone();

        conn.call(move |conn| {
            conn.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {table_name} (
                    seq INTEGER PRIMARY KEY AUTOINCREMENT,
                    chat_id TEXT NOT NULL,
                    entry_id TEXT NOT NULL,
                    sender TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    UNIQUE (chat_id, entry_id)
                );
                CREATE INDEX IF NOT EXISTS idx_{table_name}_chat
                    ON {table_name} (chat_id, seq);"
            ))?;
            Ok(())
        })
        .await?;

        debug!(path = %config.sqlite_path.display(), %table, "conversation table ready");
        Ok(Self { conn, table })
    }
}

impl ConversationStore for SqliteConversationStore {
    fn append(&self, record: ConversationRecord) -> StoreFuture<'_, TranscriptResult<AppendOutcome>> {
        Box::pin(async move {
            let table = self.table.clone();
            let ConversationRecord { chat_id, entry } = record;
            let created_at = entry.created_at.to_rfc3339_opts(SecondsFormat::Nanos, true);

            let changed = self
                .conn
                .call(move |conn| {
                    let changed = conn.execute(
                        &format!(
                            "INSERT OR IGNORE INTO {table} (chat_id, entry_id, sender, created_at)
                             VALUES (?1, ?2, ?3, ?4)"
                        ),
                        rusqlite::params![
                            chat_id.to_string(),
                            entry.id.to_string(),
                            entry.sender,
                            created_at
                        ],
                    )?;
                    Ok(changed)
                })
                .await?;

            Ok(if changed == 0 {
                AppendOutcome::AlreadyPresent
            } else {
                AppendOutcome::Inserted
            })
        })
    }

    fn list_all(&self, chat_id: ChatId) -> StoreFuture<'_, TranscriptResult<Vec<Entry>>> {
        Box::pin(async move {
            let table = self.table.clone();
            let chat = chat_id.to_string();
            let rows = self
                .conn
                .call(move |conn| {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT entry_id, sender, created_at
                         FROM {table}
                         WHERE chat_id = ?1
                         ORDER BY seq"
                    ))?;
                    let rows = stmt
                        .query_map(rusqlite::params![chat], |row| {
                            let entry_id: String = row.get(0)?;
                            let sender: String = row.get(1)?;
                            let created_at: String = row.get(2)?;
                            Ok((entry_id, sender, created_at))
                        })?
                        .collect::<Result<Vec<_>, rusqlite::Error>>()?;
                    Ok(rows)
                })
                .await?;

            let mut entries = Vec::with_capacity(rows.len());
            for (entry_id, sender, created_at) in rows {
                let id = entry_id.parse().map_err(|err| {
                    TranscriptError::CorruptRecord(format!("invalid entry id: {err}"))
                })?;
                // Same parser serde uses, so years outside 0000-9999 written with a sign decode too.
                let created_at = created_at.parse::<DateTime<Utc>>().map_err(|err| {
                    TranscriptError::CorruptRecord(format!("invalid timestamp: {err}"))
                })?;
                entries.push(Entry::with_parts(id, sender, created_at));
            }

            Ok(entries)
        })
    }
}
