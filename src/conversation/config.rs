//! Configuration for the chatlog service.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::conversation::errors::{TranscriptError, TranscriptResult};

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Top-level configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChatlogConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Storage backend settings.
    pub storage: StorageConfig,
    /// Request validation settings.
    pub validation: ValidationConfig,
}

impl ChatlogConfig {
    /// Build the default configuration overlaid with `CHATLOG_*` environment variables.
    ///
    /// # Errors
    /// Returns an error if a variable is set to an unparsable value or the
    /// resulting configuration is invalid.
    pub fn from_env() -> TranscriptResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// # Errors
    /// Returns an error if a value cannot be parsed or fails validation.
    pub fn from_lookup<F>(lookup: F) -> TranscriptResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("CHATLOG_HOST") {
            config.server.host = parse_var("CHATLOG_HOST", &host)?;
        }
        if let Some(port) = lookup("CHATLOG_PORT") {
            config.server.port = parse_var("CHATLOG_PORT", &port)?;
        }
        if let Some(backend) = lookup("CHATLOG_BACKEND") {
            config.storage.backend = parse_var("CHATLOG_BACKEND", &backend)?;
        }
        if let Some(path) = lookup("CHATLOG_SQLITE_PATH") {
            config.storage.sqlite_path = PathBuf::from(path);
        }
        if let Some(table) = lookup("CHATLOG_TABLE") {
            config.storage.table = table;
        }
        if let Some(max) = lookup("CHATLOG_MAX_SENDER_CHARS") {
            config.validation.max_sender_chars = parse_var("CHATLOG_MAX_SENDER_CHARS", &max)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> TranscriptResult<()> {
        if self.validation.max_sender_chars == 0 {
            return Err(TranscriptError::InvalidConfig(
                "validation.max_sender_chars must be > 0".to_string(),
            ));
        }

        // The table name is interpolated into SQL, so keep it to identifier characters.
        let table = &self.storage.table;
        let valid_table = !table.is_empty()
            && !table.starts_with(|c: char| c.is_ascii_digit())
            && table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid_table {
            return Err(TranscriptError::InvalidConfig(format!(
                "storage.table {table:?} is not a valid identifier"
            )));
        }

        if self.storage.backend == StorageBackend::Sqlite
            && self.storage.sqlite_path.as_os_str().is_empty()
        {
            return Err(TranscriptError::InvalidConfig(
                "storage.sqlite_path must be set for the sqlite backend".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> TranscriptResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| TranscriptError::InvalidConfig(format!("{key}={value:?} is not valid")))
}

/// HTTP server settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: IpAddr,
    /// TCP port to listen on.
    pub port: u16,
}

impl ServerConfig {
    /// Socket address the server listens on.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

/// Which store implementation backs the service.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Durable `SQLite` file.
    #[default]
    Sqlite,
    /// Process-local map, lost on restart.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            _ => Err(value.to_string()),
        }
    }
}

/// Storage settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend selection.
    pub backend: StorageBackend,
    /// `SQLite` database path (`:memory:` for a throwaway database).
    pub sqlite_path: PathBuf,
    /// Table holding conversation records.
    pub table: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            sqlite_path: PathBuf::from("chatlog.sqlite"),
            table: "conversation".to_string(),
        }
    }
}

/// Request validation settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Maximum sender length in characters.
    pub max_sender_chars: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_sender_chars: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ChatlogConfig::default();
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.storage.table, "conversation");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overlay() {
        let config = ChatlogConfig::from_lookup(lookup_from(&[
            ("CHATLOG_HOST", "127.0.0.1"),
            ("CHATLOG_PORT", "8081"),
            ("CHATLOG_BACKEND", "Memory"),
            ("CHATLOG_MAX_SENDER_CHARS", "32"),
        ]));
        assert!(config.is_ok());
        if let Ok(config) = config {
            assert_eq!(config.server.port, 8081);
            assert_eq!(config.server.socket_addr().to_string(), "127.0.0.1:8081");
            assert_eq!(config.storage.backend, StorageBackend::Memory);
            assert_eq!(config.validation.max_sender_chars, 32);
        }
    }

    #[test]
    fn test_bad_port_rejected() {
        let config = ChatlogConfig::from_lookup(lookup_from(&[("CHATLOG_PORT", "http")]));
        assert!(matches!(config, Err(TranscriptError::InvalidConfig(_))));
    }

    #[test]
    fn test_bad_host_rejected() {
        let config = ChatlogConfig::from_lookup(lookup_from(&[("CHATLOG_HOST", "localhost:80")]));
        assert!(matches!(config, Err(TranscriptError::InvalidConfig(_))));
    }

    #[test]
    fn test_table_must_be_identifier() {
        let config =
            ChatlogConfig::from_lookup(lookup_from(&[("CHATLOG_TABLE", "conv; DROP TABLE x")]));
        assert!(matches!(config, Err(TranscriptError::InvalidConfig(_))));
    }
}
