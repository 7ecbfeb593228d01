//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::conversation::{ChatlogConfig, ConversationService, TranscriptResult, open_store};

/// Shared application state.
pub struct AppState {
    /// Conversation service backed by the configured store.
    pub conversations: ConversationService,
}

impl AppState {
    /// Create the application state from configuration.
    ///
    /// # Errors
    /// Returns an error if the configured store cannot be opened.
    pub async fn new(config: &ChatlogConfig) -> TranscriptResult<Arc<Self>> {
        let store = open_store(&config.storage).await?;
        let conversations = ConversationService::with_validation(store, config.validation.clone());
        Ok(Self::from_service(conversations))
    }

    /// Wrap an already built service.
    #[must_use]
    pub fn from_service(conversations: ConversationService) -> Arc<Self> {
        Arc::new(Self { conversations })
    }
}
