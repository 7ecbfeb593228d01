//! HTTP route handlers for the chatlog API.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::conversation::{ChatId, Confirmation, ConversationRecord, Transcript};

use super::error::ApiError;
use super::state::AppState;

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/conversation", post(add_conversation))
        .route("/chat/{chat_id}", get(get_chat))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "chatlog",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Append one entry to a chat.
async fn add_conversation(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ConversationRecord>, JsonRejection>,
) -> Result<Json<Confirmation>, ApiError> {
    let Json(record) = payload?;
    let confirmation = state.conversations.add_conversation(record).await?;
    Ok(Json(confirmation))
}

/// Return the ordered transcript of a chat.
async fn get_chat(
    State(state): State<Arc<AppState>>,
    chat_id: Result<Path<ChatId>, PathRejection>,
) -> Result<Json<Transcript>, ApiError> {
    let Path(chat_id) = chat_id?;
    let transcript = state.conversations.get_chat(chat_id).await?;
    Ok(Json(transcript))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use chrono::{Duration, Utc};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::conversation::{
        ConversationService, ConversationStore, Entry, EntryId, InMemoryConversationStore,
        StoreFuture, TranscriptError, TranscriptResult,
    };

    fn router() -> Router {
        let store = InMemoryConversationStore::new();
        create_router(AppState::from_service(ConversationService::new(Arc::new(store))))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = match app.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_default();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(body: &Value) -> Request<Body> {
        Request::post("/conversation")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap_or_default()
    }

    fn get_chat_request(chat_id: &str) -> Request<Body> {
        Request::get(format!("/chat/{chat_id}"))
            .body(Body::empty())
            .unwrap_or_default()
    }

    fn record_json(chat_id: ChatId, entry: &Entry) -> Value {
        json!({ "chatId": chat_id, "entry": entry })
    }

    #[tokio::test]
    async fn test_health() {
        let app = router();
        let request = Request::get("/health").body(Body::empty()).unwrap_or_default();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_unknown_chat_returns_empty_entries() {
        let app = router();
        let chat_id = ChatId::new();
        let (status, body) = send(&app, get_chat_request(&chat_id.to_string())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["chatId"], chat_id.to_string());
        assert_eq!(body["entries"], json!([]));
    }

    #[tokio::test]
    async fn test_post_then_get_round_trip() {
        let app = router();
        let chat_id = ChatId::new();
        let now = Utc::now();
        let first = Entry::with_parts(EntryId::new(), "Fake User", now);
        let second = Entry::with_parts(EntryId::new(), "Fake User 2", now - Duration::seconds(10));

        for entry in [&first, &second] {
            let (status, body) = send(&app, post_json(&record_json(chat_id, entry))).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["message"], "Conversation added successfully");
            assert_eq!(body["entryId"], entry.id.to_string());
        }

        let (status, body) = send(&app, get_chat_request(&chat_id.to_string())).await;
        assert_eq!(status, StatusCode::OK);
        let transcript: Result<Transcript, _> = serde_json::from_value(body);
        assert!(transcript.is_ok());
        if let Ok(transcript) = transcript {
            assert_eq!(transcript.chat_id, chat_id);
            assert_eq!(transcript.entries, vec![second, first]);
        }
    }

    #[tokio::test]
    async fn test_blank_sender_is_bad_request() {
        let app = router();
        let mut entry = Entry::new("User1");
        entry.sender = String::new();
        let (status, body) = send(&app, post_json(&record_json(ChatId::new(), &entry))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_missing_sender_field_is_bad_request() {
        let app = router();
        let body = json!({
            "chatId": ChatId::new(),
            "entry": { "id": EntryId::new(), "createdAt": Utc::now() }
        });
        let (status, body) = send(&app, post_json(&body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_malformed_chat_id_is_bad_request() {
        let app = router();
        let (status, _) = send(&app, get_chat_request("not-a-uuid")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    struct UnreachableStore;

    impl ConversationStore for UnreachableStore {
        fn append(
            &self,
            _record: ConversationRecord,
        ) -> StoreFuture<'_, TranscriptResult<crate::conversation::AppendOutcome>> {
            Box::pin(async { Err(TranscriptError::StoreUnavailable("timeout".to_string())) })
        }

        fn list_all(&self, _chat_id: ChatId) -> StoreFuture<'_, TranscriptResult<Vec<Entry>>> {
            Box::pin(async { Err(TranscriptError::StoreUnavailable("timeout".to_string())) })
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_server_error() {
        let app = create_router(AppState::from_service(ConversationService::new(Arc::new(
            UnreachableStore,
        ))));

        let entry = Entry::new("User1");
        let (status, body) = send(&app, post_json(&record_json(ChatId::new(), &entry))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "STORE_UNAVAILABLE");

        let (status, _) = send(&app, get_chat_request(&ChatId::new().to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
