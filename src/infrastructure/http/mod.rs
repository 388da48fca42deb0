//! Administrative HTTP ingress - push a message into an existing conversation

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::application::errors::BotError;
use crate::domain::traits::MessagingClient;

#[derive(Clone)]
pub struct AdminState {
    /// `None` until the protocol client is up
    client: Option<Arc<dyn MessagingClient>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub conversation_id: Option<String>,
    pub message: Option<String>,
}

/// Build the admin router
pub fn router(client: Option<Arc<dyn MessagingClient>>) -> Router {
    Router::new()
        .route("/api/send-message", post(send_message))
        .with_state(AdminState { client })
}

/// Bind and serve until the process exits
pub async fn serve(bind: &str, port: u16, client: Arc<dyn MessagingClient>) -> Result<(), BotError> {
    let listener = tokio::net::TcpListener::bind((bind, port))
        .await
        .map_err(|e| BotError::Network(format!("Failed to bind {}:{}: {}", bind, port, e)))?;
    tracing::info!("Admin server running on {}:{}", bind, port);

    axum::serve(listener, router(Some(client)))
        .await
        .map_err(|e| BotError::Internal(format!("Admin server stopped: {}", e)))
}

fn error(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message })))
}

async fn send_message(
    State(state): State<AdminState>,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    let Ok(Json(body)) = body else {
        return error(StatusCode::BAD_REQUEST, "ConversationId and message are required");
    };
    let (Some(conversation_id), Some(message)) = (
        body.conversation_id.filter(|s| !s.trim().is_empty()),
        body.message.filter(|s| !s.is_empty()),
    ) else {
        return error(StatusCode::BAD_REQUEST, "ConversationId and message are required");
    };

    let Some(client) = state.client else {
        tracing::error!("{}", BotError::TransportNotReady);
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Messaging client not initialized");
    };

    let conversation = match client.conversation(&conversation_id).await {
        Ok(Some(conversation)) => conversation,
        Ok(None) => {
            tracing::warn!("{}", BotError::ConversationNotFound(conversation_id));
            return error(StatusCode::NOT_FOUND, "Conversation not found");
        }
        Err(e) => {
            tracing::error!(conversation_id = %conversation_id, error = %e, "Conversation lookup failed");
            return error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send message");
        }
    };

    if let Err(e) = conversation.send(&message).await {
        tracing::error!(conversation_id = %conversation_id, error = %e, "Error sending message");
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send message");
    }

    tracing::info!(conversation_id = %conversation_id, "Admin message sent");
    (
        StatusCode::OK,
        Json(json!({ "success": true, "message": "Message sent successfully" })),
    )
}
