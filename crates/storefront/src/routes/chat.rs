//! Live chat handlers.
//!
//! Customers connect over WebSocket and receive admin replies pushed
//! through the [`ChatRegistry`]. Outbound customer messages do not use
//! the socket - they are POSTed and relayed to the external support bot,
//! which answers through the reply endpoint.

use axum::{
    Json,
    extract::{
        Multipart, Query, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    http::StatusCode,
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use tealeaf_core::ChatId;

use crate::chat::{ChatRegistry, RelayMessage};
use crate::error::{AppError, Result};
use crate::services::uploads::validate_image;
use crate::state::AppState;

/// Chat ids are client-generated; require the fixed prefix so arbitrary
/// strings cannot masquerade as chat channels.
const CHAT_ID_PREFIX: &str = "chat_";

fn parse_chat_id(raw: &str) -> Result<ChatId> {
    if raw.len() > CHAT_ID_PREFIX.len() && raw.starts_with(CHAT_ID_PREFIX) {
        Ok(ChatId::new(raw))
    } else {
        Err(AppError::BadRequest(format!(
            "Chat id must start with {CHAT_ID_PREFIX}"
        )))
    }
}

// =============================================================================
// WebSocket
// =============================================================================

/// Query parameters for the WebSocket endpoint.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub chat_id: String,
}

/// Upgrade a customer connection.
#[instrument(skip(state, upgrade))]
pub async fn ws(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    upgrade: WebSocketUpgrade,
) -> Result<Response> {
    let chat_id = parse_chat_id(&query.chat_id)?;
    let registry = state.chat().clone();
    Ok(upgrade.on_upgrade(move |socket| relay_loop(socket, registry, chat_id)))
}

/// Pump admin replies to the socket until either side goes away.
async fn relay_loop(socket: WebSocket, registry: ChatRegistry, chat_id: ChatId) {
    let mut rx = registry.connect(chat_id.clone()).await;
    let (mut sink, mut stream) = socket.split();

    debug!(chat_id = %chat_id, "chat connected");

    loop {
        tokio::select! {
            reply = rx.recv() => {
                let Some(reply) = reply else {
                    // Replaced by a reconnect; the new socket owns the chat now.
                    break;
                };
                let Ok(text) = serde_json::to_string(&reply) else {
                    warn!(chat_id = %chat_id, "failed to serialize relay message");
                    continue;
                };
                if sink.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            incoming = stream.next() => {
                match incoming {
                    // Customer messages travel over POST /chat/messages;
                    // the socket is push-only. Answer pings, ignore the rest.
                    Some(Ok(Message::Ping(payload))) => {
                        if sink.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    registry.disconnect(&chat_id).await;
    debug!(chat_id = %chat_id, "chat disconnected");
}

// =============================================================================
// Customer Messages
// =============================================================================

/// Relay a customer message (text plus optional image) to the support bot.
///
/// Multipart fields: `chatId`, `text`, optional `image`.
#[instrument(skip(state, multipart))]
pub async fn send_message(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<StatusCode> {
    let Some(bot) = state.bot() else {
        return Err(AppError::Internal(
            "support bot is not configured".to_string(),
        ));
    };

    let mut chat_id = None;
    let mut text = None;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(format!("Malformed multipart body: {err}")))?
    {
        match field.name() {
            Some("chatId") => {
                let value = field
                    .text()
                    .await
                    .map_err(|err| AppError::BadRequest(err.to_string()))?;
                chat_id = Some(parse_chat_id(&value)?);
            }
            Some("text") => {
                text = Some(
                    field
                        .text()
                        .await
                        .map_err(|err| AppError::BadRequest(err.to_string()))?,
                );
            }
            Some("image") => {
                let filename = field
                    .file_name()
                    .map_or_else(|| "image".to_string(), ToString::to_string);
                let content_type = field.content_type().map_or_else(
                    || "application/octet-stream".to_string(),
                    ToString::to_string,
                );
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| AppError::BadRequest(err.to_string()))?;

                validate_image(&filename, &content_type, bytes.len())?;
                image = Some((filename, content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let chat_id = chat_id.ok_or_else(|| AppError::BadRequest("chatId is required".to_string()))?;
    let text = text.unwrap_or_default();
    if text.trim().is_empty() && image.is_none() {
        return Err(AppError::BadRequest(
            "A message needs text or an image".to_string(),
        ));
    }

    match image {
        Some((filename, content_type, bytes)) => {
            bot.send_message_with_image(&chat_id, &text, &filename, &content_type, bytes)
                .await
                .map_err(|err| AppError::Internal(err.to_string()))?;
        }
        None => {
            bot.send_message(&chat_id, &text)
                .await
                .map_err(|err| AppError::Internal(err.to_string()))?;
        }
    }

    Ok(StatusCode::ACCEPTED)
}

// =============================================================================
// Admin Replies
// =============================================================================

/// Admin reply pushed to a connected customer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminReply {
    pub chat_id: String,
    pub text: String,
}

/// Whether a reply reached an open customer socket.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct ReplyReceipt {
    pub delivered: bool,
}

/// Push a reply to the customer's socket.
///
/// An unknown or already-closed chat id is not an error: the customer
/// may simply have left. The receipt reports `delivered: false` and the
/// admin UI decides what to show.
#[instrument(skip(state, reply))]
pub async fn send_reply(
    State(state): State<AppState>,
    Json(reply): Json<AdminReply>,
) -> Result<Json<ReplyReceipt>> {
    let chat_id = parse_chat_id(&reply.chat_id)?;

    let delivered = state
        .chat()
        .send(&chat_id, RelayMessage::AdminMessage { text: reply.text })
        .await;

    if !delivered {
        debug!(chat_id = %chat_id, "reply to chat with no open connection");
    }

    Ok(Json(ReplyReceipt { delivered }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_id_prefix_required() {
        assert!(parse_chat_id("chat_abc123").is_ok());
        assert!(parse_chat_id("chat_").is_err());
        assert!(parse_chat_id("session_abc").is_err());
        assert!(parse_chat_id("").is_err());
    }

    #[test]
    fn test_reply_receipt_wire_shape() {
        let json = serde_json::to_string(&ReplyReceipt { delivered: false }).unwrap();
        assert_eq!(json, r#"{"delivered":false}"#);
    }

    #[tokio::test]
    async fn test_reply_to_unknown_chat_is_a_noop() {
        let registry = ChatRegistry::new();
        let chat_id = ChatId::new("chat_gone");

        let delivered = registry
            .send(
                &chat_id,
                RelayMessage::AdminMessage {
                    text: "anyone there?".to_string(),
                },
            )
            .await;

        // Customer already left; the reply is dropped, not an error.
        assert_eq!(ReplyReceipt { delivered }, ReplyReceipt { delivered: false });
        assert_eq!(registry.connected_count().await, 0);
    }
}
