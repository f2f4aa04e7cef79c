//! Live chat connection registry.
//!
//! Customers hold a WebSocket open per chat id; admin replies arrive over
//! a plain HTTP endpoint and are pushed to the matching socket through an
//! in-process channel. One sender per chat id - a reconnect replaces the
//! previous registration.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::debug;

use tealeaf_core::ChatId;

/// A message pushed to a connected customer socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayMessage {
    /// Reply from the support side.
    AdminMessage { text: String },
}

/// Registry of open customer chat connections.
///
/// Cheaply cloneable; the map is shared behind an `Arc`.
#[derive(Clone, Default)]
pub struct ChatRegistry {
    connections: Arc<RwLock<HashMap<ChatId, UnboundedSender<RelayMessage>>>>,
}

impl ChatRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection for `chat_id`, returning the receiving end.
    ///
    /// Any previous connection for the same chat id is dropped; its
    /// receiver will see the channel close.
    pub async fn connect(&self, chat_id: ChatId) -> UnboundedReceiver<RelayMessage> {
        let (tx, rx) = unbounded_channel();
        let previous = self.connections.write().await.insert(chat_id.clone(), tx);
        if previous.is_some() {
            debug!(chat_id = %chat_id, "replaced existing chat connection");
        }
        rx
    }

    /// Remove the connection for `chat_id`, if any.
    pub async fn disconnect(&self, chat_id: &ChatId) {
        self.connections.write().await.remove(chat_id);
    }

    /// Push a message to the connection for `chat_id`.
    ///
    /// Returns `false` when no customer is connected (or the socket task
    /// already dropped its receiver) - the caller decides whether that is
    /// an error.
    pub async fn send(&self, chat_id: &ChatId, message: RelayMessage) -> bool {
        let connections = self.connections.read().await;
        match connections.get(chat_id) {
            Some(tx) => tx.send(message).is_ok(),
            None => false,
        }
    }

    /// Number of currently connected chats.
    pub async fn connected_count(&self) -> usize {
        self.connections.read().await.len()
    }
}
