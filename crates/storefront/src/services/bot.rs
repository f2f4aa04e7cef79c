//! Relay of customer chat messages to the external support bot.
//!
//! The bot is an outbound webhook: each customer message is POSTed with
//! the chat id so the bot (or a human behind it) can answer through the
//! reply endpoint. Messages may carry one image, sent as multipart.

use secrecy::ExposeSecret;
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use tealeaf_core::ChatId;

use crate::config::ChatBotConfig;

/// Failure relaying a message to the support bot.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("bot request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Outbound message body for text-only relays.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutboundMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Client for the external support bot webhook.
#[derive(Clone)]
pub struct FeedbackBotClient {
    client: reqwest::Client,
    webhook_url: String,
    token: String,
}

impl FeedbackBotClient {
    /// Create a new bot client.
    #[must_use]
    pub fn new(config: &ChatBotConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url: config.webhook_url.clone(),
            token: config.token.expose_secret().to_string(),
        }
    }

    /// Relay a text message to the bot.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Http`] when the webhook is unreachable or
    /// answers with an error status.
    #[instrument(skip(self, text), fields(chat_id = %chat_id))]
    pub async fn send_message(&self, chat_id: &ChatId, text: &str) -> Result<(), BotError> {
        self.client
            .post(&self.webhook_url)
            .bearer_auth(&self.token)
            .json(&OutboundMessage {
                chat_id: chat_id.as_str(),
                text,
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Relay a message with an attached image as multipart.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Http`] when the webhook is unreachable or
    /// answers with an error status.
    #[instrument(skip(self, text, image), fields(chat_id = %chat_id, image_size = image.len()))]
    pub async fn send_message_with_image(
        &self,
        chat_id: &ChatId,
        text: &str,
        filename: &str,
        content_type: &str,
        image: Vec<u8>,
    ) -> Result<(), BotError> {
        let part = reqwest::multipart::Part::bytes(image)
            .file_name(filename.to_owned())
            .mime_str(content_type)?;

        let form = reqwest::multipart::Form::new()
            .text("chatId", chat_id.as_str().to_owned())
            .text("text", text.to_owned())
            .part("image", part);

        self.client
            .post(&self.webhook_url)
            .bearer_auth(&self.token)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
