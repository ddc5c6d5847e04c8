use std::{future::Future, sync::Arc};

use anyhow::Context;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};

use crate::types::{ApiResponse, Message, Update};

/// A message the bot sent, kept so it can be edited later
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: i64,
    pub message_id: i64,
}

/// Outbound side of the chat transport
pub trait Messenger {
    fn send_text(
        &self,
        chat_id: i64,
        text: &str,
    ) -> impl Future<Output = anyhow::Result<SentMessage>> + Send;

    fn edit_text(
        &self,
        message: SentMessage,
        text: &str,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}

impl<T: Messenger + Send + Sync> Messenger for Arc<T> {
    async fn send_text(&self, chat_id: i64, text: &str) -> anyhow::Result<SentMessage> {
        (**self).send_text(chat_id, text).await
    }

    async fn edit_text(&self, message: SentMessage, text: &str) -> anyhow::Result<()> {
        (**self).edit_text(message, text).await
    }
}

#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: Client,
    token: String,
    base_url: String,
}

impl TelegramClient {
    /// Long-poll wait, in seconds, for `getUpdates`
    pub const POLL_TIMEOUT_SECS: u64 = 30;

    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
            base_url: "https://api.telegram.org".into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    #[tracing::instrument(skip(self, body))]
    async fn call<B, R>(&self, method: &str, body: &B) -> anyhow::Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .inspect_err(|e| tracing::error!(error = %e, "Failed to reach Telegram"))
            .with_context(|| format!("Telegram {method} request failed"))?
            .json::<ApiResponse<R>>()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Invalid Telegram {method} response"))?;

        match response {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse { description, .. } => {
                let description = description.unwrap_or_default();
                tracing::error!(%description, "Telegram API call failed");
                anyhow::bail!("Telegram {method} failed: {description}")
            }
        }
    }

    /// Next batch of updates after `offset`, waiting up to `timeout_secs`
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> anyhow::Result<Vec<Update>> {
        let body = serde_json::json!({
            "offset": offset,
            "timeout": timeout_secs,
            "allowed_updates": ["message"],
        });
        self.call("getUpdates", &body).await
    }

    pub async fn set_webhook(&self, url: &str) -> anyhow::Result<()> {
        let body = serde_json::json!({
            "url": url,
            "allowed_updates": ["message"],
        });
        self.call::<_, bool>("setWebhook", &body).await?;
        Ok(())
    }

    pub async fn delete_webhook(&self) -> anyhow::Result<()> {
        self.call::<_, bool>("deleteWebhook", &serde_json::json!({}))
            .await?;
        Ok(())
    }
}

impl Messenger for TelegramClient {
    async fn send_text(&self, chat_id: i64, text: &str) -> anyhow::Result<SentMessage> {
        let body = serde_json::json!({ "chat_id": chat_id, "text": text });
        let message: Message = self.call("sendMessage", &body).await?;

        Ok(SentMessage {
            chat_id: message.chat.id,
            message_id: message.message_id,
        })
    }

    async fn edit_text(&self, message: SentMessage, text: &str) -> anyhow::Result<()> {
        let body = serde_json::json!({
            "chat_id": message.chat_id,
            "message_id": message.message_id,
            "text": text,
        });
        // the result is the edited Message
        self.call::<_, serde_json::Value>("editMessageText", &body)
            .await?;
        Ok(())
    }
}
